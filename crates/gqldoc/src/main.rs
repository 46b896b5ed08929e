//! gqldoc CLI - GraphQL schema documentation generator.
//!
//! Provides the `generate` command: turn a GraphQL schema (SDL file, URL,
//! or introspection JSON) into a tree of cross-linked MDX documents plus a
//! navigation manifest, skipping regeneration when the schema is unchanged.

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::GenerateArgs;
use output::Output;

/// gqldoc - GraphQL schema documentation generator.
#[derive(Parser)]
#[command(name = "gqldoc", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate schema documentation.
    Generate(GenerateArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let verbose = matches!(&cli.command, Commands::Generate(args) if args.verbose);
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Commands::Generate(args) => {
            let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
            rt.block_on(args.execute(&output))
        }
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
