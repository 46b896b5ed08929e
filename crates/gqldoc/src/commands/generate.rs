//! `gqldoc generate` command implementation.

use std::path::PathBuf;

use clap::Args;

use gqldoc_config::{CliSettings, Config};
use gqldoc_diff::DiffMethod;
use gqldoc_renderer::{GenerateOptions, generate_docs};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the generate command.
#[derive(Args)]
pub(crate) struct GenerateArgs {
    /// Schema location: SDL file, URL, or introspection JSON file.
    #[arg(short, long)]
    schema: Option<String>,

    /// Root folder for doc generation.
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Base URL used in page slugs and cross-reference links.
    #[arg(short, long)]
    base: Option<String>,

    /// Root for links in documentation.
    #[arg(short, long)]
    link: Option<String>,

    /// File location for the doc landing page template.
    #[arg(long)]
    homepage: Option<PathBuf>,

    /// Force document generation.
    #[arg(short, long)]
    force: bool,

    /// Diff method (FORCE, SCHEMA-HASH, SCHEMA-DIFF).
    #[arg(short, long)]
    diff: Option<DiffMethod>,

    /// Temp dir for schema diff state.
    #[arg(short, long)]
    tmp: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover gqldoc.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl GenerateArgs {
    pub(crate) async fn execute(self, output: &Output) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            schema: self.schema,
            root_path: self.root,
            base_url: self.base,
            link_root: self.link,
            homepage: self.homepage,
            diff_method: self.diff,
            tmp_dir: self.tmp,
            force: self.force,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let options = GenerateOptions {
            schema_location: config.schema.clone(),
            output_dir: config.output_dir(),
            base_url: config.base_url.clone(),
            link_root: config.link_root.clone(),
            homepage: config.homepage.clone(),
            diff_method: config.diff_method,
            tmp_dir: config.tmp_dir.clone(),
        };
        let report = generate_docs(&options).await?;

        if report.regenerated {
            output.success(&format!(
                "Documentation successfully generated in \"{}\" with base URL \"{}\".",
                options.output_dir.display(),
                options.base_url
            ));
            output.info(&format!(
                "{} pages generated in {:.3}s from schema \"{}\".",
                report.pages,
                report.duration.as_secs_f64(),
                options.schema_location
            ));
            if let Some(sidebar_path) = &report.sidebar_path {
                output.highlight(&format!(
                    "Remember to update your site's sidebars with \"{}\".",
                    sidebar_path.display()
                ));
            }
        } else {
            output.info(&format!(
                "No changes detected in schema \"{}\".",
                options.schema_location
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: GenerateArgs,
    }

    #[test]
    fn test_parse_all_options() {
        let cli = TestCli::try_parse_from([
            "gqldoc",
            "--schema",
            "./schema.graphql",
            "--root",
            "website/docs",
            "--base",
            "api",
            "--link",
            "/",
            "--homepage",
            "home.md",
            "--diff",
            "SCHEMA-HASH",
            "--tmp",
            "/tmp/state",
            "--force",
        ])
        .unwrap();

        assert_eq!(cli.args.schema.as_deref(), Some("./schema.graphql"));
        assert_eq!(cli.args.root, Some(PathBuf::from("website/docs")));
        assert_eq!(cli.args.base.as_deref(), Some("api"));
        assert_eq!(cli.args.diff, Some(DiffMethod::SchemaHash));
        assert!(cli.args.force);
    }

    #[test]
    fn test_unknown_diff_method_rejected_at_parse_time() {
        let result = TestCli::try_parse_from(["gqldoc", "--diff", "SOMETIMES"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_options_default_to_none() {
        let cli = TestCli::try_parse_from(["gqldoc"]).unwrap();
        assert_eq!(cli.args.schema, None);
        assert_eq!(cli.args.diff, None);
        assert!(!cli.args.force);
        assert!(!cli.args.verbose);
    }
}
