//! CLI error types.

use gqldoc_config::ConfigError;
use gqldoc_renderer::GenerateError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Generate(#[from] GenerateError),
}
