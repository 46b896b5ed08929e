//! Configuration management for gqldoc.
//!
//! Parses `gqldoc.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories. CLI settings can
//! be applied during load via [`CliSettings`] and take precedence over file
//! values.
//!
//! String values holding locations (`schema`, `root_path`, `homepage`,
//! `tmp_dir`) support `~` and environment-variable expansion before path
//! resolution.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use gqldoc_diff::DiffMethod;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "gqldoc.toml";

/// Default homepage template, relative to the config directory.
const DEFAULT_HOMEPAGE: &str = "assets/generated.md";

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded
/// config; `force` replaces whatever diff method is configured.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override schema location (file path or URL).
    pub schema: Option<String>,
    /// Override the root folder for doc generation.
    pub root_path: Option<PathBuf>,
    /// Override the base URL segment.
    pub base_url: Option<String>,
    /// Override the root for documentation links.
    pub link_root: Option<String>,
    /// Override the homepage template location.
    pub homepage: Option<PathBuf>,
    /// Override the diff method.
    pub diff_method: Option<DiffMethod>,
    /// Override the temp dir for diff state.
    pub tmp_dir: Option<PathBuf>,
    /// Force regeneration regardless of the configured diff method.
    pub force: bool,
}

/// Raw configuration as parsed from TOML (locations as strings).
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    schema: Option<String>,
    root_path: Option<String>,
    base_url: Option<String>,
    link_root: Option<String>,
    homepage: Option<String>,
    diff_method: Option<DiffMethod>,
    tmp_dir: Option<String>,
}

/// Resolved application configuration.
#[derive(Debug)]
pub struct Config {
    /// Schema location: file path (resolved) or URL (kept verbatim).
    pub schema: String,
    /// Root folder for doc generation.
    pub root_path: PathBuf,
    /// Base URL segment used in slugs and links.
    pub base_url: String,
    /// Root prefix for cross-reference links.
    pub link_root: String,
    /// Homepage template location.
    pub homepage: PathBuf,
    /// Change-detection mode.
    pub diff_method: DiffMethod,
    /// Directory holding the persisted fingerprint and snapshot.
    pub tmp_dir: PathBuf,
    /// Path to the config file (set after loading from a file).
    pub config_path: Option<PathBuf>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g. `schema`).
        field: String,
        /// Error message.
        message: String,
    },
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise,
    /// searches for `gqldoc.toml` in the current directory and parents,
    /// falling back to defaults when none exists.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit `config_path` doesn't exist, parsing
    /// fails, or validation fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }
        config.validate()?;

        Ok(config)
    }

    /// The effective output directory: `root_path/base_url`.
    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        self.root_path.join(&self.base_url)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(schema) = &settings.schema {
            self.schema.clone_from(schema);
        }
        if let Some(root_path) = &settings.root_path {
            self.root_path.clone_from(root_path);
        }
        if let Some(base_url) = &settings.base_url {
            self.base_url.clone_from(base_url);
        }
        if let Some(link_root) = &settings.link_root {
            self.link_root.clone_from(link_root);
        }
        if let Some(homepage) = &settings.homepage {
            self.homepage.clone_from(homepage);
        }
        if let Some(diff_method) = settings.diff_method {
            self.diff_method = diff_method;
        }
        if let Some(tmp_dir) = &settings.tmp_dir {
            self.tmp_dir.clone_from(tmp_dir);
        }
        if settings.force {
            self.diff_method = DiffMethod::Force;
        }
    }

    /// Search for a config file in the current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to the current working
    /// directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::resolve(RawConfig::default(), &cwd)
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut raw: RawConfig = toml::from_str(&content)?;
        expand_env_vars(&mut raw)?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        let mut config = Self::resolve(raw, config_dir);
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Resolve raw values against a base directory, filling defaults.
    fn resolve(raw: RawConfig, base: &Path) -> Self {
        let resolve_path = |location: &str| {
            let path = Path::new(location);
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                base.join(path)
            }
        };

        let schema = match raw.schema.as_deref() {
            Some(location) if is_url(location) => location.to_owned(),
            Some(location) => resolve_path(location).to_string_lossy().into_owned(),
            None => resolve_path("schema.graphql").to_string_lossy().into_owned(),
        };

        Self {
            schema,
            root_path: resolve_path(raw.root_path.as_deref().unwrap_or("docs")),
            base_url: raw.base_url.unwrap_or_else(|| "schema".to_owned()),
            link_root: raw.link_root.unwrap_or_else(|| "/".to_owned()),
            homepage: resolve_path(raw.homepage.as_deref().unwrap_or(DEFAULT_HOMEPAGE)),
            diff_method: raw.diff_method.unwrap_or_default(),
            tmp_dir: raw
                .tmp_dir
                .as_deref()
                .map_or_else(|| std::env::temp_dir().join("gqldoc"), resolve_path),
            config_path: None,
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.schema, "schema")?;
        require_non_empty(&self.base_url, "base_url")?;
        require_non_empty(&self.link_root, "link_root")?;
        if self.base_url.contains('/') {
            return Err(ConfigError::Validation(
                "base_url must be a single path segment".to_owned(),
            ));
        }
        Ok(())
    }
}

fn is_url(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Expand `~` and environment variable references in location strings.
fn expand_env_vars(raw: &mut RawConfig) -> Result<(), ConfigError> {
    let fields = [
        (&mut raw.schema, "schema"),
        (&mut raw.root_path, "root_path"),
        (&mut raw.homepage, "homepage"),
        (&mut raw.tmp_dir, "tmp_dir"),
    ];
    for (value, field) in fields {
        if let Some(location) = value {
            *location = shellexpand::full(location)
                .map_err(|err| ConfigError::EnvVar {
                    field: field.to_owned(),
                    message: err.to_string(),
                })?
                .into_owned();
        }
    }
    Ok(())
}
