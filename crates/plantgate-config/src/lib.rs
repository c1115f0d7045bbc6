//! Configuration management for PlantGate.
//!
//! Parses `plantgate.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! The engine URL supports environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default

mod expand;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "plantgate.toml";

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override rendering engine base URL.
    pub engine_url: Option<String>,
    /// Override render timeout in milliseconds.
    pub timeout_ms: Option<u64>,
    /// Override DPI for PNG renders.
    pub png_dpi: Option<u32>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rendering engine configuration.
    pub engine: EngineConfig,
    /// Render tuning.
    pub render: RenderConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Rendering engine configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Engine base URL, e.g. `http://127.0.0.1:8000/plantuml`.
    pub url: String,
    /// Render request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Validation request timeout in milliseconds.
    pub validate_timeout_ms: u64,
    /// Local ceiling on diagram source size in bytes.
    pub max_source_bytes: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:8000/plantuml".to_owned(),
            timeout_ms: 30_000,
            validate_timeout_ms: 10_000,
            max_source_bytes: 100_000,
        }
    }
}

impl EngineConfig {
    /// Render timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Validation timeout as a [`Duration`].
    #[must_use]
    pub fn validate_timeout(&self) -> Duration {
        Duration::from_millis(self.validate_timeout_ms)
    }
}

/// Render tuning.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// DPI injected into PNG renders.
    pub png_dpi: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { png_dpi: 300 }
    }
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
        /// Config field path (e.g., "`engine.url`").
        field: String,
        /// Error message (e.g., "${`PLANTUML_SERVER`} not set").
        message: String,
    },
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise,
    /// searches for `plantgate.toml` in the current directory and parents,
    /// falling back to defaults when none is found.
    ///
    /// CLI settings are applied after loading, so CLI arguments take
    /// precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit `config_path` doesn't exist, parsing
    /// fails, or the resulting engine URL is invalid.
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
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.engine.url = expand::expand_env(&config.engine.url, "engine.url")?;
        config.validate()?;

        Ok(config)
    }

    /// Load and parse a config file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Search for the config file in the current directory and its parents.
    fn discover_config() -> Option<PathBuf> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let candidate = dir.join(CONFIG_FILENAME);
            if candidate.is_file() {
                return Some(candidate);
            }
            if !dir.pop() {
                return None;
            }
        }
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(url) = &settings.engine_url {
            self.engine.url.clone_from(url);
        }
        if let Some(timeout_ms) = settings.timeout_ms {
            self.engine.timeout_ms = timeout_ms;
        }
        if let Some(png_dpi) = settings.png_dpi {
            self.render.png_dpi = png_dpi;
        }
    }

    /// Validate the loaded configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.engine.url, "engine.url")?;
        require_http_url(&self.engine.url, "engine.url")?;
        if self.engine.max_source_bytes == 0 {
            return Err(ConfigError::Validation(
                "engine.max_source_bytes must be positive".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}
