//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `homeserver.toml` in the working directory unless another path
//! is given. Every field has a default so the file is optional. Environment
//! variables take precedence over file values. Command-line flags are applied
//! on top through the callback given to [`Config::load`], before validation.

use std::path::Path;
use std::time::Duration;

use homeserver_adapter_http_reqwest::client::DEFAULT_BASE_URL;
use serde::Deserialize;

/// Default config file, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "homeserver.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend API settings.
    pub api: ApiConfig,
    /// Which backend implementation to talk to.
    pub backend: BackendConfig,
    /// Live dashboard settings.
    pub dashboard: DashboardConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// REST backend location.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL all endpoint paths are appended to.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub kind: BackendKind,
}

/// Backend implementation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// The REST API of a real home server.
    #[default]
    Http,
    /// In-memory simulation, no network involved.
    Virtual,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Seconds between two refreshes of `watch`.
    pub refresh_secs: u64,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `path` (if present), apply
    /// environment-variable overrides, then `flags`, then validate.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, an
    /// override does not parse, or the result fails validation.
    pub fn load(path: &Path, flags: impl FnOnce(&mut Self)) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(path)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        flags(&mut config);
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(
        &mut self,
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(val) = var("HOMESERVER_API_URL") {
            self.api.base_url = val;
        }
        if let Some(val) = var("HOMESERVER_TIMEOUT_SECS") {
            self.api.timeout_secs = val.trim().parse().map_err(|_| {
                ConfigError::Validation(format!("HOMESERVER_TIMEOUT_SECS is not a number: {val}"))
            })?;
        }
        if let Some(val) = var("HOMESERVER_BACKEND") {
            self.backend.kind = match val.trim().to_ascii_lowercase().as_str() {
                "http" => BackendKind::Http,
                "virtual" => BackendKind::Virtual,
                _ => {
                    return Err(ConfigError::Validation(format!(
                        "HOMESERVER_BACKEND must be 'http' or 'virtual', got '{val}'"
                    )));
                }
            };
        }
        if let Some(val) = var("HOMESERVER_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for a zero timeout or refresh
    /// interval, or a base URL that is not `http(s)`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::Validation("timeout must be non-zero".to_string()));
        }
        if self.dashboard.refresh_secs == 0 {
            return Err(ConfigError::Validation(
                "dashboard refresh interval must be non-zero".to_string(),
            ));
        }
        if self.backend.kind == BackendKind::Http
            && !(self.api.base_url.starts_with("http://")
                || self.api.base_url.starts_with("https://"))
        {
            return Err(ConfigError::Validation(format!(
                "api base_url must start with http:// or https://, got '{}'",
                self.api.base_url
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    #[must_use]
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.dashboard.refresh_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self { refresh_secs: 3 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
