//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use crate::timeline::IndexConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub index: IndexConfig,

    #[serde(default)]
    pub import: ImportConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// CSV import configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImportConfig {
    /// Column holding the event date (0-indexed)
    #[serde(default)]
    pub date_column: usize,

    /// Column holding the numeric value
    #[serde(default = "default_value_column")]
    pub value_column: usize,

    /// Optional column holding a free-text label
    #[serde(default)]
    pub label_column: Option<usize>,

    /// strftime format of the date column
    #[serde(default = "default_date_format")]
    pub date_format: String,

    #[serde(default = "default_has_header")]
    pub has_header: bool,

    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

fn default_value_column() -> usize {
    1
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_has_header() -> bool {
    true
}

fn default_delimiter() -> char {
    ','
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            date_column: 0,
            value_column: default_value_column(),
            label_column: None,
            date_format: default_date_format(),
            has_header: default_has_header(),
            delimiter: default_delimiter(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("almanac").join("config.toml")),
            Some(PathBuf::from("./almanac.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // Index overrides
        if let Some(seek) = var("ALMANAC_SEEK_INDEX") {
            match seek.parse() {
                Ok(enabled) => self.index.seek_index = enabled,
                Err(_) => {
                    tracing::warn!("Ignoring ALMANAC_SEEK_INDEX={:?}: expected true/false", seek)
                }
            }
        }

        // Import overrides
        if let Some(format) = var("ALMANAC_DATE_FORMAT") {
            self.import.date_format = format;
        }

        // Logging overrides
        if let Some(level) = var("ALMANAC_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("ALMANAC_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Almanac Configuration
#
# Environment variables override these settings:
# - ALMANAC_SEEK_INDEX
# - ALMANAC_DATE_FORMAT
# - ALMANAC_LOG_LEVEL
# - ALMANAC_LOG_FORMAT

[index]
# Keep year/month/day seek anchors for range queries
seek_index = true

[import]
# Column holding the event date (0-indexed)
date_column = 0

# Column holding the numeric value
value_column = 1

# Optional column holding a label
# label_column = 2

# strftime format of the date column
date_format = "%Y-%m-%d"

# Whether the first row is a header
has_header = true

# Field delimiter
delimiter = ","

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
