//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub keys: KeysConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Request parameter names read by the filter parsers
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KeysConfig {
    /// Directive parameter for geography (`geo=state:ca,tx`)
    #[serde(default = "default_geo")]
    pub geo: String,

    /// Directive parameter for source/signal (`signal=src:sig`)
    #[serde(default = "default_signal")]
    pub signal: String,

    /// Directive parameter for time (`time=day:20200419`)
    #[serde(default = "default_time")]
    pub time: String,

    /// Legacy geography marker
    #[serde(default = "default_geo_type")]
    pub geo_type: String,

    /// Legacy geography value keys, first present wins
    #[serde(default = "default_geo_values")]
    pub geo_values: Vec<String>,

    /// Legacy source/signal marker
    #[serde(default = "default_data_source")]
    pub data_source: String,

    /// Legacy signal value keys, first present wins
    #[serde(default = "default_signals")]
    pub signals: Vec<String>,

    /// Legacy time marker
    #[serde(default = "default_time_type")]
    pub time_type: String,

    /// Legacy time value key
    #[serde(default = "default_time_values")]
    pub time_values: String,
}

fn default_geo() -> String {
    "geo".to_string()
}

fn default_signal() -> String {
    "signal".to_string()
}

fn default_time() -> String {
    "time".to_string()
}

fn default_geo_type() -> String {
    "geo_type".to_string()
}

fn default_geo_values() -> Vec<String> {
    vec!["geo_values".to_string(), "geo_value".to_string()]
}

fn default_data_source() -> String {
    "data_source".to_string()
}

fn default_signals() -> Vec<String> {
    vec!["signals".to_string(), "signal".to_string()]
}

fn default_time_type() -> String {
    "time_type".to_string()
}

fn default_time_values() -> String {
    "time_values".to_string()
}

impl Default for KeysConfig {
    fn default() -> Self {
        Self {
            geo: default_geo(),
            signal: default_signal(),
            time: default_time(),
            geo_type: default_geo_type(),
            geo_values: default_geo_values(),
            data_source: default_data_source(),
            signals: default_signals(),
            time_type: default_time_type(),
            time_values: default_time_values(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
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

        Self::parse(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
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
            dirs::config_dir().map(|p| p.join("epifilter").join("config.toml")),
            Some(PathBuf::from("/etc/epifilter/config.toml")),
            Some(PathBuf::from("./config.toml")),
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

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(level) = std::env::var("EPIFILTER_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("EPIFILTER_LOG_FORMAT") {
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
    r#"# Epifilter Configuration
#
# Environment variables override these settings:
# - EPIFILTER_LOG_LEVEL
# - EPIFILTER_LOG_FORMAT

[keys]
# Directive parameters: <type>:<values>[;<type>:<values>...]
geo = "geo"
signal = "signal"
time = "time"

# Legacy parameters, used whenever their marker key is present
geo_type = "geo_type"
geo_values = ["geo_values", "geo_value"]
data_source = "data_source"
signals = ["signals", "signal"]
time_type = "time_type"
time_values = "time_values"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config_round_trips() {
        let config = Config::parse(&generate_default_config()).unwrap();
        assert_eq!(config.keys, KeysConfig::default());
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = Config::parse("[keys]\ngeo = \"region\"\n").unwrap();
        assert_eq!(config.keys.geo, "region");
        assert_eq!(config.keys.time, "time");
        assert_eq!(config.keys.signals, vec!["signals", "signal"]);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[logging]\nlevel = \"debug\"\nformat = \"json\"").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.keys.geo_type, "geo_type");
    }

    #[test]
    fn test_load_errors() {
        let missing = Config::load(Path::new("/nonexistent/epifilter.toml")).unwrap_err();
        assert!(matches!(missing, ConfigError::Io { .. }));

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[keys\ngeo = ").unwrap();
        let invalid = Config::load(file.path()).unwrap_err();
        assert!(matches!(invalid, ConfigError::Parse { .. }));
    }
}
