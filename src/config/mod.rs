//! Configuration management for proffy
//!
//! This module handles loading and validating configuration from environment variables,
//! files, and command-line arguments.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Database configuration
    pub database: DatabaseConfig,

    /// HTTP server configuration
    pub server: ServerConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database path
    pub sqlite_path: PathBuf,

    /// How long a writer waits on a locked database, in milliseconds
    pub busy_timeout_ms: u64,
}

impl DatabaseConfig {
    #[must_use]
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind, e.g. `0.0.0.0:3333`
    pub bind_address: String,

    /// Enable permissive CORS
    pub enable_cors: bool,

    /// Log every request through the tracing layer
    pub enable_request_logging: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let sqlite_path = std::env::var("PROFFY_SQLITE_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.database.sqlite_path);

        let busy_timeout_ms = std::env::var("PROFFY_BUSY_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults.database.busy_timeout_ms);

        let bind_address =
            std::env::var("PROFFY_BIND_ADDRESS").unwrap_or(defaults.server.bind_address);

        let enable_cors = std::env::var("PROFFY_ENABLE_CORS")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(defaults.server.enable_cors);

        let log_level = std::env::var("PROFFY_LOG_LEVEL").unwrap_or(defaults.logging.level);

        let log_format = std::env::var("PROFFY_LOG_FORMAT").unwrap_or(defaults.logging.format);

        Ok(Self {
            database: DatabaseConfig {
                sqlite_path,
                busy_timeout_ms,
            },
            server: ServerConfig {
                bind_address,
                enable_cors,
                enable_request_logging: true,
            },
            logging: LoggingConfig {
                level: log_level,
                format: log_format,
            },
        })
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load from `path` when given, otherwise from the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::from_env()?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Apply command-line overrides and validate the result
    pub fn with_overrides(
        mut self,
        log_format: Option<String>,
        bind_address: Option<String>,
    ) -> Result<Self> {
        if let Some(format) = log_format {
            self.logging.format = format;
        }
        if let Some(bind) = bind_address {
            self.server.bind_address = bind;
        }
        self.validate()?;
        Ok(self)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.database.sqlite_path.as_os_str().is_empty() {
            anyhow::bail!("sqlite_path must not be empty");
        }

        self.bind_address()?;

        if !matches!(self.logging.format.as_str(), "text" | "json") {
            anyhow::bail!(
                "log format must be 'text' or 'json', got '{}'",
                self.logging.format
            );
        }

        Ok(())
    }

    /// Parsed bind address
    pub fn bind_address(&self) -> Result<SocketAddr> {
        self.server
            .bind_address
            .parse()
            .with_context(|| format!("Invalid bind address: {}", self.server.bind_address))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                sqlite_path: PathBuf::from("data/proffy.db"),
                busy_timeout_ms: 5000,
            },
            server: ServerConfig {
                bind_address: String::from("0.0.0.0:3333"),
                enable_cors: true,
                enable_request_logging: true,
            },
            logging: LoggingConfig {
                level: String::from("info"),
                format: String::from("text"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_bind_address() {
        let mut config = Config::default();
        config.server.bind_address = "not-an-address".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_log_format() {
        let mut config = Config::default();
        config.logging.format = "xml".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides_are_validated() {
        let result = Config::default().with_overrides(Some("xml".to_string()), None);
        assert!(result.is_err());

        let result = Config::default().with_overrides(None, Some("nowhere".to_string()));
        assert!(result.is_err());

        let config = Config::default()
            .with_overrides(Some("json".to_string()), Some("127.0.0.1:8080".to_string()))
            .unwrap();
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.server.bind_address, "127.0.0.1:8080");
    }

    #[test]
    fn test_empty_sqlite_path() {
        let mut config = Config::default();
        config.database.sqlite_path = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_busy_timeout_conversion() {
        let config = Config::default();
        assert_eq!(config.database.busy_timeout(), Duration::from_secs(5));
    }
}
