//! Configuration module for CloudStore.

use serde::Deserialize;
use std::path::Path;

use crate::{CloudStoreError, Result};

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
    /// Path to the session pointer file.
    ///
    /// Empty means "derive from the database path" (`<path>.session`).
    #[serde(default)]
    pub session_file: String,
}

fn default_db_path() -> String {
    "data/cloudstore.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            session_file: String::new(),
        }
    }
}

impl DatabaseConfig {
    /// Resolve the session pointer file path.
    pub fn session_file_path(&self) -> String {
        if self.session_file.is_empty() {
            format!("{}.session", self.path)
        } else {
            self.session_file.clone()
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/cloudstore.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(CloudStoreError::Io)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| CloudStoreError::Config(format!("config parse error: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.database.path, "data/cloudstore.db");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.file, "logs/cloudstore.log");
    }

    #[test]
    fn test_parse_empty() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.database.path, "data/cloudstore.db");
    }

    #[test]
    fn test_parse_partial() {
        let config = Config::parse(
            r#"
[database]
path = "tmp/test.db"
"#,
        )
        .unwrap();
        assert_eq!(config.database.path, "tmp/test.db");
        // Unset sections fall back to defaults
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_full() {
        let config = Config::parse(
            r#"
[database]
path = "tmp/test.db"
session_file = "tmp/test.session"

[logging]
level = "debug"
file = "tmp/test.log"
"#,
        )
        .unwrap();
        assert_eq!(config.database.session_file, "tmp/test.session");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_parse_invalid() {
        assert!(Config::parse("not [valid toml").is_err());
    }

    #[test]
    fn test_session_file_derived_from_db_path() {
        let config = Config::parse(
            r#"
[database]
path = "tmp/test.db"
"#,
        )
        .unwrap();
        assert_eq!(config.database.session_file_path(), "tmp/test.db.session");
    }

    #[test]
    fn test_session_file_explicit() {
        let mut config = Config::default();
        config.database.session_file = "elsewhere/ptr".to_string();
        assert_eq!(config.database.session_file_path(), "elsewhere/ptr");
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load("no/such/config.toml");
        assert!(matches!(result, Err(CloudStoreError::Io(_))));
    }
}
