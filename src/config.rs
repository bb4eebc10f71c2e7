//! Configuration file handling for database connections.
//!
//! This module provides loading and parsing of `.strategy_schema.json`
//! configuration files. The file is optional; without it, settings come from
//! the environment (`DB_NAME`, `DB_USER`, `DB_PORT`, ...).

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::{DatabaseConfig, PostgresConfig};

/// File name looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = ".strategy_schema.json";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid port '{value}': expected an integer between 1 and 65535")]
    InvalidPort { value: String },

    #[error("Invalid schema name '{value}': expected a lowercase SQL identifier")]
    InvalidSchema { value: String },

    #[error("Invalid database URL: {message}")]
    InvalidUrl { message: String },

    #[error("Configuration file not found: {path}")]
    NotFound { path: String },

    #[error("Failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("Invalid JSON in {path}: {message}")]
    Parse { path: String, message: String },
}

/// Top-level configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Database configuration
    pub database: DatabaseConfigFile,
}

/// Database configuration variants.
///
/// JSON format uses a "type" field with lowercase variant names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DatabaseConfigFile {
    /// PostgreSQL server; missing fields take the environment defaults.
    Postgres(PostgresConfig),
    /// In-process catalog, nothing persists.
    Memory {
        #[serde(default = "default_memory_database")]
        database: String,
    },
}

fn default_memory_database() -> String {
    PostgresConfig::default().database
}

impl ConfigFile {
    /// Load configuration from an explicit path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file doesn't exist
    /// - The file cannot be read
    /// - The JSON is invalid
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();

        if !path.exists() {
            return Err(ConfigError::NotFound { path: display });
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: display.clone(),
            message: e.to_string(),
        })?;

        serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
            path: display,
            message: e.to_string(),
        })
    }

    /// Load `.strategy_schema.json` from `dir` if it exists.
    pub fn load_in(dir: &Path) -> Result<Option<Self>, ConfigError> {
        let path: PathBuf = dir.join(DEFAULT_CONFIG_FILE);
        if !path.exists() {
            return Ok(None);
        }
        Self::load_from(&path).map(Some)
    }
}

impl DatabaseConfigFile {
    /// Convert this configuration to a DatabaseConfig.
    pub fn to_database_config(&self) -> DatabaseConfig {
        match self {
            Self::Postgres(pg_config) => DatabaseConfig::Postgres(pg_config.clone()),
            Self::Memory { database } => DatabaseConfig::Memory {
                database: database.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_postgres_with_individual_fields() {
        let json = r#"
        {
            "database": {
                "type": "postgres",
                "host": "db.internal",
                "user": "admin",
                "database": "arena",
                "port": 5432,
                "password": "secret"
            }
        }
        "#;
        let config: ConfigFile = serde_json::from_str(json).unwrap();
        match config.database {
            DatabaseConfigFile::Postgres(pg_config) => {
                assert_eq!(pg_config.host, "db.internal");
                assert_eq!(pg_config.user, "admin");
                assert_eq!(pg_config.database, "arena");
                assert_eq!(pg_config.port, 5432);
                assert_eq!(pg_config.password, Some("secret".to_string()));
            }
            _ => panic!("Expected Postgres variant"),
        }
    }

    #[test]
    fn test_postgres_missing_fields_use_defaults() {
        let json = r#"{ "database": { "type": "postgres" } }"#;
        let config: ConfigFile = serde_json::from_str(json).unwrap();
        match config.database {
            DatabaseConfigFile::Postgres(pg_config) => {
                assert_eq!(pg_config.database, "myapp");
                assert_eq!(pg_config.user, "appuser");
                assert_eq!(pg_config.port, 5000);
                assert_eq!(pg_config.host, "localhost");
                assert_eq!(pg_config.password, None);
            }
            _ => panic!("Expected Postgres variant"),
        }
    }

    #[test]
    fn test_memory_deserialization() {
        let json = r#"{ "database": { "type": "memory" } }"#;
        let config: ConfigFile = serde_json::from_str(json).unwrap();
        match config.database {
            DatabaseConfigFile::Memory { database } => assert_eq!(database, "myapp"),
            _ => panic!("Expected Memory variant"),
        }
    }

    #[test]
    fn test_unknown_type_rejected() {
        let json = r#"{ "database": { "type": "sqlite", "path": "./x.db" } }"#;
        assert!(serde_json::from_str::<ConfigFile>(json).is_err());
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ConfigFile::load_from(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_load_from_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{ invalid json }").unwrap();
        file.flush().unwrap();

        let err = ConfigFile::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_load_from_valid_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{ "database": { "type": "postgres", "port": 6543 } }"#)
            .unwrap();
        file.flush().unwrap();

        let config = ConfigFile::load_from(file.path()).unwrap();
        match config.database.to_database_config() {
            DatabaseConfig::Postgres(pg) => assert_eq!(pg.port, 6543),
            _ => panic!("Expected Postgres variant"),
        }
    }

    #[test]
    fn test_load_in_without_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ConfigFile::load_in(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_load_in_with_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(DEFAULT_CONFIG_FILE),
            r#"{ "database": { "type": "memory", "database": "scratch" } }"#,
        )
        .unwrap();

        let config = ConfigFile::load_in(dir.path()).unwrap().unwrap();
        match config.database.to_database_config() {
            DatabaseConfig::Memory { database } => assert_eq!(database, "scratch"),
            _ => panic!("Expected Memory variant"),
        }
    }
}
