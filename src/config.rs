// Library Catalog - Book holdings storage
// Copyright (C) 2025 Library Catalog contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


//! Catalog configuration
//!
//! Loaded from a TOML file where every section is optional:
//!
//! ```toml
//! [database]
//! path = "/var/lib/catalog/catalog.db"
//! max_connections = 5
//! busy_timeout_secs = 30
//!
//! [validation]
//! strict_isbn = true
//!
//! [logging]
//! verbose = false
//! json = false
//! ```
//!
//! Environment overrides (applied by [`CatalogConfig::apply_env`]):
//! - `LIBRARY_CATALOG_DATABASE` - database file path
//! - `LIBRARY_CATALOG_STRICT_ISBN` - `1`/`true` enables ISBN checksum validation

use crate::error::{CatalogError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_DATABASE: &str = "LIBRARY_CATALOG_DATABASE";
pub const ENV_STRICT_ISBN: &str = "LIBRARY_CATALOG_STRICT_ISBN";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub database: DatabaseConfig,
    pub validation: ValidationConfig,
    pub logging: LoggingConfig,
}

/// SQLite connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database file; `None` means the platform default from `Database::get_default_path`
    pub path: Option<PathBuf>,
    pub max_connections: u32,
    pub busy_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: None,
            max_connections: 5,
            busy_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Require well-formed ISBN-10/ISBN-13 with a valid check digit
    pub strict_isbn: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub verbose: bool,
    pub json: bool,
}

impl CatalogConfig {
    /// Parse configuration from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: CatalogConfig = toml::from_str(contents)?;
        config.check()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Apply environment variable overrides
    pub fn apply_env(mut self) -> Self {
        if let Ok(path) = std::env::var(ENV_DATABASE) {
            if !path.is_empty() {
                self.database.path = Some(PathBuf::from(path));
            }
        }
        if let Ok(flag) = std::env::var(ENV_STRICT_ISBN) {
            self.validation.strict_isbn = matches!(flag.to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
        self
    }

    fn check(&self) -> Result<()> {
        if self.database.max_connections == 0 {
            return Err(CatalogError::ConfigurationError(
                "database.max_connections must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = CatalogConfig::from_toml("").expect("empty config should parse");
        assert!(config.database.path.is_none());
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.database.busy_timeout_secs, 30);
        assert!(!config.validation.strict_isbn);
        assert!(!config.logging.json);
    }

    #[test]
    fn test_partial_config() {
        let config = CatalogConfig::from_toml(
            r#"
            [database]
            path = "/tmp/catalog.db"

            [validation]
            strict_isbn = true
            "#,
        )
        .expect("config should parse");

        assert_eq!(config.database.path, Some(PathBuf::from("/tmp/catalog.db")));
        assert_eq!(config.database.max_connections, 5);
        assert!(config.validation.strict_isbn);
    }

    #[test]
    fn test_zero_connections_rejected() {
        let err = CatalogConfig::from_toml("[database]\nmax_connections = 0\n").unwrap_err();
        assert!(matches!(err, CatalogError::ConfigurationError(_)));
    }

    #[test]
    fn test_missing_config_file() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let err = CatalogConfig::load(dir.path().join("absent.toml")).unwrap_err();
        match err {
            CatalogError::IoError(e) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            other => panic!("expected io error, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_toml() {
        let err = CatalogConfig::from_toml("[database\npath = 1").unwrap_err();
        assert!(matches!(err, CatalogError::TomlError(_)));
    }
}
