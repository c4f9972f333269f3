//! Explicit backend configuration.
//!
//! # Responsibility
//! - Describe every knob a backend constructor needs as plain data.
//! - Parse a JSON configuration document supplied by the caller.
//!
//! # Invariants
//! - Nothing in this crate reads the process environment; callers build or
//!   parse a config and pass it to constructors.
//! - Every field has a default, so partial documents are accepted.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_DATABASE_NAME: &str = "datakit";
const DEFAULT_COLLECTION_NAME: &str = "documents";

/// Settings for [`crate::repo::FileRepository`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRepoConfig {
    /// Parent of the per-instance directory. `None` means the OS temp dir.
    pub root_dir: Option<PathBuf>,
}

/// Settings for [`crate::db::open_db`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SqlConfig {
    /// Database file. `None` opens an in-memory database.
    pub path: Option<PathBuf>,
    pub busy_timeout_ms: u64,
    pub foreign_keys: bool,
}

impl Default for SqlConfig {
    fn default() -> Self {
        Self {
            path: None,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            foreign_keys: true,
        }
    }
}

/// Names used to address a document collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    pub database: String,
    pub collection: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            database: DEFAULT_DATABASE_NAME.to_string(),
            collection: DEFAULT_COLLECTION_NAME.to_string(),
        }
    }
}

/// Aggregate configuration for all backends.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub file: FileRepoConfig,
    pub sql: SqlConfig,
    pub document: DocumentConfig,
}

impl StoreConfig {
    /// Parses a JSON configuration document.
    ///
    /// # Errors
    /// - Returns `ConfigError::Parse` when `text` is not valid JSON or a
    ///   field has the wrong type.
    /// - Returns `ConfigError::Invalid` when a collection or database name
    ///   is blank.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.document.database.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "document.database cannot be empty".to_string(),
            ));
        }
        if self.document.collection.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "document.collection cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "failed to parse configuration: {err}"),
            Self::Invalid(message) => write!(f, "invalid configuration: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, StoreConfig};
    use std::path::PathBuf;

    #[test]
    fn empty_document_uses_defaults() {
        let config = StoreConfig::from_json_str("{}").unwrap();
        assert_eq!(config, StoreConfig::default());
        assert_eq!(config.sql.busy_timeout_ms, 5_000);
        assert!(config.sql.path.is_none());
    }

    #[test]
    fn partial_document_overrides_selected_fields() {
        let config = StoreConfig::from_json_str(
            r#"{"file": {"root_dir": "/var/lib/datakit"}, "document": {"collection": "users"}}"#,
        )
        .unwrap();

        assert_eq!(
            config.file.root_dir,
            Some(PathBuf::from("/var/lib/datakit"))
        );
        assert_eq!(config.document.collection, "users");
        assert_eq!(config.document.database, "datakit");
    }

    #[test]
    fn blank_collection_name_is_rejected() {
        let err = StoreConfig::from_json_str(r#"{"document": {"collection": " "}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn wrong_field_type_is_a_parse_error() {
        let err = StoreConfig::from_json_str(r#"{"sql": {"busy_timeout_ms": "soon"}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
