//! Sweep Configuration
//!
//! Connection and sweep settings. Nothing here is read ambiently by the
//! reconciler: callers load an [`EnvironmentConfig`] (usually from the
//! environment) and hand explicit values to the sweep entry point.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::error::{StorageError, StorageResult};
use crate::reconciler::SweepMode;

/// Environment variable holding the storage connection string
pub const CONNECTION_STRING_VAR: &str = "STORAGE_CONNECTION_STRING";

/// Environment variable holding the container name
pub const CONTAINER_NAME_VAR: &str = "CONTAINER_NAME";

/// Listing page size used when none is configured
pub const DEFAULT_PAGE_SIZE: usize = 5000;

/// Where the container lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// Storage connection string
    pub connection_string: String,
    /// Container identifier
    pub container_name: String,
}

impl EnvironmentConfig {
    /// Create from explicit values
    pub fn new(connection_string: impl Into<String>, container_name: impl Into<String>) -> Self {
        Self {
            connection_string: connection_string.into(),
            container_name: container_name.into(),
        }
    }

    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - STORAGE_CONNECTION_STRING: storage connection string
    /// - CONTAINER_NAME: container to sweep
    pub fn from_env() -> StorageResult<Self> {
        let connection_string = required_var(CONNECTION_STRING_VAR)?;
        let container_name = required_var(CONTAINER_NAME_VAR)?;
        Ok(Self::new(connection_string, container_name))
    }

    /// Resolve the connection string to a local storage root
    ///
    /// Accepts a plain path, a `file://` URL, or a `LocalRoot=<path>`
    /// entry in a `key=value;` connection string.
    pub fn local_root(&self) -> StorageResult<PathBuf> {
        let raw = self.connection_string.trim();

        if let Some(path) = raw.strip_prefix("file://") {
            return non_empty_path(path);
        }

        if raw.contains('=') {
            return raw
                .split(';')
                .filter_map(|pair| pair.split_once('='))
                .find(|(key, _)| key.trim().eq_ignore_ascii_case("LocalRoot"))
                .map(|(_, value)| non_empty_path(value.trim()))
                .unwrap_or_else(|| {
                    Err(StorageError::Configuration(
                        "connection string has no LocalRoot entry".to_string(),
                    ))
                });
        }

        non_empty_path(raw)
    }
}

fn required_var(name: &str) -> StorageResult<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(StorageError::Configuration(format!("{} is not set", name))),
    }
}

fn non_empty_path(path: &str) -> StorageResult<PathBuf> {
    if path.is_empty() {
        return Err(StorageError::Configuration(
            "storage root path is empty".to_string(),
        ));
    }
    Ok(PathBuf::from(path))
}

/// Options for a single sweep
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepOptions {
    /// Display or mutate
    pub mode: SweepMode,
    /// Maximum tier changes in flight at once
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

fn default_concurrency() -> usize {
    1
}

impl Default for SweepOptions {
    fn default() -> Self {
        Self {
            mode: SweepMode::Mutate,
            concurrency: default_concurrency(),
        }
    }
}

impl SweepOptions {
    /// Listing-only sweep
    pub fn display_only() -> Self {
        Self {
            mode: SweepMode::DisplayOnly,
            ..Default::default()
        }
    }

    /// Mutating sweep
    pub fn mutate() -> Self {
        Self::default()
    }

    /// Set mutation concurrency
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Validate the options
    pub fn validate(&self) -> StorageResult<()> {
        if self.concurrency == 0 {
            return Err(StorageError::Configuration(
                "concurrency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_root_forms() {
        let plain = EnvironmentConfig::new("/srv/blobs", "c");
        assert_eq!(plain.local_root().unwrap(), PathBuf::from("/srv/blobs"));

        let url = EnvironmentConfig::new("file:///srv/blobs", "c");
        assert_eq!(url.local_root().unwrap(), PathBuf::from("/srv/blobs"));

        let kv = EnvironmentConfig::new("Mode=local; LocalRoot=/srv/blobs;", "c");
        assert_eq!(kv.local_root().unwrap(), PathBuf::from("/srv/blobs"));
    }

    #[test]
    fn test_local_root_rejects_remote_connection_string() {
        let remote = EnvironmentConfig::new(
            "DefaultEndpointsProtocol=https;AccountName=acct;AccountKey=k",
            "c",
        );
        assert!(matches!(
            remote.local_root(),
            Err(StorageError::Configuration(_))
        ));

        let empty = EnvironmentConfig::new("file://", "c");
        assert!(empty.local_root().is_err());
    }

    #[test]
    fn test_sweep_options_validation() {
        assert!(SweepOptions::default().validate().is_ok());
        assert!(SweepOptions::mutate().with_concurrency(0).validate().is_err());
        assert_eq!(SweepOptions::display_only().mode, SweepMode::DisplayOnly);
    }
}
