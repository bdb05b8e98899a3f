//! Error types for portsweep.
//!
//! Uses `thiserror` for ergonomic error definitions.

use std::path::PathBuf;
use thiserror::Error;

use crate::types::{PortError, ResolveError};

/// Errors that escape the probe engine.
///
/// Every other per-port failure is absorbed into a closed classification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unable to resolve host: {0}")]
    UnresolvableHost(String),
}

impl From<PortError> for ScanError {
    fn from(err: PortError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

impl From<ResolveError> for ScanError {
    fn from(err: ResolveError) -> Self {
        Self::UnresolvableHost(err.to_string())
    }
}

/// Result type alias for scan operations.
pub type Result<T, E = ScanError> = std::result::Result<T, E>;

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine a home directory for configuration")]
    DirectoryNotFound,

    #[error("failed to read {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("invalid configuration format: {0}")]
    InvalidFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Persistence errors for the results file and scan history.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage directory error: {0}")]
    DirectoryError(String),

    #[error("failed to save: {0}")]
    SaveFailed(String),

    #[error("failed to load: {0}")]
    LoadFailed(String),

    #[error("scan not found: {0}")]
    ScanNotFound(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Top-level error for command handlers.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl From<PortError> for CliError {
    fn from(err: PortError) -> Self {
        Self::Scan(err.into())
    }
}

pub type CliResult<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_error_is_invalid_input() {
        let err: ScanError = PortError::InvalidRange(100, 50).into();
        assert!(matches!(err, ScanError::InvalidInput(_)));
        assert!(err.to_string().contains("100"));
    }

    #[test]
    fn test_resolve_error_is_unresolvable() {
        let err: ScanError = ResolveError::NoAddresses("nowhere.invalid".into()).into();
        assert!(matches!(err, ScanError::UnresolvableHost(_)));
    }
}
