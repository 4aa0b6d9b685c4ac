//! Core error types for pomotick-core.
//!
//! The hierarchy mirrors the layers of the crate: repository failures,
//! configuration-file failures, and a top-level `CoreError` that wraps both.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for pomotick-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Repository-related errors
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors produced by an interval repository or by the lifecycle operations
/// that read and write through it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// The store holds no intervals yet. Callers treat this as a normal
    /// condition and create the first interval.
    #[error("No intervals")]
    NoIntervals,

    /// No interval with this ID exists.
    #[error("Invalid ID: {0}")]
    InvalidId(i64),

    /// A stored row carries a state code outside the known set.
    #[error("Invalid state code: {0}")]
    InvalidState(i64),

    /// Pause was requested on an interval that is not running.
    #[error("Interval not running")]
    IntervalNotRunning,

    /// Start was requested on an interval that is done or cancelled.
    #[error("Interval is completed or cancelled")]
    IntervalCompleted,

    /// Generic persistence failure.
    #[error("Storage failure: {0}")]
    Storage(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration schema
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Data directory could not be located or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::QueryReturnedNoRows => RepositoryError::NoIntervals,
            other => RepositoryError::Storage(other.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_rows_maps_to_no_intervals() {
        let err: RepositoryError = rusqlite::Error::QueryReturnedNoRows.into();
        assert_eq!(err, RepositoryError::NoIntervals);
    }

    #[test]
    fn repository_error_wraps_into_core_error() {
        let err: CoreError = RepositoryError::InvalidId(7).into();
        assert!(matches!(err, CoreError::Repository(RepositoryError::InvalidId(7))));
        assert_eq!(err.to_string(), "Repository error: Invalid ID: 7");
    }

    #[test]
    fn invalid_state_names_the_code() {
        assert_eq!(
            RepositoryError::InvalidState(9).to_string(),
            "Invalid state code: 9"
        );
    }
}
