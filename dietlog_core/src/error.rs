//! Error types for the dietlog_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for dietlog_core operations
///
/// Rejected user input (blank exercise names, non-numeric weights) is not an
/// error: ledgers report it through `Option`/`bool` returns and leave state
/// untouched.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A persisted key could not be read or written
    #[error("storage unavailable for '{key}': {source}")]
    StorageUnavailable {
        key: String,
        #[source]
        source: io::Error,
    },

    /// A persisted key exists but its contents do not decode
    #[error("corrupt record at '{key}': {source}")]
    CorruptRecord {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// True when the failure came from the persistence layer.
    ///
    /// Callers use this to fall back to an empty or default in-memory state.
    pub fn is_storage_failure(&self) -> bool {
        matches!(
            self,
            Error::StorageUnavailable { .. } | Error::CorruptRecord { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_failures_are_classified() {
        let unavailable = Error::StorageUnavailable {
            key: "water-2024-01-01".into(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(unavailable.is_storage_failure());
        assert!(unavailable.to_string().contains("water-2024-01-01"));

        let corrupt = Error::CorruptRecord {
            key: "weight-entries".into(),
            source: serde_json::from_str::<u32>("nope").unwrap_err(),
        };
        assert!(corrupt.is_storage_failure());

        assert!(!Error::Config("bad".into()).is_storage_failure());
    }
}
