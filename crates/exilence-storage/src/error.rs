//! Storage error types for exilence-storage.
//!
//! [`StorageError`] covers the failure modes of the storage layer: the
//! embedded database itself, its schema migrations, and invalid record names.

use thiserror::Error;

/// Errors produced by storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The underlying SQLite database reported an error.
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    /// Applying the embedded database schema migrations failed.
    #[error("schema migration error: {0}")]
    Migration(String),

    /// A record name was rejected before reaching the backend.
    #[error("invalid record name: {name:?}")]
    InvalidName { name: String },

    /// A data integrity violation was detected.
    #[error("integrity error: {reason}")]
    IntegrityError { reason: String },
}

/// Rejects names no store could ever be registered under.
pub(crate) fn validate_name(name: &str) -> Result<(), StorageError> {
    if name.trim().is_empty() {
        return Err(StorageError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}
