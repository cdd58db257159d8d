//! The [`RecordStore`] trait defining the storage contract for store records.
//!
//! All backends (InMemoryStore, SqliteStore, etc.) implement this trait,
//! ensuring they are fully swappable without changing the state layer.

use crate::error::StorageError;
use crate::types::{RecordSummary, SaveOutcome, StoredRecord};

/// The storage contract for named store records.
///
/// The trait is synchronous; the state layer wraps a backend behind an async
/// mutex so callers suspend at the storage boundary instead of blocking
/// each other.
pub trait RecordStore {
    /// Loads the record stored under `name`.
    ///
    /// An unknown name is not an error: it yields `Ok(None)`, which is what a
    /// first launch against empty storage looks like.
    fn load(&self, name: &str) -> Result<Option<StoredRecord>, StorageError>;

    /// Stores `payload` under `name`, replacing any previous record.
    ///
    /// Backends compare the payload digest with the stored one and skip the
    /// write when they match.
    fn save(&mut self, name: &str, payload: &str) -> Result<SaveOutcome, StorageError>;

    /// Removes the record stored under `name`. Returns `true` if one existed.
    fn delete(&mut self, name: &str) -> Result<bool, StorageError>;

    /// Lists all stored records, ordered by name.
    fn list(&self) -> Result<Vec<RecordSummary>, StorageError>;
}
