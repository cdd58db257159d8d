//! In-memory implementation of [`RecordStore`].
//!
//! [`InMemoryStore`] is a first-class backend for tests, ephemeral sessions,
//! and anywhere persistence isn't needed. It keeps records in a `BTreeMap`
//! with identical semantics to the SQLite backend.

use std::collections::BTreeMap;

use crate::error::{validate_name, StorageError};
use crate::hash::payload_digest;
use crate::traits::RecordStore;
use crate::types::{RecordSummary, SaveOutcome, StoredRecord};

/// In-memory record store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    records: BTreeMap<String, StoredRecord>,
    /// Number of writes that actually changed a record.
    writes: u64,
}

impl InMemoryStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `(name, payload)` records.
    pub fn with_records<I, K, V>(records: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut store = Self::new();
        for (name, payload) in records {
            let name = name.into();
            let payload = payload.into();
            let payload_hash = payload_digest(&payload);
            store.records.insert(
                name.clone(),
                StoredRecord {
                    name,
                    payload,
                    payload_hash,
                },
            );
        }
        store
    }

    /// Number of writes that changed a record since creation.
    pub fn write_count(&self) -> u64 {
        self.writes
    }
}

impl RecordStore for InMemoryStore {
    fn load(&self, name: &str) -> Result<Option<StoredRecord>, StorageError> {
        validate_name(name)?;
        Ok(self.records.get(name).cloned())
    }

    fn save(&mut self, name: &str, payload: &str) -> Result<SaveOutcome, StorageError> {
        validate_name(name)?;
        let payload_hash = payload_digest(payload);
        if let Some(existing) = self.records.get(name) {
            if existing.payload_hash == payload_hash {
                return Ok(SaveOutcome::Unchanged);
            }
        }
        self.records.insert(
            name.to_string(),
            StoredRecord {
                name: name.to_string(),
                payload: payload.to_string(),
                payload_hash,
            },
        );
        self.writes += 1;
        Ok(SaveOutcome::Written)
    }

    fn delete(&mut self, name: &str) -> Result<bool, StorageError> {
        validate_name(name)?;
        Ok(self.records.remove(name).is_some())
    }

    fn list(&self) -> Result<Vec<RecordSummary>, StorageError> {
        Ok(self
            .records
            .values()
            .map(|record| RecordSummary {
                name: record.name.clone(),
                payload_hash: record.payload_hash.clone(),
                bytes: record.payload.len(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_unknown_name_is_empty() {
        let store = InMemoryStore::new();
        assert_eq!(store.load("account").unwrap(), None);
    }

    #[test]
    fn test_save_then_load() {
        let mut store = InMemoryStore::new();
        let outcome = store.save("league", r#"{"leagues":[]}"#).unwrap();
        assert_eq!(outcome, SaveOutcome::Written);

        let record = store.load("league").unwrap().unwrap();
        assert_eq!(record.name, "league");
        assert_eq!(record.payload, r#"{"leagues":[]}"#);
        assert_eq!(record.payload_hash, payload_digest(r#"{"leagues":[]}"#));
    }

    #[test]
    fn test_identical_save_is_skipped() {
        let mut store = InMemoryStore::new();
        store.save("setting", r#"{"ui_scale":100}"#).unwrap();
        let outcome = store.save("setting", r#"{"ui_scale":100}"#).unwrap();
        assert_eq!(outcome, SaveOutcome::Unchanged);
        assert_eq!(store.write_count(), 1);

        store.save("setting", r#"{"ui_scale":120}"#).unwrap();
        assert_eq!(store.write_count(), 2);
    }

    #[test]
    fn test_delete() {
        let mut store = InMemoryStore::with_records([("uiState", "{}")]);
        assert!(store.delete("uiState").unwrap());
        assert!(!store.delete("uiState").unwrap());
        assert_eq!(store.load("uiState").unwrap(), None);
    }

    #[test]
    fn test_list_is_ordered_by_name() {
        let store = InMemoryStore::with_records([
            ("setting", "{}"),
            ("account", "{\"accounts\":[]}"),
            ("league", "{}"),
        ]);
        let names: Vec<_> = store.list().unwrap().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["account", "league", "setting"]);
        assert_eq!(store.list().unwrap()[0].bytes, 15);
    }

    #[test]
    fn test_blank_name_rejected() {
        let mut store = InMemoryStore::new();
        assert!(matches!(
            store.save("  ", "{}"),
            Err(StorageError::InvalidName { .. })
        ));
        assert!(store.load("").is_err());
    }
}
