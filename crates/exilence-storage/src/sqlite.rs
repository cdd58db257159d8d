//! SQLite implementation of [`RecordStore`].
//!
//! [`SqliteStore`] persists store records in a SQLite database with WAL mode,
//! atomic transactions on every write, and automatic schema migrations.

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{validate_name, StorageError};
use crate::hash::payload_digest;
use crate::traits::RecordStore;
use crate::types::{RecordSummary, SaveOutcome, StoredRecord};

/// SQLite-backed implementation of [`RecordStore`].
///
/// Every write operation is wrapped in a transaction for atomicity.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) a SQLite database at `path`.
    pub fn new(path: &str) -> Result<Self, StorageError> {
        let conn = crate::schema::open_database(path)?;
        Ok(SqliteStore { conn })
    }

    /// Opens an in-memory SQLite database (for testing).
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = crate::schema::open_in_memory()?;
        Ok(SqliteStore { conn })
    }

    /// Returns the stored digest for `name`, if a record exists.
    fn stored_digest(&self, name: &str) -> Result<Option<String>, StorageError> {
        let digest = self
            .conn
            .query_row(
                "SELECT payload_hash FROM records WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(digest)
    }
}

impl RecordStore for SqliteStore {
    fn load(&self, name: &str) -> Result<Option<StoredRecord>, StorageError> {
        validate_name(name)?;
        let record = self
            .conn
            .query_row(
                "SELECT name, payload, payload_hash FROM records WHERE name = ?1",
                params![name],
                |row| {
                    Ok(StoredRecord {
                        name: row.get(0)?,
                        payload: row.get(1)?,
                        payload_hash: row.get(2)?,
                    })
                },
            )
            .optional()?;

        if let Some(record) = &record {
            let actual = payload_digest(&record.payload);
            if actual != record.payload_hash {
                return Err(StorageError::IntegrityError {
                    reason: format!(
                        "payload digest mismatch for record '{}': stored {}, computed {}",
                        record.name, record.payload_hash, actual
                    ),
                });
            }
        }

        Ok(record)
    }

    fn save(&mut self, name: &str, payload: &str) -> Result<SaveOutcome, StorageError> {
        validate_name(name)?;
        let payload_hash = payload_digest(payload);
        if self.stored_digest(name)?.as_deref() == Some(payload_hash.as_str()) {
            return Ok(SaveOutcome::Unchanged);
        }

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO records (name, payload, payload_hash, updated_at)
             VALUES (?1, ?2, ?3, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
             ON CONFLICT(name) DO UPDATE SET
                 payload = excluded.payload,
                 payload_hash = excluded.payload_hash,
                 updated_at = excluded.updated_at",
            params![name, payload, payload_hash],
        )?;
        tx.commit()?;

        Ok(SaveOutcome::Written)
    }

    fn delete(&mut self, name: &str) -> Result<bool, StorageError> {
        validate_name(name)?;
        let tx = self.conn.transaction()?;
        let removed = tx.execute("DELETE FROM records WHERE name = ?1", params![name])?;
        tx.commit()?;
        Ok(removed > 0)
    }

    fn list(&self) -> Result<Vec<RecordSummary>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT name, payload_hash, length(CAST(payload AS BLOB)) FROM records ORDER BY name",
        )?;
        let rows = stmt.query_map([], |row| {
            let bytes: i64 = row.get(2)?;
            Ok(RecordSummary {
                name: row.get(0)?,
                payload_hash: row.get(1)?,
                bytes: usize::try_from(bytes).unwrap_or_default(),
            })
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}
