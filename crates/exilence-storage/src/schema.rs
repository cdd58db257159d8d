//! Database layout for [`SqliteStore`](crate::SqliteStore).
//!
//! The `records` table layout is versioned through `user_version`, with each
//! revision embedded from `migrations/`. This tracks the table layout only.
//! The JSON inside `payload` is versioned by the `migration` record that the
//! state layer keeps in the table itself.

use std::time::Duration;

use rusqlite::Connection;
use rusqlite_migration::{Migrations, M};

use crate::error::StorageError;

/// Time a writer waits for another process holding the database lock.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

fn layout_revisions() -> Migrations<'static> {
    Migrations::new(vec![M::up(include_str!("migrations/001_initial_schema.sql"))])
}

/// Opens the record database at `path`, creating the file and the `records`
/// table on first use.
pub fn open_database(path: &str) -> Result<Connection, StorageError> {
    prepare(Connection::open(path)?)
}

/// Opens a private in-memory record database.
pub fn open_in_memory() -> Result<Connection, StorageError> {
    prepare(Connection::open_in_memory()?)
}

fn prepare(mut conn: Connection) -> Result<Connection, StorageError> {
    // A relaunch while the previous process is still closing waits instead of
    // failing with SQLITE_BUSY.
    conn.busy_timeout(BUSY_TIMEOUT)?;
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;

    layout_revisions()
        .to_latest(&mut conn)
        .map_err(|err| StorageError::Migration(format!("records layout upgrade failed: {err}")))?;
    Ok(conn)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_version(conn: &Connection) -> i64 {
        conn.query_row("PRAGMA user_version", [], |row| row.get(0)).unwrap()
    }

    #[test]
    fn test_layout_revisions_are_valid() {
        assert!(layout_revisions().validate().is_ok());
    }

    #[test]
    fn test_open_in_memory_creates_records_table() {
        let conn = open_in_memory().unwrap();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'records'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(user_version(&conn), 1);
    }

    #[test]
    fn test_file_database_uses_wal_and_reopens_at_same_revision() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.db");
        let path = path.to_str().unwrap();

        let conn = open_database(path).unwrap();
        let mode: String = conn
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");
        drop(conn);

        let reopened = open_database(path).unwrap();
        assert_eq!(user_version(&reopened), 1);
    }
}
