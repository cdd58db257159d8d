//! On-disk persistence tests for the SQLite backend.
//!
//! Each test opens a database in a fresh temp directory, writes through one
//! `SqliteStore`, drops it, and reopens the file the way a second process
//! launch would.

use exilence_storage::{RecordStore, SaveOutcome, SqliteStore, StorageError};

fn db_path(dir: &tempfile::TempDir) -> String {
    dir.path().join("exilence-next.db").to_string_lossy().to_string()
}

#[test]
fn test_writes_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = db_path(&dir);

    {
        let mut store = SqliteStore::new(&path).unwrap();
        store.save("migration", r#"{"current":1,"latest":1}"#).unwrap();
        store.save("setting", r#"{"ui_scale":110}"#).unwrap();
    }

    let store = SqliteStore::new(&path).unwrap();
    let migration = store.load("migration").unwrap().unwrap();
    assert_eq!(migration.payload, r#"{"current":1,"latest":1}"#);
    let names: Vec<_> = store.list().unwrap().into_iter().map(|r| r.name).collect();
    assert_eq!(names, vec!["migration", "setting"]);
}

#[test]
fn test_fresh_database_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStore::new(&db_path(&dir)).unwrap();
    assert!(store.list().unwrap().is_empty());
    assert!(store.load("account").unwrap().is_none());
}

#[test]
fn test_reopen_keeps_digest_for_skip() {
    let dir = tempfile::tempdir().unwrap();
    let path = db_path(&dir);

    {
        let mut store = SqliteStore::new(&path).unwrap();
        store.save("league", r#"{"leagues":[]}"#).unwrap();
    }

    let mut store = SqliteStore::new(&path).unwrap();
    assert_eq!(
        store.save("league", r#"{"leagues":[]}"#).unwrap(),
        SaveOutcome::Unchanged
    );
}

#[test]
fn test_unopenable_path_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir
        .path()
        .join("missing")
        .join("nested")
        .join("db.sqlite")
        .to_string_lossy()
        .to_string();
    assert!(matches!(SqliteStore::new(&path), Err(StorageError::Sqlite(_))));
}
