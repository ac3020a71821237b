//! Tests for the SQLite database layer and the storage built on it.

use abu_popup::database::migrations::{get_schema_version, CURRENT_SCHEMA_VERSION};
use abu_popup::database::Database;
use abu_popup::services::storage::{KeyValueStore, SqliteStorage, PAGE_STATISTIC_KEY};
use tempfile::TempDir;

#[test]
fn test_open_in_memory_runs_migrations() {
    let db = Database::open_in_memory().unwrap();
    assert_eq!(get_schema_version(db.connection()), CURRENT_SCHEMA_VERSION);

    let count: i64 = db
        .connection()
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'local_storage'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn test_migrations_are_idempotent() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("test.db");

    drop(Database::open(&path).unwrap());
    let db = Database::open(&path).unwrap();

    let versions: i64 = db
        .connection()
        .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
        .unwrap();
    assert_eq!(versions, 1);
}

#[test]
fn test_storage_survives_reopen() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("test.db");

    {
        let storage = SqliteStorage::open(&path).unwrap();
        storage.set(PAGE_STATISTIC_KEY, r#"{"totalBlocked":42}"#).unwrap();
    }

    let storage = SqliteStorage::open(&path).unwrap();
    assert_eq!(
        storage.get(PAGE_STATISTIC_KEY).unwrap().as_deref(),
        Some(r#"{"totalBlocked":42}"#)
    );
}

#[test]
fn test_storage_overwrite_keeps_single_row() {
    let storage = SqliteStorage::open_in_memory().unwrap();
    storage.set("user-rank", "1").unwrap();
    storage.set("user-rank", "2").unwrap();
    assert_eq!(storage.get("user-rank").unwrap().as_deref(), Some("2"));
}

#[test]
fn test_storage_remove_missing_key_is_ok() {
    let storage = SqliteStorage::open_in_memory().unwrap();
    storage.remove("never-set").unwrap();
    assert_eq!(storage.get("never-set").unwrap(), None);
}
