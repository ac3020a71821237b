//! Durable key-value storage used by the stats store and rank engine.
//!
//! Values are opaque strings, the same contract the extension's
//! `localStorage` offers. Two backends: SQLite for the real extension
//! session and an in-process map for embedding and tests.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::{params, OptionalExtension};

use crate::database::connection::Database;
use crate::types::errors::StorageError;

/// Key holding the JSON-encoded [`BlockedStats`](crate::types::stats::BlockedStats).
pub const PAGE_STATISTIC_KEY: &str = "page-statistic";
/// Key holding the current rank level.
pub const USER_RANK_KEY: &str = "user-rank";
/// Key holding the "user has rated" flag.
pub const USER_RATED_KEY: &str = "user-rated";
/// Key holding the "show promotion badge again" flag.
pub const USER_SHOW_BADGE_KEY: &str = "user-show-badge";

/// Trait defining the persistence contract.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// SQLite-backed store writing to the `local_storage` table.
pub struct SqliteStorage {
    db: Mutex<Database>,
}

impl SqliteStorage {
    pub fn new(db: Database) -> Self {
        Self { db: Mutex::new(db) }
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        Ok(Self::new(Database::open(path)?))
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        Ok(Self::new(Database::open_in_memory()?))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Database>, StorageError> {
        self.db
            .lock()
            .map_err(|e| StorageError::DatabaseError(format!("storage lock poisoned: {}", e)))
    }

    fn now_ts() -> i64 {
        SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs() as i64
    }
}

impl KeyValueStore for SqliteStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let db = self.lock()?;
        db.connection()
            .query_row(
                "SELECT value FROM local_storage WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| StorageError::ReadError(format!("{}: {}", key, e)))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let db = self.lock()?;
        db.connection()
            .execute(
                "INSERT INTO local_storage (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, value, Self::now_ts()],
            )
            .map_err(|e| StorageError::WriteError(format!("{}: {}", key, e)))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let db = self.lock()?;
        db.connection()
            .execute("DELETE FROM local_storage WHERE key = ?1", params![key])
            .map_err(|e| StorageError::WriteError(format!("{}: {}", key, e)))?;
        Ok(())
    }
}

/// In-process store. Counts writes and can be told to fail them.
#[derive(Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
    writes: AtomicUsize,
    fail_writes: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `set` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Makes every subsequent `set`/`remove` fail until switched back.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, String>>, StorageError> {
        self.values
            .lock()
            .map_err(|e| StorageError::ReadError(format!("storage lock poisoned: {}", e)))
    }

    fn check_writable(&self, key: &str) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::WriteError(format!("{}: storage is read-only", key)));
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check_writable(key)?;
        self.lock()?.insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.check_writable(key)?;
        self.lock()?.remove(key);
        Ok(())
    }
}
