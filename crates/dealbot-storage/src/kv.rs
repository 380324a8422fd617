//! Key-value persistence in the style of browser local storage.
//!
//! Values are opaque strings; callers own serialization. Every `set`
//! replaces the whole value for its key.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use rusqlite::OptionalExtension;
use tracing::debug;

use dealbot_core::error::DealbotError;

use crate::db::Database;

/// Scoped string storage keyed by name.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, or `None` if absent.
    fn get(&self, key: &str) -> Result<Option<String>, DealbotError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), DealbotError>;

    /// Delete `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), DealbotError>;
}

/// SQLite-backed store using the `kv` table.
#[derive(Debug, Clone)]
pub struct SqliteKvStore {
    db: Arc<Database>,
}

impl SqliteKvStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

impl KeyValueStore for SqliteKvStore {
    fn get(&self, key: &str) -> Result<Option<String>, DealbotError> {
        self.db.with_conn(|conn| {
            conn.query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(|e| DealbotError::Storage(format!("Failed to read key '{}': {}", key, e)))
        })
    }

    fn set(&self, key: &str, value: &str) -> Result<(), DealbotError> {
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO kv (key, value, updated_at)
                 VALUES (?1, ?2, strftime('%s', 'now'))
                 ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at",
                rusqlite::params![key, value],
            )
            .map_err(|e| DealbotError::Storage(format!("Failed to write key '{}': {}", key, e)))?;
            debug!(key, bytes = value.len(), "Key written");
            Ok(())
        })
    }

    fn remove(&self, key: &str) -> Result<(), DealbotError> {
        self.db.with_conn(|conn| {
            conn.execute("DELETE FROM kv WHERE key = ?1", [key])
                .map_err(|e| {
                    DealbotError::Storage(format!("Failed to remove key '{}': {}", key, e))
                })?;
            Ok(())
        })
    }
}

/// In-memory store for tests and ephemeral sessions.
///
/// Writes can be made to fail on demand to exercise best-effort persistence.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent `set` calls fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Relaxed);
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, DealbotError> {
        self.entries
            .lock()
            .map_err(|e| DealbotError::Storage(format!("kv lock poisoned: {}", e)))
    }
}

impl KeyValueStore for MemoryKvStore {
    fn get(&self, key: &str) -> Result<Option<String>, DealbotError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), DealbotError> {
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(DealbotError::Storage("write rejected".to_string()));
        }
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), DealbotError> {
        self.lock()?.remove(key);
        Ok(())
    }
}
