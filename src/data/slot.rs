//! Persisted key-value slots for UI state snapshots

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use rusqlite::{params, Connection};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlotError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Lock poisoned")]
    LockPoisoned,
}

/// A synchronous, string-keyed storage facility that outlasts a session.
pub trait PersistedSlot: Send + Sync {
    /// Read the value stored under `key`, if any
    fn get(&self, key: &str) -> Result<Option<String>, SlotError>;

    /// Insert or overwrite the value stored under `key`
    fn set(&self, key: &str, value: &str) -> Result<(), SlotError>;

    /// Remove `key`; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<(), SlotError>;
}

/// SQLite-backed slot storing entries in the `ui_storage` table
#[derive(Clone)]
pub struct SqliteSlot {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteSlot {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> Result<T, SlotError> {
        let conn = self.conn.lock().map_err(|_| SlotError::LockPoisoned)?;
        Ok(f(&conn)?)
    }
}

impl PersistedSlot for SqliteSlot {
    fn get(&self, key: &str) -> Result<Option<String>, SlotError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT value FROM ui_storage WHERE key = ?1")?;
            let mut rows = stmt.query(params![key])?;

            if let Some(row) = rows.next()? {
                Ok(Some(row.get(0)?))
            } else {
                Ok(None)
            }
        })
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SlotError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO ui_storage (key, value, updated_at)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = ?3",
                params![key, value, Utc::now().to_rfc3339()],
            )?;
            Ok(())
        })
    }

    fn remove(&self, key: &str) -> Result<(), SlotError> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM ui_storage WHERE key = ?1", params![key])?;
            Ok(())
        })
    }
}

/// In-process slot, useful for tests and embedding without a database
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    entries: Arc<parking_lot::Mutex<HashMap<String, String>>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a slot pre-populated with a single entry
    pub fn with_entry(key: &str, value: &str) -> Self {
        let slot = Self::new();
        slot.entries.lock().insert(key.to_string(), value.to_string());
        slot
    }
}

impl PersistedSlot for MemorySlot {
    fn get(&self, key: &str) -> Result<Option<String>, SlotError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SlotError> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SlotError> {
        self.entries.lock().remove(key);
        Ok(())
    }
}
