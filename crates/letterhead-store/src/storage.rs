// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Key/value storage port and its implementations.
//
// Values are opaque strings (the typed stores put JSON in them). The SQLite
// implementation keeps everything in one `kv` table in the data directory.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use chrono::Utc;
use letterhead_core::error::{LetterheadError, Result};
use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, info, instrument};

/// Schema for the key/value table.
const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS kv (
    key        TEXT PRIMARY KEY,
    value      TEXT NOT NULL,
    updated_at TEXT NOT NULL
);";

/// String-keyed persistent storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Convert a `rusqlite::Error` into a `LetterheadError::Storage`.
fn db_err(e: rusqlite::Error) -> LetterheadError {
    LetterheadError::Storage(e.to_string())
}

fn poisoned<T>(_: T) -> LetterheadError {
    LetterheadError::Storage("storage lock poisoned".into())
}

/// SQLite-backed store.
///
/// `rusqlite` is synchronous; calls block briefly on the connection mutex.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database at `path`, in WAL mode.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref()).map_err(db_err)?;

        conn.pragma_update(None, "journal_mode", "WAL").map_err(db_err)?;
        conn.execute_batch(CREATE_TABLE_SQL).map_err(db_err)?;

        info!("key/value store opened");
        Ok(Self { conn: Mutex::new(conn) })
    }

    /// Open an in-memory database (useful for tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(db_err)?;
        conn.execute_batch(CREATE_TABLE_SQL).map_err(db_err)?;

        debug!("in-memory key/value store opened");
        Ok(Self { conn: Mutex::new(conn) })
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().map_err(poisoned)?;
        conn.query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| row.get(0))
            .optional()
            .map_err(db_err)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn.lock().map_err(poisoned)?;
        conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Utc::now().to_rfc3339()],
        )
        .map_err(db_err)?;
        debug!(key, len = value.len(), "value stored");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let conn = self.conn.lock().map_err(poisoned)?;
        conn.execute("DELETE FROM kv WHERE key = ?1", params![key]).map_err(db_err)?;
        debug!(key, "value removed");
        Ok(())
    }
}

/// Process-local store; nothing survives a restart.
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.lock().map_err(poisoned)?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values.lock().map_err(poisoned)?.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.values.lock().map_err(poisoned)?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(store: &dyn KeyValueStore) {
        assert_eq!(store.get("a").expect("get"), None);
        store.set("a", "1").expect("set");
        store.set("a", "2").expect("overwrite");
        assert_eq!(store.get("a").expect("get").as_deref(), Some("2"));
        store.remove("a").expect("remove");
        store.remove("a").expect("remove twice");
        assert_eq!(store.get("a").expect("get"), None);
    }

    #[test]
    fn memory_store_roundtrip() {
        exercise(&MemoryStore::new());
    }

    #[test]
    fn sqlite_in_memory_roundtrip() {
        exercise(&SqliteStore::open_in_memory().expect("open"));
    }

    #[test]
    fn sqlite_survives_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("letterhead.db");
        {
            let store = SqliteStore::open(&path).expect("open");
            store.set("fountain_dark_mode", "true").expect("set");
        }
        let store = SqliteStore::open(&path).expect("reopen");
        assert_eq!(store.get("fountain_dark_mode").expect("get").as_deref(), Some("true"));
    }
}
