//! Named key-value slots backed by SQLite.
//!
//! Each slot holds one opaque string value with write-replace semantics;
//! there are no partial updates.

use std::path::Path;

use chrono::Utc;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::TodoResult;

/// Storage for whole-value slots.
pub trait KeyValueStore: Send {
    /// Read a slot. Returns `None` when the slot was never written.
    fn read(&self, key: &str) -> TodoResult<Option<String>>;

    /// Replace the slot's value.
    fn write(&self, key: &str, value: &str) -> TodoResult<()>;

    /// Remove the slot. Removing a missing slot is not an error.
    fn remove(&self, key: &str) -> TodoResult<()>;
}

/// SQLite-based key-value slot storage.
pub struct SqliteKvStore {
    conn: Mutex<Connection>,
}

impl SqliteKvStore {
    /// Open (or create) a store at the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> TodoResult<Self> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    /// Create an in-memory store.
    pub fn in_memory() -> TodoResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> TodoResult<Self> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv_slots (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl KeyValueStore for SqliteKvStore {
    fn read(&self, key: &str) -> TodoResult<Option<String>> {
        let conn = self.conn.lock();
        let value = conn
            .query_row(
                "SELECT value FROM kv_slots WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write(&self, key: &str, value: &str) -> TodoResult<()> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT OR REPLACE INTO kv_slots (key, value, updated_at) VALUES (?1, ?2, ?3)",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        tracing::debug!("Wrote slot {} ({} bytes)", key, value.len());
        Ok(())
    }

    fn remove(&self, key: &str) -> TodoResult<()> {
        let conn = self.conn.lock();
        conn.execute("DELETE FROM kv_slots WHERE key = ?1", params![key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_read_missing_slot() {
        let store = SqliteKvStore::in_memory().unwrap();
        assert_eq!(store.read("todo_list").unwrap(), None);
    }

    #[test]
    fn test_write_replaces_value() {
        let store = SqliteKvStore::in_memory().unwrap();
        store.write("todo_list", "[1]").unwrap();
        store.write("todo_list", "[2]").unwrap();
        assert_eq!(store.read("todo_list").unwrap().as_deref(), Some("[2]"));
    }

    #[test]
    fn test_slots_are_independent() {
        let store = SqliteKvStore::in_memory().unwrap();
        store.write("a", "1").unwrap();
        store.write("b", "2").unwrap();
        store.remove("a").unwrap();

        assert_eq!(store.read("a").unwrap(), None);
        assert_eq!(store.read("b").unwrap().as_deref(), Some("2"));
        store.remove("a").unwrap();
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slots.db");

        {
            let store = SqliteKvStore::new(&path).unwrap();
            store.write("todo_list", "[]").unwrap();
        }

        let store = SqliteKvStore::new(&path).unwrap();
        assert_eq!(store.read("todo_list").unwrap().as_deref(), Some("[]"));
    }
}
