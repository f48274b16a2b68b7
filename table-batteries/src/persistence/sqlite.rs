//! SQLite-backed durable storage.

use std::path::Path;
use std::sync::Mutex;
use std::sync::PoisonError;

use chrono::DateTime;
use chrono::TimeZone;
use chrono::Utc;
use rusqlite::Connection;
use rusqlite::OptionalExtension;
use rusqlite::params;

use super::StorageBackend;
use crate::error::TableError;

/// Storage backed by SQLite.
///
/// Values are stored in a database file and survive process restarts, which
/// makes this the natural backend for the local storage area. File databases
/// use WAL journal mode.
///
/// # Example
///
/// ```ignore
/// use table_batteries::persistence::SqliteStorage;
///
/// // File-based storage
/// let storage = SqliteStorage::open("table-state.db")?;
///
/// // In-memory storage (for testing)
/// let storage = SqliteStorage::open_in_memory()?;
/// ```
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Opens storage at the specified path.
    ///
    /// Creates the database file and storage table if they don't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let conn = Connection::open(path)?;
        conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get::<_, String>(0))?;
        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. Data is lost when the storage is dropped.
    pub fn open_in_memory() -> Result<Self, TableError> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn init_schema(conn: &Connection) -> Result<(), TableError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS storage (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    /// Returns the number of stored keys.
    pub fn len(&self) -> Result<usize, TableError> {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        let count = conn.query_row("SELECT COUNT(*) FROM storage", [], |row| row.get::<_, i64>(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> Result<bool, TableError> {
        self.len().map(|len| len == 0)
    }

    /// Returns when `key` was last written.
    pub fn updated_at(&self, key: &str) -> Option<DateTime<Utc>> {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        let result = conn
            .query_row(
                "SELECT updated_at FROM storage WHERE key = ?1",
                params![key],
                |row| row.get::<_, i64>(0),
            )
            .optional();

        match result {
            Ok(Some(ts)) => Utc.timestamp_opt(ts, 0).single(),
            Ok(None) => None,
            Err(e) => {
                log::warn!("sqlite storage: failed to read timestamp for {key}: {e}");
                None
            }
        }
    }
}

impl std::fmt::Debug for SqliteStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStorage").finish_non_exhaustive()
    }
}

impl StorageBackend for SqliteStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        let result = conn
            .query_row(
                "SELECT value FROM storage WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional();

        match result {
            Ok(value) => value,
            Err(e) => {
                log::warn!("sqlite storage: failed to read {key}: {e}");
                None
            }
        }
    }

    fn set_item(&self, key: &str, value: &str) {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Utc::now().timestamp();

        if let Err(e) = conn.execute(
            "INSERT OR REPLACE INTO storage (key, value, updated_at) VALUES (?1, ?2, ?3)",
            params![key, value, now],
        ) {
            log::warn!("sqlite storage: failed to write {key}: {e}");
        }
    }

    fn remove_item(&self, key: &str) {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = conn.execute("DELETE FROM storage WHERE key = ?1", params![key]) {
            log::warn!("sqlite storage: failed to remove {key}: {e}");
        }
    }

    fn clear(&self) {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = conn.execute("DELETE FROM storage", []) {
            log::warn!("sqlite storage: failed to clear: {e}");
        }
    }
}
