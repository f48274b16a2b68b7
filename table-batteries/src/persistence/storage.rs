//! Key/value storage backends standing in for browser storage

/// Which storage area a value is persisted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageArea {
    /// Survives across sessions (browser `localStorage`).
    Local,
    /// Lives for the current session (browser `sessionStorage`).
    Session,
}

/// Synchronous string key/value storage.
///
/// Implementations never fail at this boundary: read errors are reported as
/// a missing value and write errors are logged and dropped, matching how
/// persisted table state degrades to its defaults.
///
/// # Example
///
/// ```ignore
/// use table_batteries::persistence::{MemoryStorage, StorageBackend};
///
/// let storage = MemoryStorage::new();
/// storage.set_item("filters", r#"{"name":["Thing"]}"#);
/// assert!(storage.get_item("filters").is_some());
/// ```
pub trait StorageBackend: Send + Sync {
    /// Returns the stored string for `key`, if any.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str);

    /// Removes `key`.
    fn remove_item(&self, key: &str);

    /// Removes every key.
    fn clear(&self);
}
