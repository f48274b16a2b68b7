//! In-memory storage using DashMap

use dashmap::DashMap;

use super::StorageBackend;

/// Storage backed by a concurrent hash map.
///
/// This is the default backend for both storage areas. Data lives as long as
/// the value (and every `Arc` pointing at it).
///
/// # Example
///
/// ```
/// use table_batteries::persistence::MemoryStorage;
///
/// let storage = MemoryStorage::new();
/// assert!(storage.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct MemoryStorage {
    store: DashMap<String, String>,
}

impl MemoryStorage {
    /// Creates empty storage.
    pub fn new() -> Self {
        Self {
            store: DashMap::new(),
        }
    }

    /// Returns the number of stored keys.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

impl StorageBackend for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.store.get(key).map(|entry| entry.value().clone())
    }

    fn set_item(&self, key: &str, value: &str) {
        self.store.insert(key.to_string(), value.to_string());
    }

    fn remove_item(&self, key: &str) {
        self.store.remove(key);
    }

    fn clear(&self) {
        self.store.clear();
    }
}
