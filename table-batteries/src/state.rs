use std::sync::Arc;
use std::sync::PoisonError;
use std::sync::RwLock;

/// Shared in-memory value cell.
///
/// `StateCell<T>` backs every ephemeral table state value. It uses
/// `Arc<RwLock<T>>` internally, so clones are cheap handles onto the same
/// value and can be moved into prop callbacks. Every write replaces or
/// mutates the whole value.
///
/// # Example
///
/// ```ignore
/// let page = StateCell::new(1usize);
/// let handle = page.clone();
/// handle.set(3);
/// assert_eq!(page.get(), 3);
/// ```
#[derive(Debug)]
pub struct StateCell<T> {
    inner: Arc<RwLock<T>>,
}

impl<T> StateCell<T> {
    /// Create a new cell holding the given value
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(RwLock::new(value)),
        }
    }

    /// Get a clone of the current value
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.inner
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Read the current value without cloning it
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    /// Replace the value
    pub fn set(&self, value: T) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *guard = value;
    }

    /// Update the value in place
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard);
    }
}

impl<T> Clone for StateCell<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Default> Default for StateCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_value() {
        let cell = StateCell::new(vec![1, 2]);
        let handle = cell.clone();
        handle.update(|v| v.push(3));
        assert_eq!(cell.get(), vec![1, 2, 3]);
    }

    #[test]
    fn test_set_and_with() {
        let cell: StateCell<String> = StateCell::default();
        cell.set("abc".to_string());
        assert_eq!(cell.with(|s| s.len()), 3);
    }
}
