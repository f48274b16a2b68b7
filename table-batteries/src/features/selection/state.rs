//! Selection state and item cache

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::persistence::PersistenceContext;
use crate::persistence::PersistentState;
use crate::persistence::PersistentStateOptions;
use crate::state::StateCell;
use crate::types::ItemId;
use crate::types::TableItem;

/// Decides whether an item may be selected.
pub type ItemPredicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// Selection feature configuration.
pub struct SelectionArgs<T> {
    pub initial_selected_item_ids: Vec<ItemId>,
    pub is_item_selectable: Option<ItemPredicate<T>>,
}

impl<T> Clone for SelectionArgs<T> {
    fn clone(&self) -> Self {
        Self {
            initial_selected_item_ids: self.initial_selected_item_ids.clone(),
            is_item_selectable: self.is_item_selectable.clone(),
        }
    }
}

impl<T> Default for SelectionArgs<T> {
    fn default() -> Self {
        Self {
            initial_selected_item_ids: Vec::new(),
            is_item_selectable: None,
        }
    }
}

impl<T> fmt::Debug for SelectionArgs<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionArgs")
            .field("initial_selected_item_ids", &self.initial_selected_item_ids)
            .field("has_is_item_selectable", &self.is_item_selectable.is_some())
            .finish()
    }
}

impl<T: TableItem> SelectionArgs<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_initial_selected_item_ids<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ItemId>,
    {
        self.initial_selected_item_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_is_item_selectable<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.is_item_selectable = Some(Arc::new(predicate));
        self
    }
}

/// Source of truth for the selection feature.
pub struct SelectionState<T> {
    selected_item_ids: PersistentState<Vec<ItemId>>,
    item_cache: StateCell<HashMap<ItemId, T>>,
}

impl<T> Clone for SelectionState<T> {
    fn clone(&self) -> Self {
        Self {
            selected_item_ids: self.selected_item_ids.clone(),
            item_cache: self.item_cache.clone(),
        }
    }
}

impl<T> fmt::Debug for SelectionState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionState")
            .field("selected_item_ids", &self.selected_item_ids)
            .finish_non_exhaustive()
    }
}

impl<T: TableItem> SelectionState<T> {
    /// Creates the state. Selection always lives in memory.
    pub fn new(args: Option<&SelectionArgs<T>>, cx: &PersistenceContext) -> Self {
        let initial = args
            .map(|args| args.initial_selected_item_ids.clone())
            .unwrap_or_default();
        let options = PersistentStateOptions::new(initial).enabled(args.is_some());

        Self {
            selected_item_ids: PersistentState::new(options, cx),
            item_cache: StateCell::new(HashMap::new()),
        }
    }

    pub fn selected_item_ids(&self) -> Vec<ItemId> {
        self.selected_item_ids.get()
    }

    /// Replaces the selection. Duplicate ids keep their first position.
    pub fn set_selected_item_ids(&self, ids: Vec<ItemId>) {
        let mut deduped: Vec<ItemId> = Vec::with_capacity(ids.len());
        for id in ids {
            if !deduped.contains(&id) {
                deduped.push(id);
            }
        }
        log::trace!("selection state: {} selected", deduped.len());
        self.selected_item_ids.set(deduped);
    }

    /// Remembers `items` so their selection stays inspectable later.
    pub fn cache_items<'a>(&self, items: impl IntoIterator<Item = &'a T>) {
        self.item_cache.update(|cache| {
            for item in items {
                cache.insert(item.item_id(), item.clone());
            }
        });
    }

    /// Returns the cached item with `id`, if it was ever seen.
    pub fn cached_item(&self, id: &ItemId) -> Option<T> {
        self.item_cache.with(|cache| cache.get(id).cloned())
    }

    /// Reads the whole item cache.
    pub fn with_item_cache<R>(&self, f: impl FnOnce(&HashMap<ItemId, T>) -> R) -> R {
        self.item_cache.with(f)
    }

    /// Number of distinct items seen so far.
    pub fn cached_item_count(&self) -> usize {
        self.item_cache.with(HashMap::len)
    }

    pub fn is_enabled(&self) -> bool {
        self.selected_item_ids.is_enabled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row(i64);

    impl TableItem for Row {
        fn item_id(&self) -> ItemId {
            ItemId::Num(self.0)
        }
    }

    #[test]
    fn test_initial_ids() {
        let cx = PersistenceContext::new();
        let args = SelectionArgs::<Row>::new().with_initial_selected_item_ids([1, 2]);
        let state = SelectionState::new(Some(&args), &cx);
        assert_eq!(state.selected_item_ids(), vec![ItemId::Num(1), ItemId::Num(2)]);
    }

    #[test]
    fn test_set_dedupes() {
        let cx = PersistenceContext::new();
        let state = SelectionState::<Row>::new(Some(&SelectionArgs::new()), &cx);
        state.set_selected_item_ids(vec![3.into(), 1.into(), 3.into()]);
        assert_eq!(state.selected_item_ids(), vec![ItemId::Num(3), ItemId::Num(1)]);
    }

    #[test]
    fn test_cache_is_append_only() {
        let cx = PersistenceContext::new();
        let state = SelectionState::<Row>::new(Some(&SelectionArgs::new()), &cx);
        state.cache_items(&[Row(1), Row(2)]);
        state.cache_items(&[Row(3)]);
        assert_eq!(state.cached_item_count(), 3);
        assert_eq!(state.cached_item(&ItemId::Num(1)), Some(Row(1)));
    }

    #[test]
    fn test_disabled_ignores_writes() {
        let cx = PersistenceContext::new();
        let state = SelectionState::<Row>::new(None, &cx);
        state.set_selected_item_ids(vec![1.into()]);
        assert!(state.selected_item_ids().is_empty());
    }
}
