//! Render-time selection helpers

use std::fmt;
use std::sync::Arc;

use super::ItemPredicate;
use super::SelectionState;
use crate::error::TableError;
use crate::types::ItemId;
use crate::types::TableItem;

/// Selection helpers over the current render's items.
///
/// Every query reads the live selection, so a helper called right after a
/// setter observes the new value.
pub struct SelectionDerivedState<T> {
    state: SelectionState<T>,
    current_page_items: Arc<[T]>,
    all_items: Option<Arc<[T]>>,
    total_item_count: usize,
    is_item_selectable: Option<ItemPredicate<T>>,
}

impl<T> Clone for SelectionDerivedState<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            current_page_items: Arc::clone(&self.current_page_items),
            all_items: self.all_items.clone(),
            total_item_count: self.total_item_count,
            is_item_selectable: self.is_item_selectable.clone(),
        }
    }
}

impl<T> fmt::Debug for SelectionDerivedState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionDerivedState")
            .field("page_item_count", &self.current_page_items.len())
            .field("has_all_items", &self.all_items.is_some())
            .field("total_item_count", &self.total_item_count)
            .finish_non_exhaustive()
    }
}

impl<T: TableItem> SelectionDerivedState<T> {
    /// Builds the helpers and caches every item passed in.
    ///
    /// `all_items` is the full un-paginated collection when known (client
    /// tables); without it `select_all` is unavailable.
    pub fn new(
        state: SelectionState<T>,
        current_page_items: Arc<[T]>,
        all_items: Option<Arc<[T]>>,
        total_item_count: usize,
        is_item_selectable: Option<ItemPredicate<T>>,
    ) -> Self {
        state.cache_items(current_page_items.iter());
        if let Some(all_items) = &all_items {
            state.cache_items(all_items.iter());
        }

        Self {
            state,
            current_page_items,
            all_items,
            total_item_count,
            is_item_selectable,
        }
    }

    pub fn is_item_selectable(&self, item: &T) -> bool {
        self.is_item_selectable.as_ref().is_none_or(|f| f(item))
    }

    pub fn is_item_selected(&self, item: &T) -> bool {
        self.state.selected_item_ids().contains(&item.item_id())
    }

    pub fn selected_item_ids(&self) -> Vec<ItemId> {
        self.state.selected_item_ids()
    }

    /// Selected items in selection order, resolved through the item cache.
    pub fn selected_items(&self) -> Vec<T> {
        self.state
            .selected_item_ids()
            .iter()
            .filter_map(|id| self.state.cached_item(id))
            .collect()
    }

    pub fn selected_count(&self) -> usize {
        self.state.selected_item_ids().len()
    }

    /// Whether every item in the collection is selected.
    pub fn all_selected(&self) -> bool {
        self.total_item_count > 0 && self.selected_count() == self.total_item_count
    }

    /// Whether exactly the current page's items are selected.
    pub fn page_selected(&self) -> bool {
        let selected = self.state.selected_item_ids();
        !self.current_page_items.is_empty()
            && selected.len() == self.current_page_items.len()
            && self
                .current_page_items
                .iter()
                .all(|item| selected.contains(&item.item_id()))
    }

    /// Selects or deselects one item. Unselectable items are never selected.
    pub fn select_item(&self, item: &T, is_selecting: bool) {
        let id = item.item_id();
        let mut selected = self.state.selected_item_ids();

        if is_selecting {
            if selected.contains(&id) || !self.is_item_selectable(item) {
                return;
            }
            self.state.cache_items([item]);
            selected.push(id);
        } else {
            selected.retain(|selected_id| *selected_id != id);
        }
        self.state.set_selected_item_ids(selected);
    }

    /// Selects or deselects several items.
    ///
    /// With `is_selecting` unset, selects when any of `items` is unselected
    /// and deselects otherwise.
    pub fn select_items(&self, items: &[T], is_selecting: Option<bool>) {
        let is_selecting = is_selecting
            .unwrap_or_else(|| items.iter().any(|item| !self.is_item_selected(item)));
        let mut selected = self.state.selected_item_ids();

        if is_selecting {
            let selecting: Vec<&T> = items
                .iter()
                .filter(|item| self.is_item_selectable(item))
                .collect();
            if selecting.is_empty() {
                return;
            }
            let selecting_ids: Vec<ItemId> = selecting.iter().map(|item| item.item_id()).collect();
            self.state.cache_items(selecting);
            selected.retain(|id| !selecting_ids.contains(id));
            selected.extend(selecting_ids);
        } else {
            let deselecting: Vec<ItemId> = items.iter().map(TableItem::item_id).collect();
            selected.retain(|id| !deselecting.contains(id));
        }
        self.state.set_selected_item_ids(selected);
    }

    /// Selects every selectable item in the collection.
    ///
    /// Fails without touching the selection when the full collection is not
    /// known.
    pub fn select_all(&self) -> Result<(), TableError> {
        let Some(all_items) = &self.all_items else {
            log::warn!(
                "select_all called without the full item collection; \
                 select all only works for client-derived tables"
            );
            return Err(TableError::SelectAllUnavailable);
        };
        self.state.set_selected_item_ids(self.selectable_ids(all_items));
        Ok(())
    }

    /// Replaces the selection with the current page's selectable items.
    pub fn select_page(&self) {
        self.state
            .set_selected_item_ids(self.selectable_ids(&self.current_page_items));
    }

    pub fn select_none(&self) {
        self.state.set_selected_item_ids(Vec::new());
    }

    /// Replaces the selection with the selectable items among `items`.
    pub fn set_selected_items(&self, items: &[T]) {
        self.state.cache_items(items);
        self.state.set_selected_item_ids(self.selectable_ids(items));
    }

    pub fn can_select_all(&self) -> bool {
        self.all_items.is_some()
    }

    pub fn current_page_items(&self) -> &[T] {
        &self.current_page_items
    }

    pub fn total_item_count(&self) -> usize {
        self.total_item_count
    }

    pub fn is_enabled(&self) -> bool {
        self.state.is_enabled()
    }

    fn selectable_ids(&self, items: &[T]) -> Vec<ItemId> {
        items
            .iter()
            .filter(|item| self.is_item_selectable(item))
            .map(TableItem::item_id)
            .collect()
    }
}
