//! Render-time active item helpers

use std::sync::Arc;

use super::ActiveItemState;
use crate::types::ItemId;
use crate::types::TableItem;

/// Active item helpers over the current page.
pub struct ActiveItemDerivedState<T> {
    state: ActiveItemState,
    current_page_items: Arc<[T]>,
}

impl<T> Clone for ActiveItemDerivedState<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            current_page_items: Arc::clone(&self.current_page_items),
        }
    }
}

impl<T> std::fmt::Debug for ActiveItemDerivedState<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActiveItemDerivedState")
            .field("state", &self.state)
            .field("page_item_count", &self.current_page_items.len())
            .finish()
    }
}

impl<T: TableItem> ActiveItemDerivedState<T> {
    pub fn new(state: ActiveItemState, current_page_items: Arc<[T]>) -> Self {
        Self {
            state,
            current_page_items,
        }
    }

    /// The active item, when it is on the current page.
    pub fn active_item(&self) -> Option<T> {
        let id = self.state.active_item_id()?;
        self.current_page_items
            .iter()
            .find(|item| item.item_id() == id)
            .cloned()
    }

    pub fn active_item_id(&self) -> Option<ItemId> {
        self.state.active_item_id()
    }

    pub fn set_active_item(&self, item: Option<&T>) {
        self.state.set_active_item_id(item.map(TableItem::item_id));
    }

    pub fn clear_active_item(&self) {
        self.state.set_active_item_id(None);
    }

    pub fn is_active_item(&self, item: &T) -> bool {
        self.state.active_item_id().is_some_and(|id| id == item.item_id())
    }

    /// Makes `item` active, or clears it when it already is.
    pub fn toggle_active_item(&self, item: &T) {
        if self.is_active_item(item) {
            self.clear_active_item();
        } else {
            self.set_active_item(Some(item));
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.state.is_enabled()
    }
}
