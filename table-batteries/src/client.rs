//! Client-side derivation: filter, then sort, then paginate

use std::fmt;
use std::sync::Arc;

use crate::features::filter::filter_items;
use crate::features::pagination::paginate_items;
use crate::features::sort::SortValues;
use crate::features::sort::SortValuesFn;
use crate::features::sort::sort_items;
use crate::table_state::TableDerivedState;
use crate::table_state::TableState;
use crate::types::TableItem;

/// Extra args for tables whose items are all held in memory.
pub struct ClientTableArgs<T> {
    /// Sort values per sortable column. Without it the sort feature does
    /// not reorder items.
    pub get_sort_values: Option<SortValuesFn<T>>,
}

impl<T> Clone for ClientTableArgs<T> {
    fn clone(&self) -> Self {
        Self {
            get_sort_values: self.get_sort_values.clone(),
        }
    }
}

impl<T> Default for ClientTableArgs<T> {
    fn default() -> Self {
        Self { get_sort_values: None }
    }
}

impl<T> fmt::Debug for ClientTableArgs<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientTableArgs")
            .field("has_sort_values", &self.get_sort_values.is_some())
            .finish()
    }
}

impl<T: TableItem> ClientTableArgs<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sort_values<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) -> SortValues + Send + Sync + 'static,
    {
        self.get_sort_values = Some(Arc::new(f));
        self
    }
}

fn filter_and_sort<'a, T: TableItem>(
    state: &TableState<T>,
    items: &'a [T],
    client: &ClientTableArgs<T>,
) -> Vec<&'a T> {
    let args = state.args();

    let filtered = match &args.filter {
        Some(filter) => {
            let values = state.filter().filter_values();
            filter_items(items, &filter.filter_categories, &values)
        }
        None => items.iter().collect(),
    };

    if state.sort().is_enabled() {
        let active_sort = state.sort().active_sort();
        sort_items(filtered, active_sort.as_ref(), client.get_sort_values.as_ref())
    } else {
        filtered
    }
}

/// Every item that passes the current filters, in the current sort order.
///
/// This is the set "select all" operates on in a client table.
pub fn client_table_filtered_items<T: TableItem>(
    state: &TableState<T>,
    items: &[T],
    client: &ClientTableArgs<T>,
) -> Vec<T> {
    filter_and_sort(state, items, client).into_iter().cloned().collect()
}

/// Runs the client pipeline over `items` using the table's current state.
///
/// Disabled features pass items through: without filtering every item
/// counts, without pagination the whole sorted list is the page.
pub fn client_table_derived_state<T: TableItem>(
    state: &TableState<T>,
    items: &[T],
    client: &ClientTableArgs<T>,
) -> TableDerivedState<T> {
    let sorted = filter_and_sort(state, items, client);
    let total_item_count = sorted.len();

    let current_page_items = if state.pagination().is_enabled() {
        paginate_items(&sorted, state.pagination().pagination())
    } else {
        sorted.into_iter().cloned().collect()
    };

    log::trace!(
        "client derivation: {} items, {} after filter, {} on page",
        items.len(),
        total_item_count,
        current_page_items.len()
    );

    TableDerivedState::new(current_page_items, total_item_count)
}

impl<T: TableItem> TableState<T> {
    /// See [`client_table_derived_state`].
    pub fn client_derived_state(
        &self,
        items: &[T],
        client: &ClientTableArgs<T>,
    ) -> TableDerivedState<T> {
        client_table_derived_state(self, items, client)
    }
}
