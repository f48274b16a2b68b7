//! Table batteries: everything a table view needs in one value
//!
//! [`TableBatteries`] is built once per render from the table state and the
//! rows to show. Building it runs the corrective effects (page bounds, stale
//! active item, unselectable selections) and then exposes derived-state
//! helpers and ready-made prop bundles for each table component.

mod props;

pub use props::*;

use std::sync::Arc;

use crate::callback::Callback;
use crate::client::ClientTableArgs;
use crate::client::client_table_filtered_items;
use crate::features::active_item::ActiveItemDerivedState;
use crate::features::active_item::should_clear_active_item;
use crate::features::expansion::ExpandableVariant;
use crate::features::expansion::ExpansionDerivedState;
use crate::features::pagination::pagination_bounds_correction;
use crate::features::selection::SelectionDerivedState;
use crate::features::selection::unselectable_selection_correction;
use crate::features::sort::ActiveSort;
use crate::features::sort::SortDirection;
use crate::row_click::ClickTarget;
use crate::row_click::handle_propagated_row_click;
use crate::table_state::TableDerivedState;
use crate::table_state::TableState;
use crate::types::ColumnKey;
use crate::types::ItemId;
use crate::types::TableFeature;
use crate::types::TableItem;

/// Render options that are not part of the table's persisted state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableBatteriesOptions {
    /// While loading, corrective effects hold off.
    pub is_loading: bool,
    /// Overrides the computed column count used for full-width cells.
    pub force_num_rendered_columns: Option<usize>,
    pub variant: Option<TableVariant>,
    pub has_actions_column: bool,
}

impl TableBatteriesOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn loading(mut self, is_loading: bool) -> Self {
        self.is_loading = is_loading;
        self
    }

    pub fn with_num_rendered_columns(mut self, count: usize) -> Self {
        self.force_num_rendered_columns = Some(count);
        self
    }

    pub fn with_variant(mut self, variant: TableVariant) -> Self {
        self.variant = Some(variant);
        self
    }

    pub fn with_actions_column(mut self, has_actions_column: bool) -> Self {
        self.has_actions_column = has_actions_column;
        self
    }
}

/// A state fix applied while building the batteries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Correction {
    /// The page was past the last page and snapped back.
    PageNumberClamped { from: usize, to: usize },
    /// The active item is no longer on the current page.
    ActiveItemCleared { id: ItemId },
    /// Selected items that are no longer selectable were deselected.
    SelectionPruned { removed: Vec<ItemId> },
}

pub struct TableBatteries<T> {
    state: TableState<T>,
    current_page_items: Arc<[T]>,
    total_item_count: usize,
    options: TableBatteriesOptions,
    selection: SelectionDerivedState<T>,
    expansion: ExpansionDerivedState,
    active_item: ActiveItemDerivedState<T>,
    corrections: Vec<Correction>,
}

impl<T> Clone for TableBatteries<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            current_page_items: Arc::clone(&self.current_page_items),
            total_item_count: self.total_item_count,
            options: self.options.clone(),
            selection: self.selection.clone(),
            expansion: self.expansion.clone(),
            active_item: self.active_item.clone(),
            corrections: self.corrections.clone(),
        }
    }
}

impl<T> std::fmt::Debug for TableBatteries<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableBatteries")
            .field("state", &self.state)
            .field("page_item_count", &self.current_page_items.len())
            .field("total_item_count", &self.total_item_count)
            .field("options", &self.options)
            .field("corrections", &self.corrections)
            .finish_non_exhaustive()
    }
}

/// Snaps the page back into range. Returns the correction when one was made.
fn correct_pagination<T: TableItem>(
    state: &TableState<T>,
    total_item_count: usize,
    is_loading: bool,
) -> Option<Correction> {
    let pagination = state.pagination();
    if !pagination.is_enabled() {
        return None;
    }

    let current = pagination.pagination();
    let to = pagination_bounds_correction(current, total_item_count, is_loading)?;
    pagination.set_page_number(to);
    Some(Correction::PageNumberClamped {
        from: current.page_number,
        to,
    })
}

/// Builds batteries for a table whose items all live in memory.
///
/// Derives the page from `items`, fixes an out-of-range page and derives
/// again, then assembles as [`TableBatteries::new`] does. Select all is
/// available and covers every item that passes the current filters.
pub fn client_table_batteries<T: TableItem>(
    state: TableState<T>,
    items: &[T],
    client: &ClientTableArgs<T>,
    options: TableBatteriesOptions,
) -> TableBatteries<T> {
    let mut derived = state.client_derived_state(items, client);
    let mut corrections = Vec::new();

    if let Some(correction) =
        correct_pagination(&state, derived.total_item_count, options.is_loading)
    {
        corrections.push(correction);
        derived = state.client_derived_state(items, client);
    }

    let filtered_items: Arc<[T]> = client_table_filtered_items(&state, items, client).into();
    TableBatteries::assemble(state, derived, Some(filtered_items), options, corrections)
}

impl<T: TableItem> TableBatteries<T> {
    /// Builds batteries from rows derived elsewhere, e.g. fetched from a
    /// server by [`TableState::cache_key`].
    ///
    /// A page past the end is corrected in state only; the caller refetches
    /// when the cache key changes.
    pub fn new(
        state: TableState<T>,
        derived: TableDerivedState<T>,
        options: TableBatteriesOptions,
    ) -> Self {
        let corrections = correct_pagination(&state, derived.total_item_count, options.is_loading)
            .into_iter()
            .collect();
        Self::assemble(state, derived, None, options, corrections)
    }

    fn assemble(
        state: TableState<T>,
        derived: TableDerivedState<T>,
        all_items: Option<Arc<[T]>>,
        options: TableBatteriesOptions,
        mut corrections: Vec<Correction>,
    ) -> Self {
        let current_page_items: Arc<[T]> = derived.current_page_items.into();
        let is_item_selectable = state
            .args()
            .selection
            .as_ref()
            .and_then(|args| args.is_item_selectable.clone());

        let selection = SelectionDerivedState::new(
            state.selection().clone(),
            Arc::clone(&current_page_items),
            all_items,
            derived.total_item_count,
            is_item_selectable.clone(),
        );

        if state.selection().is_enabled()
            && let Some(is_item_selectable) = &is_item_selectable
        {
            let selected = state.selection().selected_item_ids();
            let retained = state.selection().with_item_cache(|cache| {
                unselectable_selection_correction(&selected, cache, |item: &T| {
                    is_item_selectable(item)
                })
            });
            if let Some(retained) = retained {
                let removed: Vec<ItemId> = selected
                    .into_iter()
                    .filter(|id| !retained.contains(id))
                    .collect();
                state.selection().set_selected_item_ids(retained);
                corrections.push(Correction::SelectionPruned { removed });
            }
        }

        let expansion = ExpansionDerivedState::new(state.expansion().clone());

        let active_item = ActiveItemDerivedState::new(
            state.active_item().clone(),
            Arc::clone(&current_page_items),
        );
        if active_item.is_enabled() {
            let is_on_page = active_item.active_item().is_some();
            let stale = active_item
                .active_item_id()
                .filter(|id| should_clear_active_item(Some(id), is_on_page, options.is_loading));
            if let Some(id) = stale {
                active_item.clear_active_item();
                corrections.push(Correction::ActiveItemCleared { id });
            }
        }

        for correction in &corrections {
            log::debug!("table batteries: applied {correction:?}");
        }

        Self {
            state,
            current_page_items,
            total_item_count: derived.total_item_count,
            options,
            selection,
            expansion,
            active_item,
            corrections,
        }
    }

    pub fn state(&self) -> &TableState<T> {
        &self.state
    }

    pub fn current_page_items(&self) -> &[T] {
        &self.current_page_items
    }

    pub fn total_item_count(&self) -> usize {
        self.total_item_count
    }

    pub fn options(&self) -> &TableBatteriesOptions {
        &self.options
    }

    pub fn is_loading(&self) -> bool {
        self.options.is_loading
    }

    /// Fixes applied while building, in the order they ran.
    pub fn corrections(&self) -> &[Correction] {
        &self.corrections
    }

    pub fn selection(&self) -> &SelectionDerivedState<T> {
        &self.selection
    }

    pub fn expansion(&self) -> &ExpansionDerivedState {
        &self.expansion
    }

    pub fn active_item(&self) -> &ActiveItemDerivedState<T> {
        &self.active_item
    }

    /// Extra leading columns: a checkbox column for selection and a toggle
    /// column for single expansion.
    pub fn num_columns_before_data(&self) -> usize {
        usize::from(self.state.is_enabled(TableFeature::Selection))
            + usize::from(self.expansion.variant() == Some(ExpandableVariant::Single))
    }

    pub fn num_columns_after_data(&self) -> usize {
        usize::from(self.options.has_actions_column)
    }

    pub fn num_rendered_columns(&self) -> usize {
        self.options
            .force_num_rendered_columns
            .filter(|count| *count > 0)
            .unwrap_or_else(|| {
                self.state.column_names().len()
                    + self.num_columns_before_data()
                    + self.num_columns_after_data()
            })
    }

    fn column_name(&self, column_key: &str) -> String {
        self.state.column_names().name(column_key).unwrap_or_default().to_string()
    }

    pub fn toolbar_props(&self) -> ToolbarProps {
        let filter = self.state.filter();
        ToolbarProps {
            is_compact: self.options.variant == Some(TableVariant::Compact),
            filter: filter.is_enabled().then(|| {
                let handle = filter.clone();
                ToolbarFilterProps {
                    active_filter_count: filter.active_filter_count(),
                    clear_all_filters: Callback::new(move |()| handle.clear()),
                }
            }),
        }
    }

    pub fn table_props(&self) -> TableProps {
        TableProps {
            variant: self.options.variant,
            is_expandable: self.expansion.variant().is_some(),
        }
    }

    pub fn th_props(&self, column_key: &str) -> ThProps {
        ThProps {
            children: self.column_name(column_key),
            sort: self.th_sort_props(column_key),
        }
    }

    fn th_sort_props(&self, column_key: &str) -> Option<ThSortProps> {
        let sort = self.state.sort();
        if !sort.is_enabled() || !sort.is_sortable(column_key) {
            return None;
        }

        let column_names = self.state.column_names();
        let column_index = column_names.index_of(column_key)?;
        let active_sort = sort.active_sort();
        let sort_by = SortBy {
            index: active_sort
                .as_ref()
                .and_then(|active| column_names.index_of(active.column_key.as_str())),
            direction: active_sort.map(|active| active.direction),
        };

        let sort = sort.clone();
        let column_names = column_names.clone();
        let on_sort = Callback::new(move |(index, direction): (usize, SortDirection)| {
            if let Some(column_key) = column_names.key_at(index) {
                sort.set_active_sort(Some(ActiveSort::new(column_key.clone(), direction)));
            }
        });

        Some(ThSortProps {
            column_index,
            sort_by,
            on_sort,
        })
    }

    pub fn tr_props(&self, item: &T) -> TrProps {
        if !self.active_item.is_enabled() {
            return TrProps::default();
        }
        TrProps {
            is_selectable: true,
            is_clickable: true,
            is_row_selected: self.active_item.is_active_item(item),
        }
    }

    /// Handles a click on `item`'s row: toggles the active item, then calls
    /// `on_row_click`. Clicks from nested inputs, buttons and links do
    /// neither. Returns whether the click was handled.
    pub fn handle_row_click(
        &self,
        item: &T,
        target: &ClickTarget,
        on_row_click: Option<&dyn Fn(&T)>,
    ) -> bool {
        handle_propagated_row_click(target, || {
            if self.active_item.is_enabled() {
                self.active_item.toggle_active_item(item);
            }
            if let Some(on_row_click) = on_row_click {
                on_row_click(item);
            }
        })
    }

    /// Props for a data cell. `compound_toggle` marks the cell as the
    /// compound expand toggle of the given item and row.
    pub fn td_props(&self, column_key: &str, compound_toggle: Option<(&T, usize)>) -> TdProps {
        let compound_expand = match (self.expansion.variant(), compound_toggle) {
            (Some(ExpandableVariant::Compound), Some((item, row_index))) => {
                self.compound_expand_props(column_key, item, row_index)
            }
            _ => None,
        };

        TdProps {
            data_label: self.column_name(column_key),
            compound_expand,
        }
    }

    fn compound_expand_props(
        &self,
        column_key: &str,
        item: &T,
        row_index: usize,
    ) -> Option<CompoundExpandProps> {
        let column_index = self.state.column_names().index_of(column_key)?;
        let column_key = ColumnKey::from(column_key);
        let is_expanded = self.expansion.is_cell_expanded(item, Some(&column_key));

        let expansion = self.expansion.clone();
        let item = item.clone();
        Some(CompoundExpandProps {
            column_index,
            row_index,
            is_expanded,
            on_toggle: Callback::new(move |()| expansion.toggle_cell_expanded(&item, &column_key)),
        })
    }

    pub fn pagination_props(&self) -> PaginationProps {
        let pagination = self.state.pagination();
        let set_page = pagination.clone();
        let set_per_page = pagination.clone();

        PaginationProps {
            item_count: self.total_item_count,
            per_page: pagination.items_per_page(),
            page: pagination.page_number(),
            on_set_page: Callback::new(move |page| set_page.set_page_number(page)),
            on_per_page_select: Callback::new(move |per_page| {
                set_per_page.set_items_per_page(per_page)
            }),
        }
    }

    pub fn filter_toolbar_props(&self) -> FilterToolbarProps<T> {
        let filter = self.state.filter().clone();
        FilterToolbarProps {
            filter_categories: self
                .state
                .args()
                .filter
                .as_ref()
                .map(|args| args.filter_categories.clone())
                .unwrap_or_default(),
            filter_values: filter.filter_values(),
            set_filter_values: Callback::new(move |values| filter.set_filter_values(values)),
        }
    }

    pub fn toolbar_bulk_selector_props(&self) -> ToolbarBulkSelectorProps {
        let selection = &self.selection;
        let on_all = selection.clone();
        let on_page = selection.clone();
        let on_none = selection.clone();

        ToolbarBulkSelectorProps {
            are_all_selected: selection.all_selected(),
            is_page_selected: selection.page_selected(),
            selected_count: selection.selected_count(),
            page_item_count: selection.current_page_items().len(),
            total_item_count: selection.total_item_count(),
            can_select_all: selection.can_select_all(),
            on_select_all: Callback::new(move |is_selecting: bool| {
                if is_selecting {
                    if let Err(e) = on_all.select_all() {
                        log::debug!("bulk selector: {e}");
                    }
                } else {
                    on_all.select_none();
                }
            }),
            on_select_page: Callback::new(move |is_selecting: bool| {
                if is_selecting {
                    on_page.select_page();
                } else {
                    on_page.select_none();
                }
            }),
            on_select_none: Callback::new(move |()| on_none.select_none()),
        }
    }

    pub fn select_checkbox_td_props(&self, item: &T, row_index: usize) -> SelectCheckboxTdProps {
        let selection = self.selection.clone();
        let target = item.clone();
        SelectCheckboxTdProps {
            row_index,
            is_selected: self.selection.is_item_selected(item),
            is_disabled: !self.selection.is_item_selectable(item),
            on_select: Callback::new(move |is_selecting| {
                selection.select_item(&target, is_selecting)
            }),
        }
    }

    pub fn single_expand_td_props(&self, item: &T, row_index: usize) -> SingleExpandTdProps {
        let expansion = self.expansion.clone();
        let target = item.clone();
        SingleExpandTdProps {
            row_index,
            is_expanded: self.expansion.is_cell_expanded(item, None),
            on_toggle: Callback::new(move |()| expansion.toggle_row_expanded(&target)),
        }
    }

    /// Props for the full-width cell holding an item's expanded content.
    pub fn expanded_content_td_props(&self, item: &T) -> ExpandedContentTdProps {
        ExpandedContentTdProps {
            col_span: self.num_rendered_columns(),
            is_expanded: self.expansion.is_cell_expanded(item, None),
            variant: self.expansion.variant(),
        }
    }
}
