//! Prop bundles handed to table components

use serde::Deserialize;
use serde::Serialize;

use crate::callback::Callback;
use crate::features::expansion::ExpandableVariant;
use crate::features::filter::FilterCategory;
use crate::features::filter::FilterValues;
use crate::features::sort::SortDirection;

/// Visual density of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TableVariant {
    Compact,
}

#[derive(Debug, Clone)]
pub struct ToolbarFilterProps {
    pub active_filter_count: usize,
    pub clear_all_filters: Callback<()>,
}

#[derive(Debug, Clone)]
pub struct ToolbarProps {
    /// Drops the toolbar's top padding.
    pub is_compact: bool,
    /// Present when filtering is enabled.
    pub filter: Option<ToolbarFilterProps>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableProps {
    pub variant: Option<TableVariant>,
    pub is_expandable: bool,
}

/// Which column the table is currently sorted by, as column indexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortBy {
    pub index: Option<usize>,
    pub direction: Option<SortDirection>,
}

#[derive(Debug, Clone)]
pub struct ThSortProps {
    pub column_index: usize,
    pub sort_by: SortBy,
    /// Called with the clicked column index and the requested direction.
    pub on_sort: Callback<(usize, SortDirection)>,
}

#[derive(Debug, Clone)]
pub struct ThProps {
    /// The column's display name.
    pub children: String,
    /// Present for sortable columns when sorting is enabled.
    pub sort: Option<ThSortProps>,
}

/// Row flags. All false when the active item feature is disabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrProps {
    pub is_selectable: bool,
    pub is_clickable: bool,
    pub is_row_selected: bool,
}

#[derive(Debug, Clone)]
pub struct CompoundExpandProps {
    pub column_index: usize,
    pub row_index: usize,
    pub is_expanded: bool,
    pub on_toggle: Callback<()>,
}

#[derive(Debug, Clone)]
pub struct TdProps {
    pub data_label: String,
    /// Present on compound expand toggles when compound expansion is enabled.
    pub compound_expand: Option<CompoundExpandProps>,
}

#[derive(Debug, Clone)]
pub struct PaginationProps {
    /// Total item count after filtering.
    pub item_count: usize,
    pub per_page: usize,
    pub page: usize,
    pub on_set_page: Callback<usize>,
    /// Changes the page size and returns to the first page.
    pub on_per_page_select: Callback<usize>,
}

pub struct FilterToolbarProps<T> {
    pub filter_categories: Vec<FilterCategory<T>>,
    pub filter_values: FilterValues,
    pub set_filter_values: Callback<FilterValues>,
}

impl<T> Clone for FilterToolbarProps<T> {
    fn clone(&self) -> Self {
        Self {
            filter_categories: self.filter_categories.clone(),
            filter_values: self.filter_values.clone(),
            set_filter_values: self.set_filter_values.clone(),
        }
    }
}

impl<T> std::fmt::Debug for FilterToolbarProps<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterToolbarProps")
            .field("filter_categories", &self.filter_categories)
            .field("filter_values", &self.filter_values)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct ToolbarBulkSelectorProps {
    pub are_all_selected: bool,
    pub is_page_selected: bool,
    pub selected_count: usize,
    pub page_item_count: usize,
    pub total_item_count: usize,
    /// False for server-derived tables, which cannot select items they never
    /// received.
    pub can_select_all: bool,
    /// `true` selects every item, `false` clears the selection.
    pub on_select_all: Callback<bool>,
    /// `true` selects the current page, `false` clears the selection.
    pub on_select_page: Callback<bool>,
    pub on_select_none: Callback<()>,
}

#[derive(Debug, Clone)]
pub struct SelectCheckboxTdProps {
    pub row_index: usize,
    pub is_selected: bool,
    pub is_disabled: bool,
    pub on_select: Callback<bool>,
}

#[derive(Debug, Clone)]
pub struct SingleExpandTdProps {
    pub row_index: usize,
    pub is_expanded: bool,
    pub on_toggle: Callback<()>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpandedContentTdProps {
    pub col_span: usize,
    pub is_expanded: bool,
    pub variant: Option<ExpandableVariant>,
}
