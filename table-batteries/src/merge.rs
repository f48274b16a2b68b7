//! Merging of table args
//!
//! Lets a caller layer args, e.g. shared defaults under page-specific
//! overrides, without losing the per-feature structure.

use crate::features::active_item::ActiveItemArgs;
use crate::features::expansion::ExpansionArgs;
use crate::features::filter::FilterArgs;
use crate::features::pagination::PaginationArgs;
use crate::features::selection::SelectionArgs;
use crate::features::sort::SortArgs;
use crate::table_state::TableArgs;
use crate::types::TableFeature;
use crate::types::TableItem;

/// Field-by-field merge of one feature's args; `other` wins where it is set.
pub trait MergeArgs {
    fn merge_args(self, other: Self) -> Self;
}

impl<T> MergeArgs for FilterArgs<T> {
    fn merge_args(self, other: Self) -> Self {
        Self {
            filter_categories: if other.filter_categories.is_empty() {
                self.filter_categories
            } else {
                other.filter_categories
            },
            initial_filter_values: other.initial_filter_values.or(self.initial_filter_values),
            persist_to: other.persist_to.or(self.persist_to),
        }
    }
}

impl MergeArgs for SortArgs {
    fn merge_args(self, other: Self) -> Self {
        Self {
            sortable_columns: if other.sortable_columns.is_empty() {
                self.sortable_columns
            } else {
                other.sortable_columns
            },
            initial_sort: other.initial_sort.or(self.initial_sort),
            persist_to: other.persist_to.or(self.persist_to),
        }
    }
}

impl MergeArgs for PaginationArgs {
    fn merge_args(self, other: Self) -> Self {
        Self {
            initial_items_per_page: other.initial_items_per_page.or(self.initial_items_per_page),
            persist_to: other.persist_to.or(self.persist_to),
        }
    }
}

impl<T> MergeArgs for SelectionArgs<T> {
    fn merge_args(self, other: Self) -> Self {
        Self {
            initial_selected_item_ids: if other.initial_selected_item_ids.is_empty() {
                self.initial_selected_item_ids
            } else {
                other.initial_selected_item_ids
            },
            is_item_selectable: other.is_item_selectable.or(self.is_item_selectable),
        }
    }
}

impl MergeArgs for ExpansionArgs {
    fn merge_args(self, other: Self) -> Self {
        Self {
            variant: other.variant,
            persist_to: other.persist_to.or(self.persist_to),
        }
    }
}

impl MergeArgs for ActiveItemArgs {
    fn merge_args(self, other: Self) -> Self {
        Self {
            persist_to: other.persist_to.or(self.persist_to),
        }
    }
}

fn merge_feature<A: MergeArgs>(a: Option<A>, b: Option<A>) -> Option<A> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.merge_args(b)),
        (a, b) => b.or(a),
    }
}

/// Merges two sets of table args, `b` taking precedence.
///
/// Top-level fields take `b`'s value when set. Feature args present on both
/// sides are merged field by field; a feature present on one side survives
/// unchanged.
pub fn merge_feature_args<T: TableItem>(mut a: TableArgs<T>, mut b: TableArgs<T>) -> TableArgs<T> {
    let base = TableArgs {
        column_names: if b.column_names.is_empty() {
            std::mem::take(&mut a.column_names)
        } else {
            std::mem::take(&mut b.column_names)
        },
        persist_to: b.persist_to.take().or(a.persist_to.take()),
        persistence_key_prefix: b.persistence_key_prefix.take().or(a.persistence_key_prefix.take()),
        ..TableArgs::default()
    };

    TableFeature::ALL.iter().fold(base, |mut merged, feature| {
        match feature {
            TableFeature::Filter => merged.filter = merge_feature(a.filter.take(), b.filter.take()),
            TableFeature::Sort => merged.sort = merge_feature(a.sort.take(), b.sort.take()),
            TableFeature::Pagination => {
                merged.pagination = merge_feature(a.pagination.take(), b.pagination.take())
            }
            TableFeature::Selection => {
                merged.selection = merge_feature(a.selection.take(), b.selection.take())
            }
            TableFeature::Expansion => {
                merged.expansion = merge_feature(a.expansion.take(), b.expansion.take())
            }
            TableFeature::ActiveItem => {
                merged.active_item = merge_feature(a.active_item.take(), b.active_item.take())
            }
        }
        merged
    })
}
