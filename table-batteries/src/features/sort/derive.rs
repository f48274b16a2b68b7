//! Client-side sorting

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

use super::ActiveSort;
use super::SortDirection;
use crate::types::ColumnKey;

/// A sortable value extracted from an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SortValue {
    Bool(bool),
    Num(f64),
    Str(String),
}

impl SortValue {
    fn kind_rank(&self) -> u8 {
        match self {
            Self::Bool(_) => 0,
            Self::Num(_) => 1,
            Self::Str(_) => 2,
        }
    }
}

impl From<&str> for SortValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for SortValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<bool> for SortValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for SortValue {
    fn from(value: f64) -> Self {
        Self::Num(value)
    }
}

impl From<i64> for SortValue {
    fn from(value: i64) -> Self {
        Self::Num(value as f64)
    }
}

impl From<i32> for SortValue {
    fn from(value: i32) -> Self {
        Self::Num(value.into())
    }
}

impl From<u32> for SortValue {
    fn from(value: u32) -> Self {
        Self::Num(value.into())
    }
}

/// Sort values of one item, keyed by sortable column.
pub type SortValues = HashMap<ColumnKey, SortValue>;

/// Extracts the sort values of an item.
pub type SortValuesFn<T> = Arc<dyn Fn(&T) -> SortValues + Send + Sync>;

/// Compares strings the way a locale collation does for plain text.
///
/// Letters compare case-insensitively first; among strings equal ignoring
/// case, lowercase sorts before uppercase. The result is a total order.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    let fold = |s: &str| s.chars().flat_map(char::to_lowercase).collect::<Vec<_>>();
    let case = |s: &str| s.chars().map(char::is_uppercase).collect::<Vec<_>>();

    fold(a)
        .cmp(&fold(b))
        .then_with(|| case(a).cmp(&case(b)))
        .then_with(|| a.cmp(b))
}

fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Compares two sort values in ascending order.
///
/// Strings ignore whitespace and use [`locale_compare`], numbers compare
/// numerically and `false < true`. Missing values sort first; values of
/// different kinds are ordered by kind so the result stays a total order.
pub fn compare_sort_values(a: Option<&SortValue>, b: Option<&SortValue>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(SortValue::Str(a)), Some(SortValue::Str(b))) => {
            locale_compare(&strip_whitespace(a), &strip_whitespace(b))
        }
        (Some(SortValue::Num(a)), Some(SortValue::Num(b))) => a.total_cmp(b),
        (Some(SortValue::Bool(a)), Some(SortValue::Bool(b))) => a.cmp(b),
        (Some(a), Some(b)) => a.kind_rank().cmp(&b.kind_rank()),
    }
}

/// Stable-sorts items by the active sort column.
///
/// Without an active sort or a sort value accessor the order is unchanged.
pub fn sort_items<'a, T>(
    items: Vec<&'a T>,
    active_sort: Option<&ActiveSort>,
    get_sort_values: Option<&SortValuesFn<T>>,
) -> Vec<&'a T> {
    let (Some(active_sort), Some(get_sort_values)) = (active_sort, get_sort_values) else {
        return items;
    };

    let mut keyed: Vec<(Option<SortValue>, &'a T)> = items
        .into_iter()
        .map(|item| (get_sort_values(item).remove(&active_sort.column_key), item))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| {
        let ordering = compare_sort_values(a.as_ref(), b.as_ref());
        match active_sort.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });

    keyed.into_iter().map(|(_, item)| item).collect()
}
