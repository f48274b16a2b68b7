//! Filter category definitions

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

use crate::types::FilterCategoryKey;
use crate::types::TableItem;

/// How a filter category is entered in a toolbar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterType {
    #[default]
    Search,
    Numsearch,
    Select,
    MultiSelect,
}

/// How several values of one category combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FilterLogicOperator {
    And,
    #[default]
    Or,
}

/// Extracts the value a category filters on from an item.
pub type ItemValueFn<T> = Arc<dyn Fn(&T) -> Option<String> + Send + Sync>;

/// A filter category shown in the filter toolbar.
///
/// # Example
///
/// ```ignore
/// let name = FilterCategory::new("name", "Name")
///     .with_placeholder("Filter by name...")
///     .with_item_value(|thing: &Thing| Some(thing.name.clone()));
/// ```
pub struct FilterCategory<T> {
    pub key: FilterCategoryKey,
    pub title: String,
    pub filter_type: FilterType,
    pub placeholder_text: Option<String>,
    pub logic_operator: FilterLogicOperator,
    get_item_value: Option<ItemValueFn<T>>,
}

impl<T> Clone for FilterCategory<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            title: self.title.clone(),
            filter_type: self.filter_type,
            placeholder_text: self.placeholder_text.clone(),
            logic_operator: self.logic_operator,
            get_item_value: self.get_item_value.clone(),
        }
    }
}

impl<T> fmt::Debug for FilterCategory<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterCategory")
            .field("key", &self.key)
            .field("title", &self.title)
            .field("filter_type", &self.filter_type)
            .field("logic_operator", &self.logic_operator)
            .field("has_item_value", &self.get_item_value.is_some())
            .finish()
    }
}

impl<T: TableItem> FilterCategory<T> {
    /// A search category matching any of its values.
    pub fn new(key: impl Into<FilterCategoryKey>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            filter_type: FilterType::Search,
            placeholder_text: None,
            logic_operator: FilterLogicOperator::Or,
            get_item_value: None,
        }
    }

    pub fn with_type(mut self, filter_type: FilterType) -> Self {
        self.filter_type = filter_type;
        self
    }

    pub fn with_placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder_text = Some(text.into());
        self
    }

    pub fn with_logic_operator(mut self, operator: FilterLogicOperator) -> Self {
        self.logic_operator = operator;
        self
    }

    /// Overrides the default [`TableItem::field`] accessor.
    pub fn with_item_value<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) -> Option<String> + Send + Sync + 'static,
    {
        self.get_item_value = Some(Arc::new(f));
        self
    }

    /// The value this category filters `item` on.
    pub fn item_value(&self, item: &T) -> Option<String> {
        match &self.get_item_value {
            Some(f) => f(item),
            None => item.field(self.key.as_str()),
        }
    }
}
