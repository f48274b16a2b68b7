//! Filter state

use std::collections::BTreeMap;

use super::FilterCategory;
use crate::persistence::PersistMode;
use crate::persistence::PersistenceContext;
use crate::persistence::PersistentState;
use crate::persistence::PersistentStateOptions;
use crate::persistence::UrlParamValues;
use crate::types::FilterCategoryKey;
use crate::types::PersistTarget;
use crate::types::PersistenceKeyPrefix;
use crate::types::TableItem;

/// Current filter values per category. Single-value filters hold one element.
pub type FilterValues = BTreeMap<FilterCategoryKey, Vec<String>>;

const FILTERS_KEY: &str = "filters";

/// Drops categories whose value list is empty.
pub fn normalize_filter_values(mut values: FilterValues) -> FilterValues {
    values.retain(|_, v| !v.is_empty());
    values
}

/// Filter feature configuration.
pub struct FilterArgs<T> {
    pub filter_categories: Vec<FilterCategory<T>>,
    pub initial_filter_values: Option<FilterValues>,
    pub persist_to: Option<PersistTarget>,
}

impl<T> Clone for FilterArgs<T> {
    fn clone(&self) -> Self {
        Self {
            filter_categories: self.filter_categories.clone(),
            initial_filter_values: self.initial_filter_values.clone(),
            persist_to: self.persist_to,
        }
    }
}

impl<T> std::fmt::Debug for FilterArgs<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterArgs")
            .field("filter_categories", &self.filter_categories)
            .field("initial_filter_values", &self.initial_filter_values)
            .field("persist_to", &self.persist_to)
            .finish()
    }
}

impl<T: TableItem> FilterArgs<T> {
    pub fn new(filter_categories: Vec<FilterCategory<T>>) -> Self {
        Self {
            filter_categories,
            initial_filter_values: None,
            persist_to: None,
        }
    }

    pub fn with_initial_filter_values(mut self, values: FilterValues) -> Self {
        self.initial_filter_values = Some(values);
        self
    }

    pub fn with_persist_to(mut self, target: PersistTarget) -> Self {
        self.persist_to = Some(target);
        self
    }
}

pub(crate) fn serialize_filter_url_params(values: &FilterValues) -> UrlParamValues {
    let values = normalize_filter_values(values.clone());
    let param = if values.is_empty() {
        None
    } else {
        serde_json::to_string(&values).ok()
    };
    UrlParamValues::from([(FILTERS_KEY.to_string(), param)])
}

pub(crate) fn deserialize_filter_url_params(params: &UrlParamValues) -> Option<FilterValues> {
    let raw = params.get(FILTERS_KEY)?.as_deref()?;
    match serde_json::from_str(raw) {
        Ok(values) => Some(normalize_filter_values(values)),
        Err(e) => {
            log::debug!("filter state: ignoring malformed filters param: {e}");
            None
        }
    }
}

/// Source of truth for the filter feature.
#[derive(Debug, Clone)]
pub struct FilterState {
    values: PersistentState<FilterValues>,
}

impl FilterState {
    pub fn new<T: TableItem>(
        args: Option<&FilterArgs<T>>,
        target: PersistTarget,
        prefix: Option<&PersistenceKeyPrefix>,
        cx: &PersistenceContext,
    ) -> Self {
        let initial = args
            .and_then(|args| args.initial_filter_values.clone())
            .map(normalize_filter_values)
            .unwrap_or_default();

        let persist_to = PersistMode::for_target(target, FILTERS_KEY, || {
            PersistMode::url_params(
                [FILTERS_KEY],
                serialize_filter_url_params,
                deserialize_filter_url_params,
            )
        });

        let options = PersistentStateOptions::new(initial)
            .enabled(args.is_some())
            .with_prefix(prefix.cloned())
            .with_persist_to(persist_to);

        Self {
            values: PersistentState::new(options, cx),
        }
    }

    /// Current values. Categories with no values are never reported.
    pub fn filter_values(&self) -> FilterValues {
        normalize_filter_values(self.values.get())
    }

    /// Replaces all filter values. Empty categories are dropped.
    pub fn set_filter_values(&self, values: FilterValues) {
        let values = normalize_filter_values(values);
        log::trace!("filter state: {values:?}");
        self.values.set(values);
    }

    /// Replaces the values of one category, leaving the others untouched.
    pub fn set_category_values(
        &self,
        key: impl Into<FilterCategoryKey>,
        category_values: Vec<String>,
    ) {
        let mut values = self.filter_values();
        values.insert(key.into(), category_values);
        self.set_filter_values(values);
    }

    /// Number of categories with at least one value.
    pub fn active_filter_count(&self) -> usize {
        self.filter_values().len()
    }

    pub fn clear(&self) {
        self.set_filter_values(FilterValues::new());
    }

    pub fn is_enabled(&self) -> bool {
        self.values.is_enabled()
    }

    pub fn persist_target(&self) -> PersistTarget {
        self.values.target()
    }
}
