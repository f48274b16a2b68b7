//! Table state composition
//!
//! `TableArgs` describes which features a table uses and where their state
//! lives; `TableState` owns one state cell per feature and computes the cache
//! key server-backed tables fetch by.

use std::fmt;

use serde::Serialize;

use crate::error::TableError;
use crate::features::active_item::ActiveItemArgs;
use crate::features::active_item::ActiveItemState;
use crate::features::expansion::ExpansionArgs;
use crate::features::expansion::ExpansionState;
use crate::features::filter::FilterArgs;
use crate::features::filter::FilterState;
use crate::features::filter::FilterValues;
use crate::features::pagination::ActivePagination;
use crate::features::pagination::PaginationArgs;
use crate::features::pagination::PaginationState;
use crate::features::selection::SelectionArgs;
use crate::features::selection::SelectionState;
use crate::features::sort::ActiveSort;
use crate::features::sort::SortArgs;
use crate::features::sort::SortState;
use crate::persistence::PersistTo;
use crate::persistence::PersistenceContext;
use crate::persistence::resolve_persist_target;
use crate::types::ColumnNames;
use crate::types::PersistTarget;
use crate::types::PersistenceKeyPrefix;
use crate::types::TableFeature;
use crate::types::TableItem;

/// Table configuration. A feature is enabled when its args are present.
///
/// # Example
///
/// ```ignore
/// let args = TableArgs::new(columns)
///     .with_filter(FilterArgs::new(vec![FilterCategory::new("name", "Name")]))
///     .with_sort(SortArgs::new(["name"]))
///     .with_pagination(PaginationArgs::new().with_initial_items_per_page(20))
///     .with_persist_to(PersistTarget::UrlParams)
///     .with_persistence_key_prefix("things")?;
/// ```
pub struct TableArgs<T> {
    pub column_names: ColumnNames,
    pub filter: Option<FilterArgs<T>>,
    pub sort: Option<SortArgs>,
    pub pagination: Option<PaginationArgs>,
    pub selection: Option<SelectionArgs<T>>,
    pub expansion: Option<ExpansionArgs>,
    pub active_item: Option<ActiveItemArgs>,
    pub persist_to: Option<PersistTo>,
    pub persistence_key_prefix: Option<PersistenceKeyPrefix>,
}

impl<T> Clone for TableArgs<T> {
    fn clone(&self) -> Self {
        Self {
            column_names: self.column_names.clone(),
            filter: self.filter.clone(),
            sort: self.sort.clone(),
            pagination: self.pagination.clone(),
            selection: self.selection.clone(),
            expansion: self.expansion.clone(),
            active_item: self.active_item.clone(),
            persist_to: self.persist_to.clone(),
            persistence_key_prefix: self.persistence_key_prefix.clone(),
        }
    }
}

impl<T> Default for TableArgs<T> {
    fn default() -> Self {
        Self {
            column_names: ColumnNames::default(),
            filter: None,
            sort: None,
            pagination: None,
            selection: None,
            expansion: None,
            active_item: None,
            persist_to: None,
            persistence_key_prefix: None,
        }
    }
}

impl<T> fmt::Debug for TableArgs<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableArgs")
            .field("column_names", &self.column_names)
            .field("filter", &self.filter)
            .field("sort", &self.sort)
            .field("pagination", &self.pagination)
            .field("selection", &self.selection)
            .field("expansion", &self.expansion)
            .field("active_item", &self.active_item)
            .field("persist_to", &self.persist_to)
            .field("persistence_key_prefix", &self.persistence_key_prefix)
            .finish()
    }
}

impl<T: TableItem> TableArgs<T> {
    pub fn new(column_names: ColumnNames) -> Self {
        Self {
            column_names,
            ..Self::default()
        }
    }

    pub fn with_filter(mut self, args: FilterArgs<T>) -> Self {
        self.filter = Some(args);
        self
    }

    pub fn with_sort(mut self, args: SortArgs) -> Self {
        self.sort = Some(args);
        self
    }

    pub fn with_pagination(mut self, args: PaginationArgs) -> Self {
        self.pagination = Some(args);
        self
    }

    pub fn with_selection(mut self, args: SelectionArgs<T>) -> Self {
        self.selection = Some(args);
        self
    }

    pub fn with_expansion(mut self, args: ExpansionArgs) -> Self {
        self.expansion = Some(args);
        self
    }

    pub fn with_active_item(mut self, args: ActiveItemArgs) -> Self {
        self.active_item = Some(args);
        self
    }

    pub fn with_persist_to(mut self, persist_to: impl Into<PersistTo>) -> Self {
        self.persist_to = Some(persist_to.into());
        self
    }

    /// Namespaces every persisted key. Fails if `prefix` contains `:`.
    pub fn with_persistence_key_prefix(mut self, prefix: &str) -> Result<Self, TableError> {
        self.persistence_key_prefix = Some(PersistenceKeyPrefix::new(prefix)?);
        Ok(self)
    }

    pub fn is_enabled(&self, feature: TableFeature) -> bool {
        match feature {
            TableFeature::Filter => self.filter.is_some(),
            TableFeature::Sort => self.sort.is_some(),
            TableFeature::Pagination => self.pagination.is_some(),
            TableFeature::Selection => self.selection.is_some(),
            TableFeature::Expansion => self.expansion.is_some(),
            TableFeature::ActiveItem => self.active_item.is_some(),
        }
    }

    /// Where `feature` persists its state.
    pub fn resolve_persist_target(&self, feature: TableFeature) -> PersistTarget {
        let feature_target = match feature {
            TableFeature::Filter => self.filter.as_ref().and_then(|a| a.persist_to),
            TableFeature::Sort => self.sort.as_ref().and_then(|a| a.persist_to),
            TableFeature::Pagination => self.pagination.as_ref().and_then(|a| a.persist_to),
            TableFeature::Selection => None,
            TableFeature::Expansion => self.expansion.as_ref().and_then(|a| a.persist_to),
            TableFeature::ActiveItem => self.active_item.as_ref().and_then(|a| a.persist_to),
        };
        resolve_persist_target(feature, feature_target, self.persist_to.as_ref())
    }

    /// Checks sort configuration against the known columns.
    pub fn validate(&self) -> Result<(), TableError> {
        let Some(sort) = &self.sort else {
            return Ok(());
        };

        if let Some(column) = sort
            .sortable_columns
            .iter()
            .find(|c| !self.column_names.contains(c.as_str()))
        {
            return Err(TableError::unknown_column(column.as_str()));
        }

        if let Some(initial) = &sort.initial_sort {
            let column = initial.column_key.as_str();
            if !self.column_names.contains(column) {
                return Err(TableError::unknown_column(column));
            }
            if !sort.sortable_columns.iter().any(|c| c.as_str() == column) {
                return Err(TableError::unsortable_column(column));
            }
        }

        Ok(())
    }

    /// Combines these args with `other`; see [`crate::merge::merge_feature_args`].
    pub fn merge(self, other: Self) -> Self {
        crate::merge::merge_feature_args(self, other)
    }
}

/// The rows to render and the total row count after filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct TableDerivedState<T> {
    pub current_page_items: Vec<T>,
    pub total_item_count: usize,
}

impl<T> TableDerivedState<T> {
    pub fn new(current_page_items: Vec<T>, total_item_count: usize) -> Self {
        Self {
            current_page_items,
            total_item_count,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CacheKeyFields<'a> {
    filter_values: &'a FilterValues,
    active_sort: Option<&'a ActiveSort>,
    page_number: usize,
    items_per_page: usize,
}

/// Canonical JSON of the state a server query depends on.
///
/// Equal inputs give byte-identical keys; filter categories are ordered by
/// key.
pub fn cache_key(
    filter_values: &FilterValues,
    active_sort: Option<&ActiveSort>,
    pagination: ActivePagination,
) -> String {
    let fields = CacheKeyFields {
        filter_values,
        active_sort,
        page_number: pagination.page_number,
        items_per_page: pagination.items_per_page,
    };
    serde_json::to_string(&fields).unwrap_or_default()
}

/// Table args together with one state cell per feature.
pub struct TableState<T> {
    args: TableArgs<T>,
    filter: FilterState,
    sort: SortState,
    pagination: PaginationState,
    selection: SelectionState<T>,
    expansion: ExpansionState,
    active_item: ActiveItemState,
}

impl<T> Clone for TableState<T> {
    fn clone(&self) -> Self {
        Self {
            args: self.args.clone(),
            filter: self.filter.clone(),
            sort: self.sort.clone(),
            pagination: self.pagination.clone(),
            selection: self.selection.clone(),
            expansion: self.expansion.clone(),
            active_item: self.active_item.clone(),
        }
    }
}

impl<T> fmt::Debug for TableState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableState")
            .field("filter", &self.filter)
            .field("sort", &self.sort)
            .field("pagination", &self.pagination)
            .field("selection", &self.selection)
            .field("expansion", &self.expansion)
            .field("active_item", &self.active_item)
            .finish_non_exhaustive()
    }
}

impl<T: TableItem> TableState<T> {
    /// Validates `args` and attaches each feature to its persistence target.
    ///
    /// Disabled features still get a cell; it reads as the feature's neutral
    /// default and ignores writes.
    pub fn new(args: TableArgs<T>, cx: &PersistenceContext) -> Result<Self, TableError> {
        args.validate()?;

        let prefix = args.persistence_key_prefix.as_ref();
        let filter = FilterState::new(
            args.filter.as_ref(),
            args.resolve_persist_target(TableFeature::Filter),
            prefix,
            cx,
        );
        let sort = SortState::new(
            args.sort.as_ref(),
            args.resolve_persist_target(TableFeature::Sort),
            prefix,
            cx,
        );
        let pagination = PaginationState::new(
            args.pagination.as_ref(),
            args.resolve_persist_target(TableFeature::Pagination),
            prefix,
            cx,
        );
        let selection = SelectionState::new(args.selection.as_ref(), cx);
        let expansion = ExpansionState::new(
            args.expansion.as_ref(),
            args.resolve_persist_target(TableFeature::Expansion),
            prefix,
            cx,
        );
        let active_item = ActiveItemState::new(
            args.active_item.as_ref(),
            args.resolve_persist_target(TableFeature::ActiveItem),
            prefix,
            cx,
        );

        log::debug!(
            "table state: created with features [{}]",
            TableFeature::ALL
                .iter()
                .filter(|f| args.is_enabled(**f))
                .map(|f| f.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(Self {
            args,
            filter,
            sort,
            pagination,
            selection,
            expansion,
            active_item,
        })
    }

    pub fn args(&self) -> &TableArgs<T> {
        &self.args
    }

    pub fn column_names(&self) -> &ColumnNames {
        &self.args.column_names
    }

    pub fn is_enabled(&self, feature: TableFeature) -> bool {
        self.args.is_enabled(feature)
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    pub fn pagination(&self) -> &PaginationState {
        &self.pagination
    }

    pub fn selection(&self) -> &SelectionState<T> {
        &self.selection
    }

    pub fn expansion(&self) -> &ExpansionState {
        &self.expansion
    }

    pub fn active_item(&self) -> &ActiveItemState {
        &self.active_item
    }

    /// Key identifying the current filter, sort and page; changes exactly
    /// when a server-backed table must refetch.
    pub fn cache_key(&self) -> String {
        cache_key(
            &self.filter.filter_values(),
            self.sort.active_sort().as_ref(),
            self.pagination.pagination(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::sort::SortDirection;
    use crate::types::FilterCategoryKey;
    use crate::types::ItemId;

    #[derive(Clone)]
    struct Row;

    impl TableItem for Row {
        fn item_id(&self) -> ItemId {
            ItemId::Num(0)
        }
    }

    fn columns() -> ColumnNames {
        ColumnNames::new().with("name", "Name").with("count", "Count")
    }

    #[test]
    fn test_validate_rejects_unknown_sortable_column() {
        let args = TableArgs::<Row>::new(columns()).with_sort(SortArgs::new(["name", "owner"]));
        assert_eq!(args.validate(), Err(TableError::unknown_column("owner")));
    }

    #[test]
    fn test_validate_rejects_unsortable_initial_sort() {
        let args = TableArgs::<Row>::new(columns())
            .with_sort(SortArgs::new(["name"]).with_initial_sort(ActiveSort::asc("count")));
        assert_eq!(args.validate(), Err(TableError::unsortable_column("count")));
        assert!(TableState::new(args, &PersistenceContext::new()).is_err());
    }

    #[test]
    fn test_prefix_with_separator_is_rejected() {
        let result = TableArgs::<Row>::new(columns()).with_persistence_key_prefix("a:b");
        assert!(matches!(result, Err(TableError::InvalidPersistenceKeyPrefix(_))));
    }

    #[test]
    fn test_cache_key_layout() {
        let filters =
            FilterValues::from([(FilterCategoryKey::from("name"), vec!["a".to_string()])]);
        let key = cache_key(
            &filters,
            Some(&ActiveSort::new("name", SortDirection::Desc)),
            ActivePagination::new(2, 20),
        );
        assert_eq!(
            key,
            concat!(
                r#"{"filterValues":{"name":["a"]},"#,
                r#""activeSort":{"columnKey":"name","direction":"desc"},"#,
                r#""pageNumber":2,"itemsPerPage":20}"#,
            )
        );
        assert_eq!(
            cache_key(&FilterValues::new(), None, ActivePagination::default()),
            r#"{"filterValues":{},"activeSort":null,"pageNumber":1,"itemsPerPage":10}"#
        );
    }

    #[test]
    fn test_cache_key_tracks_state() {
        let cx = PersistenceContext::new();
        let args = TableArgs::<Row>::new(columns())
            .with_sort(SortArgs::new(["name"]))
            .with_pagination(PaginationArgs::new());
        let state = TableState::new(args, &cx).unwrap();
        let first = state.cache_key();
        assert_eq!(first, state.cache_key());

        state.pagination().set_page_number(2);
        assert_ne!(first, state.cache_key());
        state.pagination().set_page_number(1);
        assert_eq!(first, state.cache_key());
    }

    #[test]
    fn test_features_resolve_their_own_targets() {
        let cx = PersistenceContext::new();
        let args = TableArgs::<Row>::new(columns())
            .with_filter(FilterArgs::new(Vec::new()).with_persist_to(PersistTarget::LocalStorage))
            .with_sort(SortArgs::new(["name"]))
            .with_selection(SelectionArgs::new())
            .with_persist_to(PersistTarget::UrlParams);
        let state = TableState::new(args, &cx).unwrap();

        assert_eq!(state.filter().persist_target(), PersistTarget::LocalStorage);
        assert_eq!(state.sort().persist_target(), PersistTarget::UrlParams);
        assert!(state.selection().is_enabled());
        assert!(!state.is_enabled(TableFeature::Expansion));
    }
}
