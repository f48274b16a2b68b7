//! Sort state

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

use crate::persistence::PersistMode;
use crate::persistence::PersistenceContext;
use crate::persistence::PersistentState;
use crate::persistence::PersistentStateOptions;
use crate::persistence::UrlParamValues;
use crate::types::ColumnKey;
use crate::types::PersistTarget;
use crate::types::PersistenceKeyPrefix;

const SORT_COLUMN_PARAM: &str = "sortColumn";
const SORT_DIRECTION_PARAM: &str = "sortDirection";
const SORT_STORAGE_KEY: &str = "sort";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The column currently sorted on and its direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveSort {
    pub column_key: ColumnKey,
    pub direction: SortDirection,
}

impl ActiveSort {
    pub fn new(column_key: impl Into<ColumnKey>, direction: SortDirection) -> Self {
        Self {
            column_key: column_key.into(),
            direction,
        }
    }

    pub fn asc(column_key: impl Into<ColumnKey>) -> Self {
        Self::new(column_key, SortDirection::Asc)
    }

    pub fn desc(column_key: impl Into<ColumnKey>) -> Self {
        Self::new(column_key, SortDirection::Desc)
    }
}

/// Sort feature configuration.
#[derive(Debug, Clone, Default)]
pub struct SortArgs {
    /// Columns the user may sort by; each must be a known column.
    pub sortable_columns: Vec<ColumnKey>,
    /// Sort used before the user picks one. Defaults to the first sortable
    /// column, ascending.
    pub initial_sort: Option<ActiveSort>,
    pub persist_to: Option<PersistTarget>,
}

impl SortArgs {
    pub fn new<I>(sortable_columns: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ColumnKey>,
    {
        Self {
            sortable_columns: sortable_columns.into_iter().map(Into::into).collect(),
            initial_sort: None,
            persist_to: None,
        }
    }

    pub fn with_initial_sort(mut self, sort: ActiveSort) -> Self {
        self.initial_sort = Some(sort);
        self
    }

    pub fn with_persist_to(mut self, target: PersistTarget) -> Self {
        self.persist_to = Some(target);
        self
    }

    /// The sort in effect before any user interaction.
    pub fn default_sort(&self) -> Option<ActiveSort> {
        self.initial_sort
            .clone()
            .or_else(|| self.sortable_columns.first().cloned().map(ActiveSort::asc))
    }
}

fn serialize_sort_url_params(sort: &Option<ActiveSort>) -> UrlParamValues {
    UrlParamValues::from([
        (
            SORT_COLUMN_PARAM.to_string(),
            sort.as_ref().map(|s| s.column_key.to_string()),
        ),
        (
            SORT_DIRECTION_PARAM.to_string(),
            sort.as_ref().map(|s| s.direction.to_string()),
        ),
    ])
}

fn deserialize_sort_url_params(
    params: &UrlParamValues,
    sortable: &[ColumnKey],
) -> Option<Option<ActiveSort>> {
    let column = params.get(SORT_COLUMN_PARAM)?.as_deref()?;
    let direction = SortDirection::parse(params.get(SORT_DIRECTION_PARAM)?.as_deref()?)?;

    if !sortable.iter().any(|c| c.as_str() == column) {
        log::debug!("sort state: ignoring unknown sort column {column:?} from url");
        return None;
    }

    Some(Some(ActiveSort::new(column, direction)))
}

/// Source of truth for the sort feature.
#[derive(Debug, Clone)]
pub struct SortState {
    active_sort: PersistentState<Option<ActiveSort>>,
    sortable_columns: Arc<[ColumnKey]>,
}

impl SortState {
    pub fn new(
        args: Option<&SortArgs>,
        target: PersistTarget,
        prefix: Option<&PersistenceKeyPrefix>,
        cx: &PersistenceContext,
    ) -> Self {
        let sortable_columns: Arc<[ColumnKey]> = args
            .map(|args| args.sortable_columns.clone())
            .unwrap_or_default()
            .into();
        let initial = args.and_then(SortArgs::default_sort);

        let sortable = Arc::clone(&sortable_columns);
        let persist_to = PersistMode::for_target(target, SORT_STORAGE_KEY, move || {
            PersistMode::url_params(
                [SORT_COLUMN_PARAM, SORT_DIRECTION_PARAM],
                serialize_sort_url_params,
                move |params| deserialize_sort_url_params(params, &sortable),
            )
        });

        let options = PersistentStateOptions::new(initial)
            .enabled(args.is_some())
            .with_prefix(prefix.cloned())
            .with_persist_to(persist_to);

        Self {
            active_sort: PersistentState::new(options, cx),
            sortable_columns,
        }
    }

    pub fn active_sort(&self) -> Option<ActiveSort> {
        self.active_sort.get()
    }

    /// Replaces the active sort. Sorts on columns that are not sortable are
    /// ignored.
    pub fn set_active_sort(&self, sort: Option<ActiveSort>) {
        if let Some(sort) = &sort
            && !self.is_sortable(sort.column_key.as_str())
        {
            log::warn!("sort state: ignoring sort on unsortable column {}", sort.column_key);
            return;
        }
        log::trace!("sort state: {sort:?}");
        self.active_sort.set(sort);
    }

    pub fn sortable_columns(&self) -> &[ColumnKey] {
        &self.sortable_columns
    }

    pub fn is_sortable(&self, column: &str) -> bool {
        self.sortable_columns.iter().any(|c| c.as_str() == column)
    }

    pub fn is_enabled(&self) -> bool {
        self.active_sort.is_enabled()
    }

    pub fn persist_target(&self) -> PersistTarget {
        self.active_sort.target()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> SortArgs {
        SortArgs::new(["name", "count"])
    }

    #[test]
    fn test_default_is_first_sortable_ascending() {
        let cx = PersistenceContext::new();
        let state = SortState::new(Some(&args()), PersistTarget::State, None, &cx);
        assert_eq!(state.active_sort(), Some(ActiveSort::asc("name")));
    }

    #[test]
    fn test_initial_sort_wins() {
        let cx = PersistenceContext::new();
        let args = args().with_initial_sort(ActiveSort::desc("count"));
        let state = SortState::new(Some(&args), PersistTarget::State, None, &cx);
        assert_eq!(state.active_sort(), Some(ActiveSort::desc("count")));
    }

    #[test]
    fn test_unsortable_column_is_ignored() {
        let cx = PersistenceContext::new();
        let state = SortState::new(Some(&args()), PersistTarget::State, None, &cx);
        state.set_active_sort(Some(ActiveSort::asc("description")));
        assert_eq!(state.active_sort(), Some(ActiveSort::asc("name")));
        state.set_active_sort(None);
        assert_eq!(state.active_sort(), None);
    }

    #[test]
    fn test_url_params_round_trip() {
        let cx = PersistenceContext::new();
        let state = SortState::new(Some(&args()), PersistTarget::UrlParams, None, &cx);
        state.set_active_sort(Some(ActiveSort::desc("count")));
        assert_eq!(cx.url_params().get("sortColumn").as_deref(), Some("count"));
        assert_eq!(cx.url_params().get("sortDirection").as_deref(), Some("desc"));
        assert_eq!(state.active_sort(), Some(ActiveSort::desc("count")));
    }

    #[test]
    fn test_url_params_require_both_and_known_column() {
        let cx = PersistenceContext::new();
        let state = SortState::new(Some(&args()), PersistTarget::UrlParams, None, &cx);

        cx.url_params().navigate("http://localhost/?sortColumn=count").unwrap();
        assert_eq!(state.active_sort(), Some(ActiveSort::asc("name")));

        cx.url_params()
            .navigate("http://localhost/?sortColumn=bogus&sortDirection=asc")
            .unwrap();
        assert_eq!(state.active_sort(), Some(ActiveSort::asc("name")));

        cx.url_params()
            .navigate("http://localhost/?sortColumn=count&sortDirection=sideways")
            .unwrap();
        assert_eq!(state.active_sort(), Some(ActiveSort::asc("name")));
    }

    #[test]
    fn test_storage_json_shape() {
        let cx = PersistenceContext::new();
        let state = SortState::new(Some(&args()), PersistTarget::LocalStorage, None, &cx);
        state.set_active_sort(Some(ActiveSort::asc("count")));
        assert_eq!(
            cx.storage(crate::persistence::StorageArea::Local).get_item("sort").as_deref(),
            Some(r#"{"columnKey":"count","direction":"asc"}"#)
        );
    }

    #[test]
    fn test_direction_toggle() {
        assert_eq!(SortDirection::Asc.toggled(), SortDirection::Desc);
        assert_eq!(SortDirection::parse("desc"), Some(SortDirection::Desc));
        assert_eq!(SortDirection::parse("DESC"), None);
    }
}
