//! Pagination state

use serde::Deserialize;
use serde::Serialize;

use crate::persistence::PersistMode;
use crate::persistence::PersistenceContext;
use crate::persistence::PersistentState;
use crate::persistence::PersistentStateOptions;
use crate::persistence::UrlParamValues;
use crate::types::PersistTarget;
use crate::types::PersistenceKeyPrefix;

/// Page size used when none is configured.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 10;

const PAGE_NUMBER_PARAM: &str = "pageNumber";
const ITEMS_PER_PAGE_PARAM: &str = "itemsPerPage";
const PAGINATION_STORAGE_KEY: &str = "pagination";

/// The current page (1-based) and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivePagination {
    pub page_number: usize,
    pub items_per_page: usize,
}

impl ActivePagination {
    pub fn new(page_number: usize, items_per_page: usize) -> Self {
        Self {
            page_number,
            items_per_page,
        }
    }

    /// Clamps both fields to at least 1.
    pub fn clamped(self) -> Self {
        Self {
            page_number: self.page_number.max(1),
            items_per_page: self.items_per_page.max(1),
        }
    }
}

impl Default for ActivePagination {
    fn default() -> Self {
        Self::new(1, DEFAULT_ITEMS_PER_PAGE)
    }
}

/// Pagination feature configuration.
#[derive(Debug, Clone, Default)]
pub struct PaginationArgs {
    pub initial_items_per_page: Option<usize>,
    pub persist_to: Option<PersistTarget>,
}

impl PaginationArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_initial_items_per_page(mut self, items_per_page: usize) -> Self {
        self.initial_items_per_page = Some(items_per_page);
        self
    }

    pub fn with_persist_to(mut self, target: PersistTarget) -> Self {
        self.persist_to = Some(target);
        self
    }
}

fn serialize_pagination_url_params(pagination: &ActivePagination) -> UrlParamValues {
    UrlParamValues::from([
        (PAGE_NUMBER_PARAM.to_string(), Some(pagination.page_number.to_string())),
        (ITEMS_PER_PAGE_PARAM.to_string(), Some(pagination.items_per_page.to_string())),
    ])
}

fn deserialize_pagination_url_params(params: &UrlParamValues) -> Option<ActivePagination> {
    let page_number = params.get(PAGE_NUMBER_PARAM)?.as_deref()?.trim().parse().ok()?;
    let items_per_page = params.get(ITEMS_PER_PAGE_PARAM)?.as_deref()?.trim().parse().ok()?;
    Some(ActivePagination::new(page_number, items_per_page).clamped())
}

/// Source of truth for the pagination feature.
#[derive(Debug, Clone)]
pub struct PaginationState {
    pagination: PersistentState<ActivePagination>,
}

impl PaginationState {
    pub fn new(
        args: Option<&PaginationArgs>,
        target: PersistTarget,
        prefix: Option<&PersistenceKeyPrefix>,
        cx: &PersistenceContext,
    ) -> Self {
        let items_per_page = args
            .and_then(|args| args.initial_items_per_page)
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_ITEMS_PER_PAGE);

        let persist_to = PersistMode::for_target(target, PAGINATION_STORAGE_KEY, || {
            PersistMode::url_params(
                [PAGE_NUMBER_PARAM, ITEMS_PER_PAGE_PARAM],
                serialize_pagination_url_params,
                deserialize_pagination_url_params,
            )
        });

        let options = PersistentStateOptions::new(ActivePagination::new(1, items_per_page))
            .enabled(args.is_some())
            .with_prefix(prefix.cloned())
            .with_persist_to(persist_to);

        Self {
            pagination: PersistentState::new(options, cx),
        }
    }

    /// The current page and page size, each at least 1.
    pub fn pagination(&self) -> ActivePagination {
        self.pagination.get().clamped()
    }

    pub fn page_number(&self) -> usize {
        self.pagination().page_number
    }

    pub fn items_per_page(&self) -> usize {
        self.pagination().items_per_page
    }

    /// Moves to `page_number`, clamped to at least 1.
    pub fn set_page_number(&self, page_number: usize) {
        let next = ActivePagination {
            page_number: page_number.max(1),
            ..self.pagination()
        };
        log::trace!("pagination state: {next:?}");
        self.pagination.set(next);
    }

    /// Changes the page size (at least 1) and returns to the first page.
    pub fn set_items_per_page(&self, items_per_page: usize) {
        let next = ActivePagination::new(1, items_per_page.max(1));
        log::trace!("pagination state: {next:?}");
        self.pagination.set(next);
    }

    pub fn is_enabled(&self) -> bool {
        self.pagination.is_enabled()
    }

    pub fn persist_target(&self) -> PersistTarget {
        self.pagination.target()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled(target: PersistTarget, cx: &PersistenceContext) -> PaginationState {
        let args = PaginationArgs::new().with_initial_items_per_page(5);
        PaginationState::new(Some(&args), target, None, cx)
    }

    #[test]
    fn test_defaults() {
        let cx = PersistenceContext::new();
        let state = enabled(PersistTarget::State, &cx);
        assert_eq!(state.pagination(), ActivePagination::new(1, 5));

        let disabled = PaginationState::new(None, PersistTarget::State, None, &cx);
        assert_eq!(disabled.pagination(), ActivePagination::new(1, 10));
        disabled.set_page_number(4);
        assert_eq!(disabled.page_number(), 1);
    }

    #[test]
    fn test_setters_clamp() {
        let cx = PersistenceContext::new();
        let state = enabled(PersistTarget::State, &cx);
        state.set_page_number(0);
        assert_eq!(state.page_number(), 1);

        state.set_page_number(3);
        state.set_items_per_page(0);
        assert_eq!(state.pagination(), ActivePagination::new(1, 1));
    }

    #[test]
    fn test_items_per_page_resets_page() {
        let cx = PersistenceContext::new();
        let state = enabled(PersistTarget::State, &cx);
        state.set_page_number(4);
        state.set_items_per_page(20);
        assert_eq!(state.pagination(), ActivePagination::new(1, 20));
    }

    #[test]
    fn test_url_params() {
        let cx = PersistenceContext::new();
        let state = enabled(PersistTarget::UrlParams, &cx);
        state.set_page_number(3);
        assert_eq!(cx.url_params().get("pageNumber").as_deref(), Some("3"));
        assert_eq!(cx.url_params().get("itemsPerPage").as_deref(), Some("5"));

        cx.url_params().navigate("http://localhost/?pageNumber=2").unwrap();
        assert_eq!(state.pagination(), ActivePagination::new(1, 5));

        cx.url_params()
            .navigate("http://localhost/?pageNumber=x&itemsPerPage=5")
            .unwrap();
        assert_eq!(state.pagination(), ActivePagination::new(1, 5));

        cx.url_params()
            .navigate("http://localhost/?pageNumber=4&itemsPerPage=25")
            .unwrap();
        assert_eq!(state.pagination(), ActivePagination::new(4, 25));
    }

    #[test]
    fn test_storage_values_are_clamped_on_read() {
        let cx = PersistenceContext::new();
        let state = enabled(PersistTarget::LocalStorage, &cx);
        cx.storage(crate::persistence::StorageArea::Local)
            .set_item("pagination", r#"{"pageNumber":0,"itemsPerPage":0}"#);
        assert_eq!(state.pagination(), ActivePagination::new(1, 1));
    }
}
