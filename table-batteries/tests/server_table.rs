//! Server-derived tables: the caller fetches rows by cache key and hands
//! them back for rendering.

mod common;

use std::collections::HashMap;

use common::{Thing, columns, thing};
use table_batteries::prelude::*;
use table_batteries::state::StateCell;

/// Stands in for an API that filters and pages on its side.
struct FakeServer {
    items: Vec<Thing>,
    requests: StateCell<usize>,
    cache: StateCell<HashMap<String, TableDerivedState<Thing>>>,
}

impl FakeServer {
    fn new(count: i64) -> Self {
        Self {
            items: common::things(count),
            requests: StateCell::new(0),
            cache: StateCell::new(HashMap::new()),
        }
    }

    fn fetch(&self, state: &TableState<Thing>) -> TableDerivedState<Thing> {
        let key = state.cache_key();
        if let Some(hit) = self.cache.with(|cache| cache.get(&key).cloned()) {
            return hit;
        }
        self.requests.update(|n| *n += 1);
        let client = ClientTableArgs::new().with_sort_values(common::sort_values);
        let derived = state.client_derived_state(&self.items, &client);
        self.cache.update(|cache| {
            cache.insert(key, derived.clone());
        });
        derived
    }
}

fn args() -> TableArgs<Thing> {
    TableArgs::new(columns())
        .with_filter(FilterArgs::new(vec![FilterCategory::new("name", "Name")]))
        .with_sort(SortArgs::new(["name"]))
        .with_pagination(PaginationArgs::new())
        .with_selection(SelectionArgs::new())
        .with_active_item(ActiveItemArgs::new())
}

#[test]
fn test_cache_key_drives_fetches() {
    let server = FakeServer::new(30);
    let state = TableState::new(args(), &PersistenceContext::new()).unwrap();

    server.fetch(&state);
    server.fetch(&state);
    assert_eq!(server.requests.get(), 1);

    state.pagination().set_page_number(2);
    let page_two = server.fetch(&state);
    assert_eq!(server.requests.get(), 2);
    assert_eq!(page_two.current_page_items[0], thing(11));

    state.pagination().set_page_number(1);
    server.fetch(&state);
    assert_eq!(server.requests.get(), 2);
}

#[test]
fn test_equal_states_share_cache_keys() {
    let a = TableState::new(args(), &PersistenceContext::new()).unwrap();
    let b = TableState::new(args(), &PersistenceContext::new()).unwrap();

    a.filter().set_category_values("name", vec!["x".into()]);
    a.sort().set_active_sort(Some(ActiveSort::asc("name")));
    b.sort().set_active_sort(Some(ActiveSort::asc("name")));
    b.filter().set_category_values("name", vec!["x".into()]);
    assert_eq!(a.cache_key(), b.cache_key());

    b.sort().set_active_sort(Some(ActiveSort::desc("name")));
    assert_ne!(a.cache_key(), b.cache_key());
}

#[test]
fn test_server_batteries_correct_page_after_shrink() {
    let server = FakeServer::new(25);
    let state = TableState::new(args(), &PersistenceContext::new()).unwrap();
    state.pagination().set_page_number(3);
    let before = state.cache_key();

    state.filter().set_category_values("name", vec!["Thing 1".into()]);
    let derived = server.fetch(&state);
    assert!(derived.current_page_items.is_empty());

    let b = TableBatteries::new(state.clone(), derived, TableBatteriesOptions::new());
    assert_eq!(b.corrections(), &[Correction::PageNumberClamped { from: 3, to: 1 }]);
    assert_ne!(state.cache_key(), before);

    let b = TableBatteries::new(state.clone(), server.fetch(&state), TableBatteriesOptions::new());
    assert!(b.corrections().is_empty());
    assert_eq!(b.current_page_items().len(), 10);
    assert_eq!(b.pagination_props().item_count, 10);
}

#[test]
fn test_select_all_unavailable_on_server_tables() {
    let server = FakeServer::new(30);
    let state = TableState::new(args(), &PersistenceContext::new()).unwrap();
    let b = TableBatteries::new(state.clone(), server.fetch(&state), TableBatteriesOptions::new());

    b.selection().select_page();
    assert_eq!(b.selection().select_all(), Err(TableError::SelectAllUnavailable));
    assert_eq!(b.selection().selected_count(), 10);
    assert!(!b.toolbar_bulk_selector_props().can_select_all);
}

#[test]
fn test_row_click_ignores_nested_controls() {
    let server = FakeServer::new(5);
    let state = TableState::new(args(), &PersistenceContext::new()).unwrap();
    let b = TableBatteries::new(state.clone(), server.fetch(&state), TableBatteriesOptions::new());
    let opened = StateCell::new(None);
    let open = |item: &Thing| opened.set(Some(item.id));

    for target in [
        ClickTarget::new(["input", "td", "tr"]),
        ClickTarget::new(["svg", "Button", "td", "tr"]),
        ClickTarget::new(["span", "a", "td", "tr"]),
    ] {
        assert!(!b.handle_row_click(&thing(3), &target, Some(&open)));
    }
    assert_eq!(opened.get(), None);
    assert_eq!(state.active_item().active_item_id(), None);

    let target = ClickTarget::new(["span", "td", "tr", "a"]);
    assert!(b.handle_row_click(&thing(3), &target, Some(&open)));
    assert_eq!(opened.get(), Some(3));
    assert!(b.tr_props(&thing(3)).is_row_selected);
}

#[test]
fn test_loading_holds_off_active_item_clear() {
    let state = TableState::new(args(), &PersistenceContext::new()).unwrap();
    state.active_item().set_active_item_id(Some(ItemId::Num(3)));

    let loading = TableBatteriesOptions::new().loading(true);
    let b = TableBatteries::new(state.clone(), TableDerivedState::new(Vec::new(), 0), loading);
    assert!(b.corrections().is_empty());
    assert_eq!(state.active_item().active_item_id(), Some(ItemId::Num(3)));

    let derived = TableDerivedState::new(vec![thing(4)], 1);
    let b = TableBatteries::new(state.clone(), derived, TableBatteriesOptions::new());
    assert_eq!(b.corrections(), &[Correction::ActiveItemCleared { id: ItemId::Num(3) }]);
}
