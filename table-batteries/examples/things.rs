//! Renders a small client-side table to stdout.
//!
//! Walks through filtering, sorting, paging and selecting rows, with state
//! kept in URL params so the final URL can be pasted back to restore it.
//! Logs go to `things.log`.

use std::fs::File;

use simplelog::{Config, LevelFilter, WriteLogger};
use table_batteries::prelude::*;

#[derive(Debug, Clone)]
struct Thing {
    id: i64,
    name: String,
    description: String,
}

impl TableItem for Thing {
    fn item_id(&self) -> ItemId {
        ItemId::Num(self.id)
    }

    fn field(&self, key: &str) -> Option<String> {
        match key {
            "name" => Some(self.name.clone()),
            "description" => Some(self.description.clone()),
            _ => None,
        }
    }
}

fn render(batteries: &TableBatteries<Thing>) {
    let columns = batteries.state().column_names();
    let header: Vec<String> = columns
        .keys()
        .map(|key| {
            let th = batteries.th_props(key.as_str());
            match th.sort {
                Some(sort) if sort.sort_by.index == Some(sort.column_index) => {
                    let arrow = match sort.sort_by.direction {
                        Some(SortDirection::Desc) => "v",
                        _ => "^",
                    };
                    format!("{} {arrow}", th.children)
                }
                _ => th.children,
            }
        })
        .collect();
    println!("    | {}", header.join(" | "));

    for (row_index, item) in batteries.current_page_items().iter().enumerate() {
        let checkbox = batteries.select_checkbox_td_props(item, row_index);
        let cells: Vec<String> = columns
            .keys()
            .filter_map(|key| item.field(key.as_str()))
            .collect();
        let marker = if batteries.tr_props(item).is_row_selected { ">" } else { " " };
        println!(
            "{marker}[{}] | {}",
            if checkbox.is_selected { "x" } else { " " },
            cells.join(" | ")
        );
    }

    let pagination = batteries.pagination_props();
    println!(
        "page {} of {} ({} items), {} selected\n",
        pagination.page,
        pagination.item_count.div_ceil(pagination.per_page).max(1),
        pagination.item_count,
        batteries.selection().selected_count()
    );
}

fn main() -> Result<(), TableError> {
    if let Ok(log_file) = File::create("things.log") {
        let _ = WriteLogger::init(LevelFilter::Trace, Config::default(), log_file);
    }

    let items: Vec<Thing> = (1..=12)
        .map(|id| Thing {
            id,
            name: format!("Thing {id:02}"),
            description: format!("Something from thing {id}"),
        })
        .collect();

    let params = UrlParams::new("https://example.com/things")?;
    let cx = PersistenceContext::new().with_url_params(params);
    let args = TableArgs::new(
        ColumnNames::new()
            .with("name", "Name")
            .with("description", "Description"),
    )
    .with_filter(FilterArgs::new(vec![
        FilterCategory::new("name", "Name").with_placeholder("Filter by name..."),
    ]))
    .with_sort(SortArgs::new(["name", "description"]).with_initial_sort(ActiveSort::asc("name")))
    .with_pagination(PaginationArgs::new().with_initial_items_per_page(5))
    .with_selection(SelectionArgs::new())
    .with_active_item(ActiveItemArgs::new())
    .with_persist_to(PersistTarget::UrlParams)
    .with_persistence_key_prefix("things")?;

    let state = TableState::new(args, &cx)?;
    let client = ClientTableArgs::new().with_sort_values(|thing: &Thing| {
        SortValues::from([
            (ColumnKey::from("name"), SortValue::from(thing.name.as_str())),
            (ColumnKey::from("description"), SortValue::from(thing.description.as_str())),
        ])
    });
    let batteries =
        || client_table_batteries(state.clone(), &items, &client, TableBatteriesOptions::new());

    println!("initial:");
    render(&batteries());

    let filter_toolbar = batteries().filter_toolbar_props();
    filter_toolbar.set_filter_values.call(FilterValues::from([(
        FilterCategoryKey::from("name"),
        vec!["Thing 01".to_string(), "Thing 1".to_string()],
    )]));
    println!("filtered by \"Thing 01\" or \"Thing 1\":");
    render(&batteries());

    let b = batteries();
    if let Some(sort) = b.th_props("name").sort {
        sort.on_sort.call((sort.column_index, SortDirection::Desc));
    }
    b.toolbar_bulk_selector_props().on_select_page.call(true);
    println!("sorted descending, page selected:");
    let b = batteries();
    render(&b);

    if let Some(first) = b.current_page_items().first() {
        b.handle_row_click(first, &ClickTarget::cell(), None);
    }
    println!("first row activated:");
    render(&batteries());

    println!("url: {}", cx.url_params().href());
    Ok(())
}
