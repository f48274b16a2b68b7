#![allow(dead_code)]

use simplelog::{Config, LevelFilter, TestLogger};
use table_batteries::features::sort::{SortValue, SortValues};
use table_batteries::types::{ColumnKey, ColumnNames, ItemId, TableItem};

pub fn init_logging() {
    let _ = TestLogger::init(LevelFilter::Trace, Config::default());
}

#[derive(Debug, Clone, PartialEq)]
pub struct Thing {
    pub id: i64,
    pub name: String,
    pub description: String,
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

pub fn thing(id: i64) -> Thing {
    Thing {
        id,
        name: format!("Thing {id:02}"),
        description: format!("Something from thing {id}"),
    }
}

pub fn things(count: i64) -> Vec<Thing> {
    (1..=count).map(thing).collect()
}

pub fn columns() -> ColumnNames {
    ColumnNames::new()
        .with("name", "Name")
        .with("description", "Description")
}

pub fn sort_values(thing: &Thing) -> SortValues {
    SortValues::from([
        (ColumnKey::from("name"), SortValue::from(thing.name.as_str())),
        (ColumnKey::from("description"), SortValue::from(thing.description.as_str())),
    ])
}

pub fn names(items: &[Thing]) -> Vec<&str> {
    items.iter().map(|t| t.name.as_str()).collect()
}
