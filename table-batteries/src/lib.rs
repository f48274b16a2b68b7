//! State management for data tables.
//!
//! A table is described by [`TableArgs`]: its columns plus optional args for
//! each feature (filter, sort, pagination, selection, expansion, active
//! item). [`TableState`] holds the live value of every feature, each
//! persisted to in-memory state, URL query params or a key-value storage
//! area. [`TableBatteries`] combines that state with the rows of the current
//! render into derived helpers and component props.

pub mod batteries;
pub mod callback;
pub mod client;
pub mod error;
pub mod features;
pub mod merge;
pub mod persistence;
pub mod row_click;
pub mod state;
pub mod table_state;
pub mod types;

pub use batteries::{TableBatteries, TableBatteriesOptions, client_table_batteries};
pub use error::TableError;
pub use table_state::{TableArgs, TableDerivedState, TableState};

pub mod prelude {
    pub use crate::batteries::{
        Correction, TableBatteries, TableBatteriesOptions, TableVariant, client_table_batteries,
    };
    pub use crate::callback::Callback;
    pub use crate::client::{
        ClientTableArgs, client_table_derived_state, client_table_filtered_items,
    };
    pub use crate::error::TableError;
    pub use crate::features::active_item::ActiveItemArgs;
    pub use crate::features::expansion::{ExpandableVariant, ExpansionArgs};
    pub use crate::features::filter::{
        FilterArgs, FilterCategory, FilterLogicOperator, FilterType, FilterValues,
    };
    pub use crate::features::pagination::PaginationArgs;
    pub use crate::features::selection::SelectionArgs;
    pub use crate::features::sort::{ActiveSort, SortArgs, SortDirection, SortValue, SortValues};
    pub use crate::merge::merge_feature_args;
    pub use crate::persistence::{
        MemoryStorage, PerFeaturePersistTo, PersistTo, PersistenceContext, SqliteStorage,
        StorageArea, StorageBackend, UrlParams,
    };
    pub use crate::row_click::ClickTarget;
    pub use crate::table_state::{TableArgs, TableDerivedState, TableState};
    pub use crate::types::{
        ColumnKey, ColumnNames, FilterCategoryKey, ItemId, PersistTarget, TableFeature, TableItem,
    };
}
