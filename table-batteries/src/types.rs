//! Core value types shared by every table feature

use std::borrow::Borrow;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::error::TableError;

/// Identifier of a table item: a string or a number.
///
/// Serialized untagged, so `7` and `"abc"` round-trip through JSON as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Num(i64),
    Str(String),
}

impl ItemId {
    /// Parses a string that may hold a number.
    ///
    /// Integer-looking strings become [`ItemId::Num`], everything else stays a
    /// string. Used when ids come back from URL parameters.
    pub fn parse_maybe_numeric(value: &str) -> Self {
        match value.trim().parse::<i64>() {
            Ok(n) => Self::Num(n),
            Err(_) => Self::Str(value.to_string()),
        }
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Num(n) => write!(f, "{n}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ItemId {
    fn from(value: i64) -> Self {
        Self::Num(value)
    }
}

impl From<i32> for ItemId {
    fn from(value: i32) -> Self {
        Self::Num(value.into())
    }
}

impl From<u32> for ItemId {
    fn from(value: u32) -> Self {
        Self::Num(value.into())
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

macro_rules! string_key {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(key: impl Into<String>) -> Self {
                Self(key.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_key!(
    /// Key of a data column, as listed in [`ColumnNames`].
    ColumnKey
);

string_key!(
    /// Key of a filter category; often, but not necessarily, a column key.
    FilterCategoryKey
);

/// Ordered mapping from column key to display name.
///
/// Order is render order; `th_props` reports sort indices against it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnNames(Vec<(ColumnKey, String)>);

impl ColumnNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a column, replacing the display name if the key already exists.
    pub fn with(mut self, key: impl Into<ColumnKey>, name: impl Into<String>) -> Self {
        let key = key.into();
        let name = name.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = name,
            None => self.0.push((key, name)),
        }
        self
    }

    pub fn keys(&self) -> impl Iterator<Item = &ColumnKey> {
        self.0.iter().map(|(k, _)| k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ColumnKey, &str)> {
        self.0.iter().map(|(k, n)| (k, n.as_str()))
    }

    pub fn name(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, n)| n.as_str())
    }

    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.0.iter().position(|(k, _)| k.as_str() == key)
    }

    pub fn key_at(&self, index: usize) -> Option<&ColumnKey> {
        self.0.get(index).map(|(k, _)| k)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index_of(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<ColumnKey>, V: Into<String>> FromIterator<(K, V)> for ColumnNames {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |names, (k, v)| names.with(k, v))
    }
}

/// Namespace for persisted keys, letting several tables share one URL or
/// storage area.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PersistenceKeyPrefix(String);

impl PersistenceKeyPrefix {
    /// Creates a prefix, rejecting values containing `:`.
    pub fn new(prefix: impl Into<String>) -> Result<Self, TableError> {
        let prefix = prefix.into();
        if prefix.contains(':') {
            return Err(TableError::InvalidPersistenceKeyPrefix(prefix));
        }
        Ok(Self(prefix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `"{prefix}:{key}"`.
    pub fn apply(&self, key: &str) -> String {
        format!("{}:{}", self.0, key)
    }
}

impl TryFrom<&str> for PersistenceKeyPrefix {
    type Error = TableError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Prefixes `key` when a prefix is configured.
pub fn prefixed_key(prefix: Option<&PersistenceKeyPrefix>, key: &str) -> String {
    match prefix {
        Some(prefix) => prefix.apply(key),
        None => key.to_string(),
    }
}

/// The six table features, in the fixed order used when merging args.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TableFeature {
    Filter,
    Sort,
    Pagination,
    Selection,
    Expansion,
    ActiveItem,
}

impl TableFeature {
    pub const ALL: [TableFeature; 6] = [
        Self::Filter,
        Self::Sort,
        Self::Pagination,
        Self::Selection,
        Self::Expansion,
        Self::ActiveItem,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Filter => "filter",
            Self::Sort => "sort",
            Self::Pagination => "pagination",
            Self::Selection => "selection",
            Self::Expansion => "expansion",
            Self::ActiveItem => "activeItem",
        }
    }
}

impl fmt::Display for TableFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a feature's state lives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PersistTarget {
    /// In-memory only; lost when the table state is rebuilt.
    #[default]
    State,
    UrlParams,
    LocalStorage,
    SessionStorage,
}

/// A row type that can be displayed in a table.
///
/// `item_id` must be unique within a collection. `field` is the accessor used
/// by filter categories that do not supply their own; the default returns
/// nothing, which makes such categories reject every item.
pub trait TableItem: Clone + Send + Sync + 'static {
    fn item_id(&self) -> ItemId;

    fn field(&self, _key: &str) -> Option<String> {
        None
    }
}
