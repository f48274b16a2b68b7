//! Table configuration and persistence errors

/// Errors returned by table construction, validation and persistence backends.
///
/// Recoverable conditions (malformed persisted values, stale references) never
/// surface here: they are logged and replaced by defaults or corrected by the
/// reconciliation passes in [`crate::batteries`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    /// A persistence key prefix contained the `:` separator.
    #[error("invalid persistence key prefix {0:?}: must not contain ':'")]
    InvalidPersistenceKeyPrefix(String),

    /// A column key referenced by configuration is not in `column_names`.
    #[error("unknown column: {0}")]
    UnknownColumn(String),

    /// A sort was requested on a column not configured as sortable.
    #[error("column is not sortable: {0}")]
    UnsortableColumn(String),

    /// `select_all` was called without the full item collection.
    #[error("select_all needs the full item collection (client-derived tables only)")]
    SelectAllUnavailable,

    /// A URL could not be parsed.
    #[error("invalid URL {url:?}: {message}")]
    InvalidUrl {
        /// The rejected input.
        url: String,
        /// Parser message.
        message: String,
    },

    /// A storage backend could not be opened or initialised.
    #[error("storage error: {0}")]
    Storage(String),
}

impl TableError {
    /// Creates an unknown column error.
    pub fn unknown_column(column: impl Into<String>) -> Self {
        Self::UnknownColumn(column.into())
    }

    /// Creates an unsortable column error.
    pub fn unsortable_column(column: impl Into<String>) -> Self {
        Self::UnsortableColumn(column.into())
    }

    /// Creates an invalid URL error from the rejected input and parse error.
    pub fn invalid_url(url: impl Into<String>, err: url::ParseError) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            message: err.to_string(),
        }
    }

    /// Returns `true` if this error comes from invalid table configuration.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidPersistenceKeyPrefix(_)
                | Self::UnknownColumn(_)
                | Self::UnsortableColumn(_)
        )
    }
}

impl From<rusqlite::Error> for TableError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Storage(err.to_string())
    }
}
