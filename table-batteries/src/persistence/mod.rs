//! Persistent value store
//!
//! Provides `PersistentState<T>`, a value cell whose contents live in memory,
//! in URL query parameters or in a key/value storage area, plus the backends
//! those targets are read from. Every table feature keeps its state in one of
//! these cells.

mod config;
mod memory;
mod sqlite;
mod storage;
mod url_params;

pub use config::*;
pub use memory::*;
pub use sqlite::*;
pub use storage::*;
pub use url_params::*;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::state::StateCell;
use crate::types::PersistTarget;
use crate::types::PersistenceKeyPrefix;
use crate::types::prefixed_key;

/// URL parameter values keyed by unprefixed parameter name.
///
/// `None` means the parameter is absent (or, when writing, removed).
pub type UrlParamValues = BTreeMap<String, Option<String>>;

/// Converts a value into the URL parameters it owns.
pub type SerializeFn<T> = Arc<dyn Fn(&T) -> UrlParamValues + Send + Sync>;

/// Converts URL parameters back into a value; `None` selects the default.
pub type DeserializeFn<T> = Arc<dyn Fn(&UrlParamValues) -> Option<T> + Send + Sync>;

/// Where and how a [`PersistentState`] stores its value.
pub enum PersistMode<T> {
    /// In memory; lost when the state is rebuilt.
    State,
    /// In the query parameters named by `keys`.
    UrlParams {
        keys: Vec<String>,
        serialize: SerializeFn<T>,
        deserialize: DeserializeFn<T>,
    },
    /// As JSON under `key` in a storage area.
    Storage { target: StorageArea, key: String },
}

impl<T> PersistMode<T> {
    /// URL parameter persistence over `keys`.
    pub fn url_params<K, S, D>(keys: K, serialize: S, deserialize: D) -> Self
    where
        K: IntoIterator,
        K::Item: Into<String>,
        S: Fn(&T) -> UrlParamValues + Send + Sync + 'static,
        D: Fn(&UrlParamValues) -> Option<T> + Send + Sync + 'static,
    {
        Self::UrlParams {
            keys: keys.into_iter().map(Into::into).collect(),
            serialize: Arc::new(serialize),
            deserialize: Arc::new(deserialize),
        }
    }

    /// Storage persistence under `key`.
    pub fn storage(target: StorageArea, key: impl Into<String>) -> Self {
        Self::Storage {
            target,
            key: key.into(),
        }
    }

    /// Builds the mode for a resolved [`PersistTarget`].
    ///
    /// `url_params` is only called for [`PersistTarget::UrlParams`].
    pub fn for_target(
        target: PersistTarget,
        storage_key: &str,
        url_params: impl FnOnce() -> Self,
    ) -> Self {
        match target {
            PersistTarget::State => Self::State,
            PersistTarget::UrlParams => url_params(),
            PersistTarget::LocalStorage => Self::storage(StorageArea::Local, storage_key),
            PersistTarget::SessionStorage => Self::storage(StorageArea::Session, storage_key),
        }
    }
}

impl<T> fmt::Debug for PersistMode<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::State => f.write_str("State"),
            Self::UrlParams { keys, .. } => f
                .debug_struct("UrlParams")
                .field("keys", keys)
                .finish_non_exhaustive(),
            Self::Storage { target, key } => f
                .debug_struct("Storage")
                .field("target", target)
                .field("key", key)
                .finish(),
        }
    }
}

/// Options for [`PersistentState::new`].
#[derive(Debug)]
pub struct PersistentStateOptions<T> {
    /// When false the cell always reads as `default_value` and ignores writes.
    pub is_enabled: bool,
    pub default_value: T,
    pub persistence_key_prefix: Option<PersistenceKeyPrefix>,
    pub persist_to: PersistMode<T>,
}

impl<T> PersistentStateOptions<T> {
    /// Enabled, in-memory options.
    pub fn new(default_value: T) -> Self {
        Self {
            is_enabled: true,
            default_value,
            persistence_key_prefix: None,
            persist_to: PersistMode::State,
        }
    }

    pub fn enabled(mut self, is_enabled: bool) -> Self {
        self.is_enabled = is_enabled;
        self
    }

    pub fn with_prefix(mut self, prefix: Option<PersistenceKeyPrefix>) -> Self {
        self.persistence_key_prefix = prefix;
        self
    }

    pub fn with_persist_to(mut self, persist_to: PersistMode<T>) -> Self {
        self.persist_to = persist_to;
        self
    }
}

/// The URL parameter and storage backends a table persists to.
///
/// One context can be shared by several tables; give each a distinct
/// [`PersistenceKeyPrefix`] to keep their keys apart.
///
/// # Example
///
/// ```ignore
/// let cx = PersistenceContext::new()
///     .with_url_params(UrlParams::new("https://example.com/things")?)
///     .with_local_storage(Arc::new(SqliteStorage::open("state.db")?));
/// ```
#[derive(Clone)]
pub struct PersistenceContext {
    url_params: UrlParams,
    local_storage: Arc<dyn StorageBackend>,
    session_storage: Arc<dyn StorageBackend>,
}

impl PersistenceContext {
    /// A context at `http://localhost/` with in-memory storage areas.
    pub fn new() -> Self {
        Self {
            url_params: UrlParams::default(),
            local_storage: Arc::new(MemoryStorage::new()),
            session_storage: Arc::new(MemoryStorage::new()),
        }
    }

    pub fn with_url_params(mut self, url_params: UrlParams) -> Self {
        self.url_params = url_params;
        self
    }

    pub fn with_local_storage(mut self, storage: Arc<dyn StorageBackend>) -> Self {
        self.local_storage = storage;
        self
    }

    pub fn with_session_storage(mut self, storage: Arc<dyn StorageBackend>) -> Self {
        self.session_storage = storage;
        self
    }

    pub fn url_params(&self) -> &UrlParams {
        &self.url_params
    }

    pub fn storage(&self, area: StorageArea) -> &Arc<dyn StorageBackend> {
        match area {
            StorageArea::Local => &self.local_storage,
            StorageArea::Session => &self.session_storage,
        }
    }
}

impl Default for PersistenceContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PersistenceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistenceContext")
            .field("href", &self.url_params.href())
            .finish_non_exhaustive()
    }
}

enum Backend<T> {
    State(StateCell<T>),
    UrlParams {
        params: UrlParams,
        keys: Vec<String>,
        prefix: Option<PersistenceKeyPrefix>,
        serialize: SerializeFn<T>,
        deserialize: DeserializeFn<T>,
    },
    Storage {
        area: StorageArea,
        storage: Arc<dyn StorageBackend>,
        key: String,
    },
}

impl<T> Clone for Backend<T> {
    fn clone(&self) -> Self {
        match self {
            Self::State(cell) => Self::State(cell.clone()),
            Self::UrlParams {
                params,
                keys,
                prefix,
                serialize,
                deserialize,
            } => Self::UrlParams {
                params: params.clone(),
                keys: keys.clone(),
                prefix: prefix.clone(),
                serialize: Arc::clone(serialize),
                deserialize: Arc::clone(deserialize),
            },
            Self::Storage { area, storage, key } => Self::Storage {
                area: *area,
                storage: Arc::clone(storage),
                key: key.clone(),
            },
        }
    }
}

/// A value cell persisted to memory, URL parameters or storage.
///
/// Reads never fail: absent, empty or malformed persisted data reads as the
/// default. Clones are handles onto the same underlying value.
///
/// # Example
///
/// ```
/// use table_batteries::persistence::{PersistenceContext, PersistentState, PersistentStateOptions};
///
/// let cx = PersistenceContext::new();
/// let page = PersistentState::new(PersistentStateOptions::new(1usize), &cx);
/// page.set(4);
/// assert_eq!(page.get(), 4);
/// ```
pub struct PersistentState<T> {
    is_enabled: bool,
    default_value: T,
    backend: Backend<T>,
}

impl<T: Clone> Clone for PersistentState<T> {
    fn clone(&self) -> Self {
        Self {
            is_enabled: self.is_enabled,
            default_value: self.default_value.clone(),
            backend: self.backend.clone(),
        }
    }
}

impl<T> fmt::Debug for PersistentState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistentState")
            .field("is_enabled", &self.is_enabled)
            .field("target", &self.target())
            .finish_non_exhaustive()
    }
}

impl<T> PersistentState<T>
where
    T: Clone + Serialize + DeserializeOwned,
{
    /// Creates the cell, attaching it to the backend named in `options`.
    pub fn new(options: PersistentStateOptions<T>, cx: &PersistenceContext) -> Self {
        let PersistentStateOptions {
            is_enabled,
            default_value,
            persistence_key_prefix: prefix,
            persist_to,
        } = options;

        let backend = match persist_to {
            PersistMode::State => Backend::State(StateCell::new(default_value.clone())),
            PersistMode::UrlParams {
                keys,
                serialize,
                deserialize,
            } => Backend::UrlParams {
                params: cx.url_params().clone(),
                keys,
                prefix,
                serialize,
                deserialize,
            },
            PersistMode::Storage { target, key } => Backend::Storage {
                area: target,
                storage: Arc::clone(cx.storage(target)),
                key: prefixed_key(prefix.as_ref(), &key),
            },
        };

        Self {
            is_enabled,
            default_value,
            backend,
        }
    }

    /// Returns the current value.
    pub fn get(&self) -> T {
        if !self.is_enabled {
            return self.default_value.clone();
        }

        match &self.backend {
            Backend::State(cell) => cell.get(),
            Backend::UrlParams {
                params,
                keys,
                prefix,
                deserialize,
                ..
            } => {
                let values: UrlParamValues = keys
                    .iter()
                    .map(|key| {
                        let value = params
                            .get(&prefixed_key(prefix.as_ref(), key))
                            .filter(|v| !v.is_empty());
                        (key.clone(), value)
                    })
                    .collect();

                if values.values().all(Option::is_none) {
                    return self.default_value.clone();
                }

                deserialize(&values).unwrap_or_else(|| {
                    log::debug!(
                        "persistent state: unreadable url params {values:?}, using default"
                    );
                    self.default_value.clone()
                })
            }
            Backend::Storage { storage, key, .. } => match storage.get_item(key) {
                Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                    log::debug!("persistent state: invalid JSON under {key}: {e}, using default");
                    self.default_value.clone()
                }),
                None => self.default_value.clone(),
            },
        }
    }

    /// Replaces the value. A no-op when the cell is disabled.
    pub fn set(&self, value: T) {
        if !self.is_enabled {
            log::trace!("persistent state: ignoring write to disabled state");
            return;
        }

        match &self.backend {
            Backend::State(cell) => cell.set(value),
            Backend::UrlParams {
                params,
                prefix,
                serialize,
                ..
            } => {
                let values = serialize(&value);
                params.set_many(
                    values
                        .into_iter()
                        .map(|(key, value)| (prefixed_key(prefix.as_ref(), &key), value)),
                );
            }
            Backend::Storage { storage, key, .. } => match serde_json::to_string(&value) {
                Ok(json) => storage.set_item(key, &json),
                Err(e) => log::warn!("persistent state: failed to serialize value for {key}: {e}"),
            },
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.is_enabled
    }
}

impl<T> PersistentState<T> {
    /// Where this cell keeps its value.
    pub fn target(&self) -> PersistTarget {
        match &self.backend {
            Backend::State(_) => PersistTarget::State,
            Backend::UrlParams { .. } => PersistTarget::UrlParams,
            Backend::Storage {
                area: StorageArea::Local,
                ..
            } => PersistTarget::LocalStorage,
            Backend::Storage {
                area: StorageArea::Session,
                ..
            } => PersistTarget::SessionStorage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_mode() -> PersistMode<u32> {
        PersistMode::url_params(
            ["page"],
            |page: &u32| UrlParamValues::from([("page".to_string(), Some(page.to_string()))]),
            |values: &UrlParamValues| values.get("page")?.as_ref()?.parse().ok(),
        )
    }

    #[test]
    fn test_disabled_state_ignores_writes() {
        let cx = PersistenceContext::new();
        let state = PersistentState::new(PersistentStateOptions::new(5u32).enabled(false), &cx);
        state.set(9);
        assert_eq!(state.get(), 5);
        assert!(!state.is_enabled());
    }

    #[test]
    fn test_url_params_round_trip_with_prefix() {
        let cx = PersistenceContext::new();
        let prefix = PersistenceKeyPrefix::new("t1").unwrap();
        let state = PersistentState::new(
            PersistentStateOptions::new(1u32)
                .with_prefix(Some(prefix))
                .with_persist_to(page_mode()),
            &cx,
        );

        assert_eq!(state.get(), 1);
        state.set(3);
        assert_eq!(cx.url_params().get("t1:page").as_deref(), Some("3"));
        assert!(cx.url_params().get("page").is_none());
        assert_eq!(state.get(), 3);
    }

    #[test]
    fn test_url_params_empty_or_malformed_reads_default() {
        let cx = PersistenceContext::new();
        let options = PersistentStateOptions::new(1u32).with_persist_to(page_mode());
        let state = PersistentState::new(options, &cx);

        cx.url_params().navigate("http://localhost/?page=").unwrap();
        assert_eq!(state.get(), 1);

        cx.url_params().navigate("http://localhost/?page=abc").unwrap();
        assert_eq!(state.get(), 1);
    }

    #[test]
    fn test_storage_bad_json_reads_default() {
        let cx = PersistenceContext::new();
        let state = PersistentState::new(
            PersistentStateOptions::new(vec!["a".to_string()])
                .with_persist_to(PersistMode::storage(StorageArea::Session, "things")),
            &cx,
        );

        cx.storage(StorageArea::Session).set_item("things", "{not json");
        assert_eq!(state.get(), vec!["a".to_string()]);

        state.set(vec!["b".to_string()]);
        assert_eq!(
            cx.storage(StorageArea::Session).get_item("things").as_deref(),
            Some(r#"["b"]"#)
        );
        assert_eq!(state.get(), vec!["b".to_string()]);
    }

    #[test]
    fn test_ephemeral_state_is_per_instance() {
        let cx = PersistenceContext::new();
        let first = PersistentState::new(PersistentStateOptions::new(0u32), &cx);
        let second = PersistentState::new(PersistentStateOptions::new(0u32), &cx);
        first.set(7);
        assert_eq!(first.clone().get(), 7);
        assert_eq!(second.get(), 0);
    }

    #[test]
    fn test_for_target_builds_storage_modes() {
        let mode: PersistMode<u32> =
            PersistMode::for_target(PersistTarget::LocalStorage, "pagination", page_mode);
        match mode {
            PersistMode::Storage { target, key } => {
                assert_eq!(target, StorageArea::Local);
                assert_eq!(key, "pagination");
            }
            other => panic!("unexpected mode: {other:?}"),
        }
    }
}
