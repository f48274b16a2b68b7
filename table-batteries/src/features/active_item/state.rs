//! Active item state

use crate::persistence::PersistMode;
use crate::persistence::PersistenceContext;
use crate::persistence::PersistentState;
use crate::persistence::PersistentStateOptions;
use crate::persistence::UrlParamValues;
use crate::types::ItemId;
use crate::types::PersistTarget;
use crate::types::PersistenceKeyPrefix;

const ACTIVE_ITEM_KEY: &str = "activeItem";

/// Active item feature configuration.
#[derive(Debug, Clone, Default)]
pub struct ActiveItemArgs {
    pub persist_to: Option<PersistTarget>,
}

impl ActiveItemArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_persist_to(mut self, target: PersistTarget) -> Self {
        self.persist_to = Some(target);
        self
    }
}

fn serialize_active_item_url_params(id: &Option<ItemId>) -> UrlParamValues {
    UrlParamValues::from([(ACTIVE_ITEM_KEY.to_string(), id.as_ref().map(ItemId::to_string))])
}

fn deserialize_active_item_url_params(params: &UrlParamValues) -> Option<Option<ItemId>> {
    let raw = params.get(ACTIVE_ITEM_KEY)?.as_deref()?;
    Some(Some(ItemId::parse_maybe_numeric(raw)))
}

/// Source of truth for the active item feature.
#[derive(Debug, Clone)]
pub struct ActiveItemState {
    active_item_id: PersistentState<Option<ItemId>>,
}

impl ActiveItemState {
    pub fn new(
        args: Option<&ActiveItemArgs>,
        target: PersistTarget,
        prefix: Option<&PersistenceKeyPrefix>,
        cx: &PersistenceContext,
    ) -> Self {
        let persist_to = PersistMode::for_target(target, ACTIVE_ITEM_KEY, || {
            PersistMode::url_params(
                [ACTIVE_ITEM_KEY],
                serialize_active_item_url_params,
                deserialize_active_item_url_params,
            )
        });

        let options = PersistentStateOptions::new(None)
            .enabled(args.is_some())
            .with_prefix(prefix.cloned())
            .with_persist_to(persist_to);

        Self {
            active_item_id: PersistentState::new(options, cx),
        }
    }

    pub fn active_item_id(&self) -> Option<ItemId> {
        self.active_item_id.get()
    }

    pub fn set_active_item_id(&self, id: Option<ItemId>) {
        log::trace!("active item state: {id:?}");
        self.active_item_id.set(id);
    }

    pub fn is_enabled(&self) -> bool {
        self.active_item_id.is_enabled()
    }

    pub fn persist_target(&self) -> PersistTarget {
        self.active_item_id.target()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_params_parse_numeric_ids() {
        let cx = PersistenceContext::new();
        let args = ActiveItemArgs::new();
        let state = ActiveItemState::new(Some(&args), PersistTarget::UrlParams, None, &cx);

        state.set_active_item_id(Some(ItemId::Num(7)));
        assert_eq!(cx.url_params().get("activeItem").as_deref(), Some("7"));
        assert_eq!(state.active_item_id(), Some(ItemId::Num(7)));

        state.set_active_item_id(Some(ItemId::from("abc")));
        assert_eq!(state.active_item_id(), Some(ItemId::from("abc")));

        state.set_active_item_id(None);
        assert!(cx.url_params().get("activeItem").is_none());
        assert_eq!(state.active_item_id(), None);
    }

    #[test]
    fn test_storage_round_trip() {
        let cx = PersistenceContext::new();
        let args = ActiveItemArgs::new();
        let state = ActiveItemState::new(Some(&args), PersistTarget::SessionStorage, None, &cx);
        state.set_active_item_id(Some(ItemId::from("x-1")));
        assert_eq!(
            cx.storage(crate::persistence::StorageArea::Session)
                .get_item("activeItem")
                .as_deref(),
            Some("\"x-1\"")
        );
        assert_eq!(state.active_item_id(), Some(ItemId::from("x-1")));
    }
}
