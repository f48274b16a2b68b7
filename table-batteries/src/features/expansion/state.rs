//! Expansion state

use std::collections::BTreeMap;

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

const EXPANDED_CELLS_KEY: &str = "expandedCells";

/// What is expanded for one item.
///
/// Serialized untagged: `true` for an expanded row, or the key of the
/// expanded column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExpandedCell {
    Row(bool),
    Cell(ColumnKey),
}

/// Expanded rows and cells keyed by item id (string form).
pub type ExpandedCells = BTreeMap<String, ExpandedCell>;

/// Whether rows expand as a whole or per cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExpandableVariant {
    /// One toggle per row, in its own leading column.
    #[default]
    Single,
    /// Toggles on individual data cells.
    Compound,
}

/// Expansion feature configuration.
#[derive(Debug, Clone, Default)]
pub struct ExpansionArgs {
    pub variant: ExpandableVariant,
    pub persist_to: Option<PersistTarget>,
}

impl ExpansionArgs {
    pub fn new(variant: ExpandableVariant) -> Self {
        Self {
            variant,
            persist_to: None,
        }
    }

    pub fn with_persist_to(mut self, target: PersistTarget) -> Self {
        self.persist_to = Some(target);
        self
    }
}

fn serialize_expansion_url_params(cells: &ExpandedCells) -> UrlParamValues {
    let param = if cells.is_empty() {
        None
    } else {
        serde_json::to_string(cells).ok()
    };
    UrlParamValues::from([(EXPANDED_CELLS_KEY.to_string(), param)])
}

fn deserialize_expansion_url_params(params: &UrlParamValues) -> Option<ExpandedCells> {
    let raw = params.get(EXPANDED_CELLS_KEY)?.as_deref()?;
    serde_json::from_str(raw)
        .inspect_err(|e| {
            log::debug!("expansion state: ignoring malformed expandedCells param: {e}")
        })
        .ok()
}

/// Source of truth for the expansion feature.
#[derive(Debug, Clone)]
pub struct ExpansionState {
    expanded_cells: PersistentState<ExpandedCells>,
    variant: Option<ExpandableVariant>,
}

impl ExpansionState {
    pub fn new(
        args: Option<&ExpansionArgs>,
        target: PersistTarget,
        prefix: Option<&PersistenceKeyPrefix>,
        cx: &PersistenceContext,
    ) -> Self {
        let persist_to = PersistMode::for_target(target, EXPANDED_CELLS_KEY, || {
            PersistMode::url_params(
                [EXPANDED_CELLS_KEY],
                serialize_expansion_url_params,
                deserialize_expansion_url_params,
            )
        });

        let options = PersistentStateOptions::new(ExpandedCells::new())
            .enabled(args.is_some())
            .with_prefix(prefix.cloned())
            .with_persist_to(persist_to);

        Self {
            expanded_cells: PersistentState::new(options, cx),
            variant: args.map(|args| args.variant),
        }
    }

    pub fn expanded_cells(&self) -> ExpandedCells {
        self.expanded_cells.get()
    }

    pub fn set_expanded_cells(&self, cells: ExpandedCells) {
        log::trace!("expansion state: {} expanded", cells.len());
        self.expanded_cells.set(cells);
    }

    /// The configured variant; `None` when expansion is disabled.
    pub fn variant(&self) -> Option<ExpandableVariant> {
        self.variant
    }

    pub fn is_enabled(&self) -> bool {
        self.expanded_cells.is_enabled()
    }

    pub fn persist_target(&self) -> PersistTarget {
        self.expanded_cells.target()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cells_json_shape() {
        let cells = ExpandedCells::from([
            ("1".to_string(), ExpandedCell::Row(true)),
            ("abc".to_string(), ExpandedCell::Cell(ColumnKey::from("name"))),
        ]);
        let json = serde_json::to_string(&cells).unwrap();
        assert_eq!(json, r#"{"1":true,"abc":"name"}"#);
        let back: ExpandedCells = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cells);
    }

    #[test]
    fn test_url_params() {
        let cx = PersistenceContext::new();
        let args = ExpansionArgs::new(ExpandableVariant::Compound);
        let state = ExpansionState::new(Some(&args), PersistTarget::UrlParams, None, &cx);
        assert_eq!(state.variant(), Some(ExpandableVariant::Compound));

        state.set_expanded_cells(ExpandedCells::from([(
            "7".to_string(),
            ExpandedCell::Cell(ColumnKey::from("details")),
        )]));
        assert_eq!(
            cx.url_params().get("expandedCells").as_deref(),
            Some(r#"{"7":"details"}"#)
        );

        state.set_expanded_cells(ExpandedCells::new());
        assert!(cx.url_params().get("expandedCells").is_none());

        cx.url_params().navigate("http://localhost/?expandedCells=%5B1").unwrap();
        assert!(state.expanded_cells().is_empty());
    }

    #[test]
    fn test_disabled() {
        let cx = PersistenceContext::new();
        let state = ExpansionState::new(None, PersistTarget::State, None, &cx);
        state.set_expanded_cells(ExpandedCells::from([("1".to_string(), ExpandedCell::Row(true))]));
        assert!(state.expanded_cells().is_empty());
        assert_eq!(state.variant(), None);
    }
}
