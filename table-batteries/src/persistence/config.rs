//! Table-level persistence configuration

use serde::Deserialize;
use serde::Serialize;

use crate::types::PersistTarget;
use crate::types::TableFeature;

/// Where a table persists its feature state.
///
/// Either one target for every feature, or per-feature targets with an
/// optional default. Reads from JSON as `"urlParams"` or
/// `{"default": "localStorage", "filter": "urlParams"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PersistTo {
    Single(PersistTarget),
    PerFeature(PerFeaturePersistTo),
}

impl PersistTo {
    /// Starts a per-feature configuration.
    pub fn per_feature() -> PerFeaturePersistTo {
        PerFeaturePersistTo::default()
    }

    /// Returns the target configured for `feature`, before the final
    /// fallback to [`PersistTarget::State`].
    pub fn target_for(&self, feature: TableFeature) -> Option<PersistTarget> {
        match self {
            Self::Single(target) => Some(*target),
            Self::PerFeature(targets) => targets.get(feature).or(targets.default),
        }
    }
}

impl Default for PersistTo {
    fn default() -> Self {
        Self::Single(PersistTarget::State)
    }
}

impl From<PersistTarget> for PersistTo {
    fn from(target: PersistTarget) -> Self {
        Self::Single(target)
    }
}

impl From<PerFeaturePersistTo> for PersistTo {
    fn from(targets: PerFeaturePersistTo) -> Self {
        Self::PerFeature(targets)
    }
}

/// Per-feature persistence targets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerFeaturePersistTo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<PersistTarget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<PersistTarget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<PersistTarget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PersistTarget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<PersistTarget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expansion: Option<PersistTarget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_item: Option<PersistTarget>,
}

impl PerFeaturePersistTo {
    /// Sets the target used by features without their own entry.
    pub fn with_default(mut self, target: PersistTarget) -> Self {
        self.default = Some(target);
        self
    }

    /// Sets the target for one feature.
    pub fn with(mut self, feature: TableFeature, target: PersistTarget) -> Self {
        *self.slot(feature) = Some(target);
        self
    }

    pub fn get(&self, feature: TableFeature) -> Option<PersistTarget> {
        match feature {
            TableFeature::Filter => self.filter,
            TableFeature::Sort => self.sort,
            TableFeature::Pagination => self.pagination,
            TableFeature::Selection => self.selection,
            TableFeature::Expansion => self.expansion,
            TableFeature::ActiveItem => self.active_item,
        }
    }

    fn slot(&mut self, feature: TableFeature) -> &mut Option<PersistTarget> {
        match feature {
            TableFeature::Filter => &mut self.filter,
            TableFeature::Sort => &mut self.sort,
            TableFeature::Pagination => &mut self.pagination,
            TableFeature::Selection => &mut self.selection,
            TableFeature::Expansion => &mut self.expansion,
            TableFeature::ActiveItem => &mut self.active_item,
        }
    }
}

/// Resolves where one feature's state lives.
///
/// The feature's own target wins, then the table's per-feature entry, then
/// the table default, then [`PersistTarget::State`]. Selection is always
/// ephemeral.
pub fn resolve_persist_target(
    feature: TableFeature,
    feature_target: Option<PersistTarget>,
    table: Option<&PersistTo>,
) -> PersistTarget {
    if feature == TableFeature::Selection {
        return PersistTarget::State;
    }

    feature_target
        .or_else(|| table.and_then(|persist_to| persist_to.target_for(feature)))
        .unwrap_or_default()
}
