//! Selection reconciliation

use std::collections::HashMap;

use crate::types::ItemId;

/// Returns the selection without items that are no longer selectable.
///
/// Only selected ids whose items are known can be checked; unknown ids are
/// kept. `None` means the selection is already valid.
pub fn unselectable_selection_correction<T>(
    selected_item_ids: &[ItemId],
    items: &HashMap<ItemId, T>,
    is_item_selectable: impl Fn(&T) -> bool,
) -> Option<Vec<ItemId>> {
    let retained: Vec<ItemId> = selected_item_ids
        .iter()
        .filter(|id| items.get(*id).is_none_or(&is_item_selectable))
        .cloned()
        .collect();

    (retained.len() != selected_item_ids.len()).then_some(retained)
}
