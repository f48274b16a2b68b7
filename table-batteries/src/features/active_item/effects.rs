//! Active item reconciliation

use crate::types::ItemId;

/// Whether the active item must be cleared because it left the current page.
///
/// Nothing is cleared while data is loading.
pub fn should_clear_active_item(
    active_item_id: Option<&ItemId>,
    is_active_item_on_page: bool,
    is_loading: bool,
) -> bool {
    !is_loading && active_item_id.is_some() && !is_active_item_on_page
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clears_when_missing() {
        let id = ItemId::Num(7);
        assert!(should_clear_active_item(Some(&id), false, false));
        assert!(!should_clear_active_item(Some(&id), false, true));
        assert!(!should_clear_active_item(Some(&id), true, false));
        assert!(!should_clear_active_item(None, false, false));
    }
}
