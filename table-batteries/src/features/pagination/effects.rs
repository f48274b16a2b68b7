//! Pagination bounds reconciliation

use super::ActivePagination;
use super::last_page_number;

/// Returns the page to move to when the current page no longer exists.
///
/// Nothing is corrected while data is loading, since the total item count is
/// not settled yet.
pub fn pagination_bounds_correction(
    pagination: ActivePagination,
    total_item_count: usize,
    is_loading: bool,
) -> Option<usize> {
    if is_loading {
        return None;
    }

    let last_page = last_page_number(total_item_count, pagination.items_per_page);
    (pagination.page_number > last_page).then_some(last_page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snaps_to_last_page() {
        assert_eq!(
            pagination_bounds_correction(ActivePagination::new(5, 10), 25, false),
            Some(3)
        );
        assert_eq!(
            pagination_bounds_correction(ActivePagination::new(2, 10), 0, false),
            Some(1)
        );
    }

    #[test]
    fn test_valid_page_is_untouched() {
        assert_eq!(pagination_bounds_correction(ActivePagination::new(3, 10), 25, false), None);
        assert_eq!(pagination_bounds_correction(ActivePagination::new(1, 10), 0, false), None);
    }

    #[test]
    fn test_waits_for_loading() {
        assert_eq!(pagination_bounds_correction(ActivePagination::new(5, 10), 25, true), None);
    }
}
