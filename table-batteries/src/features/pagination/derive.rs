//! Client-side pagination

use super::ActivePagination;

/// Returns the items on the current page.
pub fn paginate_items<T: Clone>(items: &[&T], pagination: ActivePagination) -> Vec<T> {
    let pagination = pagination.clamped();
    let start = (pagination.page_number - 1).saturating_mul(pagination.items_per_page);
    items
        .iter()
        .copied()
        .skip(start)
        .take(pagination.items_per_page)
        .cloned()
        .collect()
}

/// The last page holding `total_item_count` items; at least 1.
pub fn last_page_number(total_item_count: usize, items_per_page: usize) -> usize {
    total_item_count.div_ceil(items_per_page.max(1)).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slices_pages() {
        let values: Vec<u32> = (1..=7).collect();
        let refs: Vec<&u32> = values.iter().collect();
        assert_eq!(paginate_items(&refs, ActivePagination::new(1, 3)), vec![1, 2, 3]);
        assert_eq!(paginate_items(&refs, ActivePagination::new(3, 3)), vec![7]);
        assert!(paginate_items(&refs, ActivePagination::new(4, 3)).is_empty());
    }

    #[test]
    fn test_pages_partition_items() {
        let values: Vec<u32> = (1..=23).collect();
        let refs: Vec<&u32> = values.iter().collect();
        let per_page = 5;
        let pages = last_page_number(values.len(), per_page);
        let joined: Vec<u32> = (1..=pages)
            .flat_map(|page| paginate_items(&refs, ActivePagination::new(page, per_page)))
            .collect();
        assert_eq!(joined, values);
    }

    #[test]
    fn test_last_page_number() {
        assert_eq!(last_page_number(25, 10), 3);
        assert_eq!(last_page_number(30, 10), 3);
        assert_eq!(last_page_number(0, 10), 1);
        assert_eq!(last_page_number(5, 0), 5);
    }
}
