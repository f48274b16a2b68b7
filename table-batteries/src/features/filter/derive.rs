//! Client-side filtering

use super::FilterCategory;
use super::FilterLogicOperator;
use super::FilterValues;
use crate::types::TableItem;

/// Returns the items matching every constrained category.
///
/// An item matches a category when its value contains, case-insensitively,
/// any (`Or`) or all (`And`) of the category's filter values. An item with no
/// value (or an empty one) never matches a constrained category. Categories
/// missing from `categories` read the item through [`TableItem::field`] and
/// use `Or`.
pub fn filter_items<'a, T: TableItem>(
    items: &'a [T],
    categories: &[FilterCategory<T>],
    values: &FilterValues,
) -> Vec<&'a T> {
    items
        .iter()
        .filter(|item| item_matches(*item, categories, values))
        .collect()
}

fn item_matches<T: TableItem>(
    item: &T,
    categories: &[FilterCategory<T>],
    values: &FilterValues,
) -> bool {
    values.iter().all(|(key, filter_values)| {
        if filter_values.is_empty() {
            return true;
        }

        let category = categories.iter().find(|c| c.key == *key);
        let item_value = match category {
            Some(category) => category.item_value(item),
            None => item.field(key.as_str()),
        };
        let Some(item_value) = item_value.filter(|v| !v.is_empty()) else {
            return false;
        };

        let haystack = item_value.to_lowercase();
        let contains = |needle: &String| haystack.contains(&needle.to_lowercase());

        match category.map(|c| c.logic_operator).unwrap_or_default() {
            FilterLogicOperator::And => filter_values.iter().all(contains),
            FilterLogicOperator::Or => filter_values.iter().any(contains),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FilterCategoryKey;
    use crate::types::ItemId;

    #[derive(Debug, Clone, PartialEq)]
    struct Thing {
        id: i64,
        name: String,
        tags: String,
    }

    impl TableItem for Thing {
        fn item_id(&self) -> ItemId {
            ItemId::Num(self.id)
        }

        fn field(&self, key: &str) -> Option<String> {
            match key {
                "name" => Some(self.name.clone()),
                "tags" => Some(self.tags.clone()),
                _ => None,
            }
        }
    }

    fn things() -> Vec<Thing> {
        (1..=12)
            .map(|id| Thing {
                id,
                name: format!("Thing {id:02}"),
                tags: if id % 2 == 0 { "even blue".into() } else { "odd".into() },
            })
            .collect()
    }

    fn filter(key: &str, values: &[&str]) -> FilterValues {
        FilterValues::from([(
            FilterCategoryKey::from(key),
            values.iter().map(|v| v.to_string()).collect(),
        )])
    }

    fn ids(items: &[&Thing]) -> Vec<i64> {
        items.iter().map(|t| t.id).collect()
    }

    #[test]
    fn test_case_insensitive_substring() {
        let items = things();
        let result = filter_items(&items, &[], &filter("name", &["thing 1"]));
        assert_eq!(ids(&result), vec![10, 11, 12]);
    }

    #[test]
    fn test_or_matches_any_value() {
        let items = things();
        let result = filter_items(&items, &[], &filter("name", &["Thing 01", "Thing 1"]));
        assert_eq!(ids(&result), vec![1, 10, 11, 12]);
    }

    #[test]
    fn test_and_requires_every_value() {
        let items = things();
        let categories = vec![
            FilterCategory::new("tags", "Tags").with_logic_operator(FilterLogicOperator::And),
        ];
        let result = filter_items(&items, &categories, &filter("tags", &["even", "BLUE"]));
        assert_eq!(ids(&result), vec![2, 4, 6, 8, 10, 12]);
    }

    #[test]
    fn test_item_value_accessor_overrides_field() {
        let items = things();
        let categories = vec![
            FilterCategory::new("name", "Name").with_item_value(|t: &Thing| Some(t.id.to_string())),
        ];
        let result = filter_items(&items, &categories, &filter("name", &["2"]));
        assert_eq!(ids(&result), vec![2, 12]);
    }

    #[test]
    fn test_missing_value_fails_constrained_category() {
        let items = things();
        let result = filter_items(&items, &[], &filter("owner", &["x"]));
        assert!(result.is_empty());
    }

    #[test]
    fn test_empty_values_do_not_constrain() {
        let items = things();
        assert_eq!(filter_items(&items, &[], &filter("owner", &[])).len(), 12);
        assert_eq!(filter_items(&items, &[], &FilterValues::new()).len(), 12);
    }

    #[test]
    fn test_filtering_is_idempotent() {
        let items = things();
        let values = filter("name", &["1"]);
        let once: Vec<Thing> = filter_items(&items, &[], &values).into_iter().cloned().collect();
        let twice = filter_items(&once, &[], &values);
        assert_eq!(ids(&twice), once.iter().map(|t| t.id).collect::<Vec<_>>());
    }
}
