//! Helpers shared by the deployer's reconcilers

pub mod metadata;
pub mod resources;

pub use metadata::{add_annotation, add_label, remove_label, ObjectMetadata};
pub use resources::{get_resource_requirements, ResourceRequirementsTable};

/// Checks whether a string is contained within a slice
pub fn contains<S: AsRef<str>>(items: &[S], s: &str) -> bool {
    items.iter().any(|item| item.as_ref() == s)
}

/// Returns the items of a slice, in order, without any occurrence of `s`
pub fn remove<S: AsRef<str>>(items: &[S], s: &str) -> Vec<String> {
    items
        .iter()
        .map(AsRef::as_ref)
        .filter(|item| *item != s)
        .map(String::from)
        .collect()
}

pub fn map_items<T, U>(items: &[T], transform: impl FnMut(&T) -> U) -> Vec<U> {
    items.iter().map(transform).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn contains_is_exact() {
        let items = list(&["finalizer.a", "finalizer.b"]);
        assert!(contains(&items, "finalizer.a"));
        assert!(!contains(&items, "Finalizer.a"));
        assert!(!contains(&items, "finalizer"));
        assert!(!contains::<String>(&[], "finalizer.a"));
    }

    #[test]
    fn remove_drops_every_occurrence_and_keeps_order() {
        let items = list(&["a", "b", "a", "c"]);
        assert_eq!(remove(&items, "a"), list(&["b", "c"]));
        assert!(!contains(&remove(&items, "a"), "a"));
    }

    #[test]
    fn remove_missing_item_is_identity() {
        let cases = [list(&[]), list(&["x"]), list(&["x", "y", "x", "z"])];
        for items in cases {
            assert_eq!(remove(&items, "missing"), items);
            for item in &items {
                assert!(!contains(&remove(&items, item), item));
            }
        }
    }

    #[test]
    fn remove_everything_is_empty() {
        assert!(remove(&["a", "a"], "a").is_empty());
        assert!(remove::<&str>(&[], "a").is_empty());
    }

    #[test]
    fn map_items_preserves_order_and_length() {
        let items = list(&["a", "b", "c"]);
        assert_eq!(map_items(&items, |s| s.clone()), items);
        assert_eq!(
            map_items(&items, |s| format!("{s}-suffix")),
            list(&["a-suffix", "b-suffix", "c-suffix"])
        );
        assert_eq!(items, list(&["a", "b", "c"]));
        assert_eq!(map_items(&[1, 2, 3], |n| n * 2), vec![2, 4, 6]);
    }
}
