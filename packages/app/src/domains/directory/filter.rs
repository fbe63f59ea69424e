//! Directory filtering - pure functions over catalog records.
//!
//! A record passes the filter when it matches the selected category
//! (`"All"` is the wildcard) AND, if a query is present, the query appears
//! case-insensitively in its name/title or description. Filtering always
//! preserves the catalog's original order and never mutates the input.

use std::collections::HashMap;

use crate::domains::catalog::{EventRecord, ResourceRecord};

/// The wildcard category selector: no category restriction.
pub const ALL_CATEGORIES: &str = "All";

/// A catalog record that can be filtered in the directory view.
pub trait DirectoryEntry {
    fn category(&self) -> &str;
    /// The primary display name matched by free-text search.
    fn name(&self) -> &str;
    fn description(&self) -> &str;
}

impl DirectoryEntry for ResourceRecord {
    fn category(&self) -> &str {
        &self.category
    }

    fn name(&self) -> &str {
        &self.title
    }

    fn description(&self) -> &str {
        &self.description
    }
}

impl DirectoryEntry for EventRecord {
    fn category(&self) -> &str {
        &self.category
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Compute the visible subset of a catalog for a category + free-text query.
///
/// Returns references in the catalog's original relative order. No matches
/// yields an empty vec (the caller renders an empty state; not an error).
pub fn filter<'a, T: DirectoryEntry>(
    catalog: &'a [T],
    category: &str,
    query: &str,
) -> Vec<&'a T> {
    let needle = query.to_lowercase();

    catalog
        .iter()
        .filter(|entry| category == ALL_CATEGORIES || entry.category() == category)
        .filter(|entry| {
            needle.is_empty()
                || entry.name().to_lowercase().contains(&needle)
                || entry.description().to_lowercase().contains(&needle)
        })
        .collect()
}

/// Count catalog entries per category selector.
///
/// Single-pass grouping over the catalog, then one lookup per requested
/// category. `"All"` maps to the full catalog length.
pub fn category_counts<T: DirectoryEntry>(
    catalog: &[T],
    categories: &[String],
) -> HashMap<String, usize> {
    let mut grouped: HashMap<&str, usize> = HashMap::new();
    for entry in catalog {
        *grouped.entry(entry.category()).or_insert(0) += 1;
    }

    categories
        .iter()
        .map(|category| {
            let count = if category == ALL_CATEGORIES {
                catalog.len()
            } else {
                grouped.get(category.as_str()).copied().unwrap_or(0)
            };
            (category.clone(), count)
        })
        .collect()
}

/// Category selector options for a catalog: `"All"` followed by distinct
/// categories in first-appearance order.
pub fn category_options<T: DirectoryEntry>(catalog: &[T]) -> Vec<String> {
    let mut options = vec![ALL_CATEGORIES.to_string()];
    for entry in catalog {
        if !options.iter().any(|c| c == entry.category()) {
            options.push(entry.category().to_string());
        }
    }
    options
}
