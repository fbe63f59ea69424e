//! Directory domain - category + free-text filtering for presentation.

pub mod filter;

pub use filter::{category_counts, category_options, filter, DirectoryEntry, ALL_CATEGORIES};
