//! Live search over a level's candidates
//!
//! Case-insensitive substring match, alphabetical order, capped result count.

use crate::models::LocationNode;
use std::cmp::Ordering;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Rows shown for any filtered list.
pub const DEFAULT_RESULT_CAP: usize = 100;

/// Lowercased, trimmed query; `None` when blank.
pub fn normalize_query(query: &str) -> Option<String> {
    let normalized = query.to_lowercase().trim().to_string();
    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

/// Sort key approximating locale collation: accents folded, case ignored.
pub fn collation_key(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Collation key, then the raw name so the order is total.
pub fn name_sort_key(name: &str) -> (String, String) {
    (collation_key(name), name.to_string())
}

/// The order [`filter_and_rank`] sorts by.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    name_sort_key(a).cmp(&name_sort_key(b))
}

/// Whether `name` contains the already-normalized query.
pub fn name_matches(name: &str, normalized_query: &str) -> bool {
    name.to_lowercase().contains(normalized_query)
}

/// Narrow `list` by `query`, sort by name and keep at most `cap` rows.
///
/// A blank query keeps every row. Pure: the input is not touched.
pub fn filter_and_rank<T: LocationNode>(list: &[T], query: &str, cap: usize) -> Vec<T> {
    let mut hits: Vec<T> = match normalize_query(query) {
        None => list.to_vec(),
        Some(q) => list
            .iter()
            .filter(|node| name_matches(node.name(), &q))
            .cloned()
            .collect(),
    };
    hits.sort_by_cached_key(|node| name_sort_key(node.name()));
    hits.truncate(cap);
    hits
}
