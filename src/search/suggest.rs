//! Query suggestions from history and record values
use crate::record::Searchable;
use crate::search::history::SearchHistory;

pub const MAX_SUGGESTIONS: usize = 5;
pub const MAX_HISTORY_SUGGESTIONS: usize = 3;
/// Only this many leading records are scanned for value suggestions.
pub const SUGGESTION_SCAN_LIMIT: usize = 20;
pub const SUGGESTION_FIELDS: &[&str] = &["title", "name", "description", "category"];

/// Up to [`MAX_SUGGESTIONS`] strings: matching history entries first, then
/// field values of the first records that contain the query. Matching is
/// case-insensitive and values equal to the query are skipped.
pub fn suggestions<T: Searchable>(query: &str, history: &SearchHistory, items: &[T]) -> Vec<String> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut out: Vec<String> = history
        .matching(&needle, MAX_HISTORY_SUGGESTIONS)
        .map(str::to_string)
        .collect();

    'items: for item in items.iter().take(SUGGESTION_SCAN_LIMIT) {
        for field in SUGGESTION_FIELDS {
            if out.len() >= MAX_SUGGESTIONS {
                break 'items;
            }
            let Some(value) = item.field_value(field) else {
                continue;
            };
            let lowered = value.to_lowercase();
            if lowered == needle || !lowered.contains(&needle) || out.contains(&value) {
                continue;
            }
            out.push(value);
        }
    }

    out.truncate(MAX_SUGGESTIONS);
    out
}
