//! Fuzzy ranking search engine with caching, history and suggestions
pub mod algorithms;
pub mod cache;
pub mod debounce;
pub mod engine;
pub mod highlight;
pub mod history;
pub mod scoring;
pub mod suggest;

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::time::Duration;

pub use engine::{PendingSearch, SearchEngine};

/// A record that matched, with its aggregate score and per-field highlights.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult<T> {
    pub item: T,
    /// Aggregate score, always positive for returned results.
    pub score: f64,
    /// Matched field paths in scan order.
    pub matched_fields: Vec<String>,
    /// Field path to the value rendered with `<mark>` tags.
    pub highlights: BTreeMap<String, String>,
}

/// Ranked search output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResponse<T> {
    pub results: Vec<MatchResult<T>>,
    /// Matching records before truncation to `max_results`.
    pub total_count: usize,
    #[serde(rename = "search_time_ms", serialize_with = "serialize_millis")]
    pub search_time: Duration,
    pub query: String,
    pub suggestions: Vec<String>,
}

fn serialize_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64() * 1000.0)
}
