//! In-process fuzzy ranking search over in-memory records.
//!
//! A [`SearchEngine`] scores every record against a free-text query across a
//! set of dotted field paths (exact, prefix, substring and edit-distance
//! matches), returns the ranked, highlighted results and keeps a bounded
//! result cache, a query history and suggestions.
//!
//! ```
//! use fuzzrank::{SearchConfig, SearchEngine, SearchOptions};
//! use serde_json::json;
//!
//! let engine = SearchEngine::new(SearchConfig {
//!     search_fields: vec!["name".to_string()],
//!     ..Default::default()
//! });
//! let items = vec![
//!     json!({ "id": "1", "name": "Acme Corp" }),
//!     json!({ "id": "2", "name": "Acme" }),
//! ];
//! let response = engine.instant_search("acme", &items, &SearchOptions::default());
//! assert_eq!(response.results[0].item["id"], "2");
//! ```
pub mod cli;
pub mod config;
pub mod error;
pub mod metrics;
pub mod output_formats;
pub mod record;
pub mod search;

pub use crate::config::{FileConfig, Preset, SearchConfig, SearchOptions};
pub use crate::error::{FuzzrankError, Result};
pub use crate::record::{load_records, Searchable};
pub use crate::search::cache::CacheStats;
pub use crate::search::{MatchResult, PendingSearch, SearchEngine, SearchResponse};
pub use clap::Parser;
pub use cli::{Cli, Commands};
