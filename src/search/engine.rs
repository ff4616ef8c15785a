//! Core search engine implementation
use crate::config::{Preset, SearchConfig, SearchOptions};
use crate::metrics::Metrics;
use crate::record::Searchable;
use crate::search::cache::{CacheKey, CacheStats, ResultCache};
use crate::search::debounce::Debouncer;
use crate::search::history::SearchHistory;
use crate::search::scoring::{score_item, tokenize};
use crate::search::suggest::suggestions;
use crate::search::{MatchResult, SearchResponse};
use log::{debug, warn};
use parking_lot::Mutex;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::oneshot;

/// Collections at least this large are scored on the rayon pool.
const PARALLEL_THRESHOLD: usize = 2048;

struct Shared<T> {
    config: SearchConfig,
    cache: Mutex<ResultCache<SearchResponse<T>>>,
    history: Mutex<SearchHistory>,
    debouncer: Debouncer,
    metrics: Metrics,
}

/// Fuzzy ranking search engine.
///
/// Owns its configuration, result cache, query history and debouncer. The
/// handle is cheap to clone; clones share all state, so one engine can back
/// several widgets.
pub struct SearchEngine<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for SearchEngine<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

/// Handle to a debounced search. Resolves to `None` if a newer search
/// superseded it.
pub struct PendingSearch<T> {
    receiver: oneshot::Receiver<SearchResponse<T>>,
}

impl<T> PendingSearch<T> {
    pub async fn wait(self) -> Option<SearchResponse<T>> {
        self.receiver.await.ok()
    }
}

/// Create operations.
impl<T> SearchEngine<T>
where
    T: Searchable + Clone + Send + Sync,
{
    pub fn new(config: SearchConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                config: config.sanitized(),
                cache: Mutex::new(ResultCache::new()),
                history: Mutex::new(SearchHistory::new()),
                debouncer: Debouncer::new(),
                metrics: Metrics::new(),
            }),
        }
    }

    pub fn with_preset(preset: Preset) -> Self {
        Self::new(SearchConfig::preset(preset))
    }

    pub fn config(&self) -> &SearchConfig {
        &self.shared.config
    }

    pub fn metrics(&self) -> &Metrics {
        &self.shared.metrics
    }
}

/// Search operations.
impl<T> SearchEngine<T>
where
    T: Searchable + Clone + Send + Sync,
{
    /// Runs a search immediately. History is left untouched.
    pub fn instant_search(
        &self,
        query: &str,
        items: &[T],
        options: &SearchOptions,
    ) -> SearchResponse<T> {
        self.perform_search(query, items, options)
    }

    fn perform_search(&self, query: &str, items: &[T], options: &SearchOptions) -> SearchResponse<T> {
        let started = Instant::now();
        let shared = &self.shared;
        shared.metrics.searches.inc();
        let config = shared.config.merged(options);

        let trimmed = query.trim();
        if trimmed.is_empty() {
            let results = items
                .iter()
                .take(config.max_results)
                .map(|item| MatchResult {
                    item: item.clone(),
                    score: 1.0,
                    matched_fields: Vec::new(),
                    highlights: BTreeMap::new(),
                })
                .collect();
            return SearchResponse {
                results,
                total_count: items.len(),
                search_time: started.elapsed(),
                query: query.to_string(),
                suggestions: Vec::new(),
            };
        }

        let key = CacheKey::new(trimmed, &config.cache_fingerprint());
        let cached = shared.cache.lock().get(&key);
        if let Some(mut response) = cached {
            shared.metrics.cache_hits.inc();
            debug!("Cache hit for {trimmed:?}");
            response.search_time = started.elapsed();
            response.query = query.to_string();
            return response;
        }
        shared.metrics.cache_misses.inc();

        let tokens = tokenize(trimmed, config.case_sensitive);
        let metrics = &shared.metrics;
        let scored: Vec<Option<MatchResult<T>>> = if items.len() >= PARALLEL_THRESHOLD {
            items
                .par_iter()
                .map(|item| score_or_skip(item, &tokens, &config, metrics))
                .collect()
        } else {
            items
                .iter()
                .map(|item| score_or_skip(item, &tokens, &config, metrics))
                .collect()
        };
        metrics.items_scored.inc_by(items.len() as u64);

        let mut results: Vec<MatchResult<T>> = scored.into_iter().flatten().collect();
        // Stable: equal scores keep input order.
        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        let total_count = results.len();
        results.truncate(config.max_results);

        let suggestions = suggestions(trimmed, &shared.history.lock(), items);

        let response = SearchResponse {
            results,
            total_count,
            search_time: started.elapsed(),
            query: query.to_string(),
            suggestions,
        };
        debug!(
            "Scored {} records for {trimmed:?}: {total_count} matched in {:?}",
            items.len(),
            response.search_time
        );

        shared.cache.lock().insert(key, response.clone());
        response
    }
}

fn score_or_skip<T>(
    item: &T,
    tokens: &[String],
    config: &SearchConfig,
    metrics: &Metrics,
) -> Option<MatchResult<T>>
where
    T: Searchable + Clone,
{
    match score_item(item, tokens, config) {
        Ok(result) => result,
        Err(e) => {
            debug!("Treating record {:?} as non-matching: {e}", item.record_id());
            metrics.item_failures.inc();
            None
        }
    }
}

/// Debounced operations.
impl<T> SearchEngine<T>
where
    T: Searchable + Clone + Send + Sync + 'static,
{
    /// Schedules a search after the debounce window (`options.debounce_ms`,
    /// else the configured default). A later call made before the window
    /// elapses cancels this one, whose handle then resolves to `None`; once
    /// the window has passed the search runs to completion. Completed
    /// non-blank queries are recorded in history.
    ///
    /// Must be called from within a tokio runtime.
    pub fn search(
        &self,
        query: impl Into<String>,
        items: Vec<T>,
        options: SearchOptions,
    ) -> PendingSearch<T> {
        let query = query.into();
        let delay = Duration::from_millis(
            options
                .debounce_ms
                .unwrap_or(self.shared.config.debounce_ms),
        );
        let (tx, receiver) = oneshot::channel();
        let engine = self.clone();

        let superseded = self.shared.debouncer.schedule(delay, async move {
            let worker = engine.clone();
            let worker_query = query.clone();
            let computed = tokio::task::spawn_blocking(move || {
                worker.perform_search(&worker_query, &items, &options)
            })
            .await;

            match computed {
                Ok(response) => {
                    engine.shared.history.lock().record(&query);
                    let _ = tx.send(response);
                }
                Err(e) => warn!("Debounced search for {query:?} failed: {e}"),
            }
        });

        if superseded {
            debug!("Superseded pending debounced search");
            self.shared.metrics.debounce_superseded.inc();
        }

        PendingSearch { receiver }
    }

    /// Cancels the debounced search still waiting out its window, if any.
    pub fn cancel_pending(&self) -> bool {
        self.shared.debouncer.cancel()
    }
}

/// State operations.
impl<T> SearchEngine<T> {
    /// Most recent first.
    pub fn search_history(&self) -> Vec<String> {
        self.shared.history.lock().entries()
    }

    pub fn clear_history(&self) {
        self.shared.history.lock().clear();
    }

    pub fn clear_cache(&self) {
        self.shared.cache.lock().clear();
    }

    pub fn cache_stats(&self) -> CacheStats {
        let size = self.shared.cache.lock().len();
        CacheStats {
            size,
            entries: size,
            hit_rate: self.shared.metrics.hit_rate(),
        }
    }
}
