use prometheus::{Encoder, IntCounter, Opts, Registry, TextEncoder};
use std::sync::Arc;

/// Per-engine counters. Each engine owns its own registry.
#[derive(Clone)]
pub struct Metrics {
    pub searches: IntCounter,
    pub cache_hits: IntCounter,
    pub cache_misses: IntCounter,
    pub items_scored: IntCounter,
    pub item_failures: IntCounter,
    pub debounce_superseded: IntCounter,
    registry: Arc<Registry>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

fn counter(registry: &Registry, name: &str, help: &str) -> IntCounter {
    // Only fails on invalid metric names, which are constants here.
    let counter = IntCounter::with_opts(Opts::new(name, help))
        .expect("metric names are valid identifiers");
    registry.register(Box::new(counter.clone())).ok();
    counter
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();
        Metrics {
            searches: counter(&registry, "searches_total", "Number of searches executed"),
            cache_hits: counter(&registry, "cache_hits", "Searches answered from the cache"),
            cache_misses: counter(&registry, "cache_misses", "Searches that had to be scored"),
            items_scored: counter(&registry, "items_scored", "Records scored"),
            item_failures: counter(
                &registry,
                "item_failures",
                "Records treated as non-matching after a scoring failure",
            ),
            debounce_superseded: counter(
                &registry,
                "debounce_superseded",
                "Debounced searches cancelled by a newer call",
            ),
            registry: Arc::new(registry),
        }
    }

    /// Cache hits over cache lookups; 0 before the first lookup.
    pub fn hit_rate(&self) -> f64 {
        let hits = self.cache_hits.get();
        let lookups = hits + self.cache_misses.get();
        if lookups == 0 {
            0.0
        } else {
            hits as f64 / lookups as f64
        }
    }

    pub fn gather(&self) -> String {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        let encoder = TextEncoder::new();
        if encoder.encode(&metric_families, &mut buffer).is_err() {
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}
