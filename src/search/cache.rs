//! Bounded result cache with insertion-order eviction
use log::debug;
use lru::LruCache;
use serde::Serialize;
use std::num::NonZeroUsize;

pub const DEFAULT_CACHE_CAPACITY: usize = 100;

/// Cache key for search responses: the normalized query plus the
/// fingerprint of the effective configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(query: &str, config_fingerprint: &str) -> Self {
        CacheKey(format!(
            "{}\u{1f}{}",
            query.trim().to_lowercase(),
            config_fingerprint
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Result cache.
///
/// Backed by an `LruCache`, but reads go through `peek`, so recency is never
/// refreshed and the eviction victim is always the oldest inserted entry.
pub struct ResultCache<V> {
    entries: LruCache<CacheKey, V>,
}

impl<V> ResultCache<V> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
        }
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains(key)
    }

    /// Stores a value. At capacity, exactly one entry (the oldest inserted)
    /// is evicted.
    pub fn insert(&mut self, key: CacheKey, value: V) {
        if let Some((evicted, _)) = self.entries.push(key.clone(), value) {
            if evicted != key {
                debug!("Evicted cache entry {:?}", evicted.as_str());
            }
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }
}

impl<V: Clone> ResultCache<V> {
    /// Looks up without refreshing recency.
    pub fn get(&self, key: &CacheKey) -> Option<V> {
        self.entries.peek(key).cloned()
    }
}

impl<V> Default for ResultCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStats {
    pub size: usize,
    pub entries: usize,
    /// Hits over lookups since the engine was created; 0 before any lookup.
    pub hit_rate: f64,
}
