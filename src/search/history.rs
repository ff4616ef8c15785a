//! Recent query log
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// Most-recent-first list of distinct queries.
///
/// Recording a query that is already present is a no-op: it is neither
/// duplicated nor moved to the front.
#[derive(Debug, Clone)]
pub struct SearchHistory {
    entries: Vec<String>,
    capacity: usize,
}

impl SearchHistory {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Returns true when the query was inserted.
    pub fn record(&mut self, query: &str) -> bool {
        let query = query.trim();
        if query.is_empty() || self.entries.iter().any(|e| e == query) {
            return false;
        }
        self.entries.insert(0, query.to_string());
        self.entries.truncate(self.capacity);
        true
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.clone()
    }

    /// Entries containing `query` case-insensitively, excluding the query itself.
    pub fn matching(&self, query: &str, limit: usize) -> impl Iterator<Item = &str> + '_ {
        let needle = query.trim().to_lowercase();
        self.entries
            .iter()
            .filter(move |entry| {
                let lowered = entry.to_lowercase();
                lowered != needle && lowered.contains(&needle)
            })
            .map(String::as_str)
            .take(limit)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for SearchHistory {
    fn default() -> Self {
        Self::new()
    }
}
