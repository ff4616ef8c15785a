//! String matching primitives: edit distance, similarity and match classification
use crate::config::SearchConfig;

/// How a query token matched a field value, in priority order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchKind {
    Exact,
    Prefix,
    Substring,
    /// Similarity in `[threshold, 1]`.
    Fuzzy(f64),
}

impl MatchKind {
    /// Base score contribution of this match under the given boosts.
    pub fn contribution(&self, config: &SearchConfig) -> f64 {
        match self {
            MatchKind::Exact => config.exact_match_boost * 10.0,
            MatchKind::Prefix => config.partial_match_boost * 8.0,
            MatchKind::Substring => config.partial_match_boost * 5.0,
            MatchKind::Fuzzy(similarity) => similarity * 3.0,
        }
    }

    pub fn is_literal(&self) -> bool {
        !matches!(self, MatchKind::Fuzzy(_))
    }
}

/// Classifies `token` against `value`. Both must already be case-folded.
/// The first matching class wins.
pub fn classify(value: &str, token: &str, fuzzy_threshold: f64) -> Option<MatchKind> {
    if value == token {
        return Some(MatchKind::Exact);
    }
    if value.starts_with(token) {
        return Some(MatchKind::Prefix);
    }
    if value.contains(token) {
        return Some(MatchKind::Substring);
    }
    let score = similarity(value, token);
    if score >= fuzzy_threshold {
        Some(MatchKind::Fuzzy(score))
    } else {
        None
    }
}

/// Levenshtein distance over Unicode scalar values.
pub fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let s1_chars: Vec<char> = s1.chars().collect();
    let s2_chars: Vec<char> = s2.chars().collect();
    let s2_len = s2_chars.len();

    if s1_chars.is_empty() {
        return s2_len;
    }
    if s2_chars.is_empty() {
        return s1_chars.len();
    }

    let mut previous: Vec<usize> = (0..=s2_len).collect();
    let mut current = vec![0; s2_len + 1];

    for (i, c1) in s1_chars.iter().enumerate() {
        current[0] = i + 1;
        for (j, c2) in s2_chars.iter().enumerate() {
            let cost = if c1 == c2 { 0 } else { 1 };
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[s2_len]
}

/// `1 - distance / max_len`, defined as 1 when both strings are empty.
pub fn similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - levenshtein_distance(a, b) as f64 / max_len as f64
}
