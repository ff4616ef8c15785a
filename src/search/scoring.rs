//! Tokenizing and multi-field scoring of a single record
use crate::config::SearchConfig;
use crate::record::Searchable;
use crate::search::algorithms::classify;
use crate::search::highlight::{highlight_spans, highlight_whole};
use crate::search::MatchResult;
use std::collections::BTreeMap;
use thiserror::Error;

/// Field-name fragments whose matches weigh more.
pub const IMPORTANT_FIELDS: &[&str] = &["name", "title"];
pub const IMPORTANT_FIELD_MULTIPLIER: f64 = 1.5;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoreError {
    #[error("non-finite score {score} in field '{field}'")]
    NonFiniteScore { field: String, score: f64 },
}

/// Splits on whitespace runs and case-folds unless `case_sensitive`.
pub fn tokenize(query: &str, case_sensitive: bool) -> Vec<String> {
    query
        .split_whitespace()
        .map(|token| {
            if case_sensitive {
                token.to_string()
            } else {
                token.to_lowercase()
            }
        })
        .collect()
}

pub fn is_important_field(field: &str) -> bool {
    let lowered = field.to_lowercase();
    IMPORTANT_FIELDS.iter().any(|f| lowered.contains(f))
}

/// Score contribution and highlight for one field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldScore {
    pub score: f64,
    pub highlight: String,
}

/// Scores one field value against every token. Returns `None` when nothing
/// contributed.
pub fn score_field(
    field: &str,
    raw: &str,
    tokens: &[String],
    config: &SearchConfig,
) -> Result<Option<FieldScore>, ScoreError> {
    let folded = if config.case_sensitive {
        raw.to_string()
    } else {
        raw.to_lowercase()
    };

    let mut score = 0.0;
    let mut literal_tokens: Vec<&str> = Vec::new();
    for token in tokens {
        if let Some(kind) = classify(&folded, token, config.fuzzy_threshold) {
            score += kind.contribution(config);
            if kind.is_literal() {
                literal_tokens.push(token);
            }
        }
    }

    if is_important_field(field) {
        score *= IMPORTANT_FIELD_MULTIPLIER;
    }

    if !score.is_finite() {
        return Err(ScoreError::NonFiniteScore {
            field: field.to_string(),
            score,
        });
    }
    if score <= 0.0 {
        return Ok(None);
    }

    let highlight = if literal_tokens.is_empty() {
        highlight_whole(raw)
    } else {
        highlight_spans(raw, &literal_tokens, config.case_sensitive)
    };

    Ok(Some(FieldScore { score, highlight }))
}

/// Scores a record across the configured (or discovered) fields.
/// `Ok(None)` means the record does not match.
pub fn score_item<T>(
    item: &T,
    tokens: &[String],
    config: &SearchConfig,
) -> Result<Option<MatchResult<T>>, ScoreError>
where
    T: Searchable + Clone,
{
    let discovered;
    let fields: &[String] = if config.search_fields.is_empty() {
        discovered = item.scalar_field_paths();
        &discovered
    } else {
        &config.search_fields
    };

    let mut total = 0.0;
    let mut matched_fields: Vec<String> = Vec::new();
    let mut highlights = BTreeMap::new();

    for field in fields {
        if matched_fields.contains(field) {
            continue;
        }
        let Some(raw) = item.field_value(field) else {
            continue;
        };
        if let Some(field_score) = score_field(field, &raw, tokens, config)? {
            total += field_score.score;
            matched_fields.push(field.clone());
            highlights.insert(field.clone(), field_score.highlight);
        }
    }

    if !total.is_finite() {
        return Err(ScoreError::NonFiniteScore {
            field: matched_fields.last().cloned().unwrap_or_default(),
            score: total,
        });
    }
    if total <= 0.0 {
        return Ok(None);
    }

    Ok(Some(MatchResult {
        item: item.clone(),
        score: total,
        matched_fields,
        highlights,
    }))
}
