//! Marker-tag rendering of matched spans
use log::debug;
use regex::RegexBuilder;

pub const MARK_OPEN: &str = "<mark>";
pub const MARK_CLOSE: &str = "</mark>";

/// Compiled size cap for a single token matcher.
const MATCHER_SIZE_LIMIT: usize = 1 << 20;

/// Wraps every occurrence of each literal token in `raw` with marker tags.
/// Overlapping or adjacent spans are merged. If a matcher cannot be built the
/// raw value is returned unchanged.
pub fn highlight_spans(raw: &str, tokens: &[&str], case_sensitive: bool) -> String {
    highlight_spans_limited(raw, tokens, case_sensitive, MATCHER_SIZE_LIMIT)
}

fn highlight_spans_limited(
    raw: &str,
    tokens: &[&str],
    case_sensitive: bool,
    size_limit: usize,
) -> String {
    let mut spans: Vec<(usize, usize)> = Vec::new();

    for token in tokens.iter().filter(|t| !t.is_empty()) {
        let regex = match RegexBuilder::new(&regex::escape(token))
            .case_insensitive(!case_sensitive)
            .size_limit(size_limit)
            .build()
        {
            Ok(regex) => regex,
            Err(e) => {
                debug!("Highlight fallback for token {token:?}: {e}");
                return raw.to_string();
            }
        };
        spans.extend(regex.find_iter(raw).map(|m| (m.start(), m.end())));
    }

    if spans.is_empty() {
        return raw.to_string();
    }

    spans.sort_unstable();
    let mut merged: Vec<(usize, usize)> = Vec::with_capacity(spans.len());
    for (start, end) in spans {
        match merged.last_mut() {
            Some(last) if start <= last.1 => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }

    let mut out = String::with_capacity(raw.len() + merged.len() * 13);
    let mut cursor = 0;
    for (start, end) in merged {
        out.push_str(&raw[cursor..start]);
        out.push_str(MARK_OPEN);
        out.push_str(&raw[start..end]);
        out.push_str(MARK_CLOSE);
        cursor = end;
    }
    out.push_str(&raw[cursor..]);
    out
}

/// Wraps the entire value. Used for fields matched only fuzzily.
pub fn highlight_whole(raw: &str) -> String {
    format!("{MARK_OPEN}{raw}{MARK_CLOSE}")
}
