use crate::cli::OutputFormat;
use crate::error::Result;
use crate::record::Searchable;
use crate::search::highlight::{MARK_CLOSE, MARK_OPEN};
use crate::search::SearchResponse;
use colored::Colorize;
use serde::Serialize;

/// Output formatter for search responses
pub struct OutputFormatter {
    format: OutputFormat,
    include_metadata: bool,
    color: bool,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            include_metadata: true,
            color: true,
        }
    }

    pub fn with_metadata(mut self, include: bool) -> Self {
        self.include_metadata = include;
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn format_response<T>(&self, response: &SearchResponse<T>) -> Result<String>
    where
        T: Searchable + Serialize,
    {
        match self.format {
            OutputFormat::Text => Ok(self.format_text(response)),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(response)?),
        }
    }

    /// Format as plain text (default)
    fn format_text<T: Searchable>(&self, response: &SearchResponse<T>) -> String {
        let mut output = String::new();

        if self.include_metadata {
            output.push_str(&format!("Query: {}\n", response.query));
            output.push_str(&format!(
                "Found {} matches (showing {}) in {:.3} ms\n\n",
                response.total_count,
                response.results.len(),
                response.search_time.as_secs_f64() * 1000.0
            ));
        }

        for (i, result) in response.results.iter().enumerate() {
            output.push_str(&format!(
                "[{}] id={} score={:.2}\n",
                i + 1,
                result.item.record_id(),
                result.score
            ));
            for field in &result.matched_fields {
                if let Some(highlight) = result.highlights.get(field) {
                    output.push_str(&format!("    {field} │ {}\n", self.render_marks(highlight)));
                }
            }
        }

        if self.include_metadata && !response.suggestions.is_empty() {
            output.push_str("\nSuggestions:\n");
            for suggestion in &response.suggestions {
                output.push_str(&format!("  {suggestion}\n"));
            }
        }

        output
    }

    /// Replaces marker tags with terminal styling, or strips them when
    /// color is off.
    fn render_marks(&self, highlighted: &str) -> String {
        let mut out = String::with_capacity(highlighted.len());
        let mut rest = highlighted;
        while let Some(open) = rest.find(MARK_OPEN) {
            out.push_str(&rest[..open]);
            let after_open = &rest[open + MARK_OPEN.len()..];
            let Some(close) = after_open.find(MARK_CLOSE) else {
                out.push_str(&rest[open..]);
                return out;
            };
            let marked = &after_open[..close];
            if self.color {
                out.push_str(&marked.yellow().bold().to_string());
            } else {
                out.push_str(marked);
            }
            rest = &after_open[close + MARK_CLOSE.len()..];
        }
        out.push_str(rest);
        out
    }
}
