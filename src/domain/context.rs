//! Context assembly - packing ranked results into a bounded prompt string

use serde::{Deserialize, Serialize};

use crate::domain::knowledge_base::SearchResult;

/// Bounds for the assembled context length, counted in characters
pub const MIN_CONTEXT_LENGTH: usize = 100;
pub const MAX_CONTEXT_LENGTH: usize = 16_000;

/// Default assembled context length
pub const DEFAULT_CONTEXT_LENGTH: usize = 4_000;

/// Output format of the assembled context
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextFormat {
    /// Snippets separated by blank lines
    #[default]
    Plain,
    /// Snippets with a markdown source heading
    Markdown,
}

/// Options for context assembly
#[derive(Debug, Clone)]
pub struct ContextOptions {
    max_length: usize,
    include_source: bool,
    format: ContextFormat,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_CONTEXT_LENGTH,
            include_source: true,
            format: ContextFormat::Plain,
        }
    }
}

impl ContextOptions {
    /// Create options with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum context length, clamped to the supported range
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length.clamp(MIN_CONTEXT_LENGTH, MAX_CONTEXT_LENGTH);
        self
    }

    /// Set whether source headers are rendered
    pub fn with_include_source(mut self, include_source: bool) -> Self {
        self.include_source = include_source;
        self
    }

    /// Set the output format
    pub fn with_format(mut self, format: ContextFormat) -> Self {
        self.format = format;
        self
    }

    /// Get the maximum length
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Whether source headers are rendered
    pub fn include_source(&self) -> bool {
        self.include_source
    }

    /// Get the output format
    pub fn format(&self) -> ContextFormat {
        self.format
    }
}

fn render_snippet(result: &SearchResult, options: &ContextOptions) -> String {
    let source = if options.include_source {
        result.source.as_deref()
    } else {
        None
    };

    match options.format {
        ContextFormat::Markdown => match source {
            Some(source) => format!("### {}\n{}\n", source, result.text),
            None => format!("{}\n", result.text),
        },
        ContextFormat::Plain => format!("{}\n\n", result.text),
    }
}

/// Pack already-ranked results into a single bounded string.
///
/// The bound is counted in characters, not bytes. Snippets are appended
/// whole, in the given order, until the next one would push the running
/// length past `max_length`. A snippet is never truncated mid-text; a
/// first snippet that alone exceeds the bound is dropped and the empty
/// string returned.
pub fn build_context(results: &[SearchResult], options: &ContextOptions) -> String {
    let mut context = String::new();
    let mut total_chars = 0;

    for result in results {
        let snippet = render_snippet(result, options);
        let snippet_chars = snippet.chars().count();

        if total_chars + snippet_chars > options.max_length() {
            break;
        }

        total_chars += snippet_chars;
        context.push_str(&snippet);
    }

    context
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::knowledge_base::KnowledgeBaseId;
    use uuid::Uuid;

    fn result(text: &str, source: Option<&str>) -> SearchResult {
        let mut r = SearchResult::new(
            Uuid::new_v4(),
            KnowledgeBaseId::new("faq").unwrap(),
            0,
            text,
            0.9,
        );
        if let Some(source) = source {
            r = r.with_source(source);
        }
        r
    }

    #[test]
    fn test_empty_results_yield_empty_string() {
        assert_eq!(build_context(&[], &ContextOptions::new()), "");
    }

    #[test]
    fn test_plain_format() {
        let results = vec![result("First answer.", None), result("Second answer.", None)];

        let context = build_context(&results, &ContextOptions::new());

        assert_eq!(context, "First answer.\n\nSecond answer.\n\n");
    }

    #[test]
    fn test_markdown_format_with_source() {
        let results = vec![result("Opening hours are 9-18.", Some("Handbook"))];

        let options = ContextOptions::new().with_format(ContextFormat::Markdown);
        let context = build_context(&results, &options);

        assert_eq!(context, "### Handbook\nOpening hours are 9-18.\n");
    }

    #[test]
    fn test_markdown_without_source_label() {
        let results = vec![result("No attribution here.", None)];

        let options = ContextOptions::new().with_format(ContextFormat::Markdown);
        let context = build_context(&results, &options);

        assert_eq!(context, "No attribution here.\n");
    }

    #[test]
    fn test_include_source_false_suppresses_header() {
        let results = vec![result("Text.", Some("Handbook"))];

        let options = ContextOptions::new()
            .with_format(ContextFormat::Markdown)
            .with_include_source(false);
        let context = build_context(&results, &options);

        assert_eq!(context, "Text.\n");
    }

    #[test]
    fn test_never_exceeds_max_length() {
        let snippet = "x".repeat(80);
        let results = vec![
            result(&snippet, None),
            result(&snippet, None),
            result(&snippet, None),
        ];

        for max_length in [100, 150, 200, 300, 400] {
            let options = ContextOptions::new().with_max_length(max_length);
            let context = build_context(&results, &options);
            assert!(context.len() <= max_length, "exceeded {} chars", max_length);
        }
    }

    #[test]
    fn test_stops_before_overflowing_snippet() {
        // Two 80-char snippets render to 82 chars each in plain format;
        // only the first fits under 100
        let snippet = "x".repeat(80);
        let results = vec![result(&snippet, None), result(&snippet, None)];

        let options = ContextOptions::new().with_max_length(100);
        let context = build_context(&results, &options);

        assert_eq!(context.len(), 82);
        assert!(context.starts_with(&snippet));
    }

    #[test]
    fn test_max_length_counted_in_characters() {
        // 80 accented chars are 160 bytes; the snippet fits a 100-char
        // budget even though its byte length exceeds it
        let snippet = "é".repeat(80);
        let results = vec![result(&snippet, None)];

        let options = ContextOptions::new().with_max_length(100);
        let context = build_context(&results, &options);

        assert!(!context.is_empty());
        assert!(context.chars().count() <= 100);
    }

    #[test]
    fn test_oversized_first_snippet_dropped() {
        let oversized = "x".repeat(500);
        let results = vec![result(&oversized, None)];

        let options = ContextOptions::new().with_max_length(100);
        let context = build_context(&results, &options);

        assert_eq!(context, "");
    }

    #[test]
    fn test_max_length_clamped() {
        assert_eq!(
            ContextOptions::new().with_max_length(10).max_length(),
            MIN_CONTEXT_LENGTH
        );
        assert_eq!(
            ContextOptions::new().with_max_length(1_000_000).max_length(),
            MAX_CONTEXT_LENGTH
        );
    }
}
