//! Snippet extraction from raw page markup.

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

use crate::config::DocSearchConfig;
use crate::errors::DocSearchError;

/// Headings that mark addressable sections of a page.
pub const DEFAULT_HEADING_SELECTOR: &str = "h2[id], h3[id]";

/// Parses a CSS selector, mapping failures to [`DocSearchError::InvalidSelector`].
pub fn parse_selector(css: &str) -> Result<Selector, DocSearchError> {
    Selector::parse(css).map_err(|e| DocSearchError::invalid_selector(css, e.to_string()))
}

/// The section of a page that matched a query.
///
/// All fields are empty when no heading matched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    /// Trimmed heading text.
    pub title: String,
    /// Text of the paragraph after the heading, or of its parent element.
    pub snippet: String,
    /// The heading's `id` attribute.
    pub id: String,
}

impl Snippet {
    /// Returns true if nothing was extracted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.snippet.is_empty() && self.id.is_empty()
    }
}

/// Finds the first anchored heading whose text contains a query.
#[derive(Debug, Clone)]
pub struct SnippetExtractor {
    headings: Selector,
}

impl SnippetExtractor {
    /// Creates an extractor scanning headings that match `heading_selector`.
    pub fn new(heading_selector: &str) -> Result<Self, DocSearchError> {
        Ok(Self {
            headings: parse_selector(heading_selector)?,
        })
    }

    /// Creates an extractor from the site configuration.
    pub fn from_config(config: &DocSearchConfig) -> Result<Self, DocSearchError> {
        Self::new(&config.heading_selector)
    }

    /// Extracts the best snippet for an already lower-cased query.
    ///
    /// Headings are visited in document order and the first one whose
    /// lower-cased text contains `query` wins. Headings without an `id`
    /// attribute are skipped even if the selector matched them.
    #[must_use]
    pub fn extract(&self, markup: &str, query: &str) -> Snippet {
        let document = Html::parse_document(markup);

        for heading in document.select(&self.headings) {
            let Some(id) = heading.value().attr("id") else {
                continue;
            };
            let text: String = heading.text().collect();
            if !text.to_lowercase().contains(query) {
                continue;
            }

            return Snippet {
                title: text.trim().to_string(),
                snippet: section_text(heading),
                id: id.to_string(),
            };
        }

        Snippet::default()
    }
}

/// Text describing the section a heading opens.
fn section_text(heading: ElementRef<'_>) -> String {
    let next = heading.next_siblings().find_map(ElementRef::wrap);
    match next {
        Some(sibling) if sibling.value().name() == "p" => trimmed_text(sibling),
        _ => heading
            .parent()
            .and_then(ElementRef::wrap)
            .map(trimmed_text)
            .unwrap_or_default(),
    }
}

fn trimmed_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn extractor() -> SnippetExtractor {
        SnippetExtractor::new(DEFAULT_HEADING_SELECTOR).unwrap()
    }

    #[test]
    fn test_heading_followed_by_paragraph() {
        let snippet = extractor().extract(
            r#"<h2 id="x">Widgets</h2><p>Info about widgets.</p>"#,
            "widget",
        );

        assert_eq!(
            snippet,
            Snippet {
                title: "Widgets".to_string(),
                snippet: "Info about widgets.".to_string(),
                id: "x".to_string(),
            }
        );
    }

    #[test]
    fn test_falls_back_to_parent_text() {
        let snippet = extractor().extract(
            r#"<h3 id="y">Setup</h3><div>Setup details here</div>"#,
            "setup",
        );

        assert_eq!(snippet.title, "Setup");
        assert_eq!(snippet.id, "y");
        // The parent is <body>, whose text includes the heading itself.
        assert_eq!(snippet.snippet, "SetupSetup details here");
    }

    #[test]
    fn test_parent_fallback_inside_section() {
        let markup = r#"
            <main>
              <section><h2 id="boot">Boot Agent</h2><ul><li>starts hosts</li></ul></section>
            </main>"#;
        let snippet = extractor().extract(markup, "boot");

        assert_eq!(snippet.id, "boot");
        assert!(snippet.snippet.starts_with("Boot Agent"));
        assert!(snippet.snippet.contains("starts hosts"));
    }

    #[test]
    fn test_whitespace_between_heading_and_paragraph() {
        let markup = "<h2 id=\"cfg\">\n  Configuration\n</h2>\n\n<p>\n  Device and matrix files.\n</p>";
        let snippet = extractor().extract(markup, "configuration");

        assert_eq!(snippet.title, "Configuration");
        assert_eq!(snippet.snippet, "Device and matrix files.");
    }

    #[test]
    fn test_first_match_in_document_order_wins() {
        let markup = r#"
            <h3 id="first">Sandbox basics</h3><p>One.</p>
            <h2 id="second">Sandbox config</h2><p>Two.</p>"#;
        let snippet = extractor().extract(markup, "sandbox");

        assert_eq!(snippet.id, "first");
        assert_eq!(snippet.snippet, "One.");
    }

    #[test]
    fn test_headings_without_id_are_ignored() {
        let markup = r#"<h2>Sandbox</h2><p>No anchor.</p><h3 id="later">Sandbox later</h3><p>Anchored.</p>"#;
        let snippet = extractor().extract(markup, "sandbox");

        assert_eq!(snippet.id, "later");
        assert_eq!(snippet.snippet, "Anchored.");
    }

    #[test]
    fn test_other_heading_levels_are_ignored() {
        let markup = r#"<h1 id="top">Sandbox</h1><h4 id="deep">Sandbox</h4>"#;
        assert!(extractor().extract(markup, "sandbox").is_empty());
    }

    #[test]
    fn test_body_only_match_returns_empty() {
        let markup = r#"<h2 id="intro">Introduction</h2><p>The sandbox runs elements.</p>"#;
        let snippet = extractor().extract(markup, "sandbox");

        assert!(snippet.is_empty());
        assert_eq!(snippet, Snippet::default());
    }

    #[test]
    fn test_nested_markup_in_heading() {
        let markup = r#"<h2 id="gui"><code>GUI</code> Design</h2><p>Principles.</p>"#;
        let snippet = extractor().extract(markup, "gui design");

        assert_eq!(snippet.title, "GUI Design");
        assert_eq!(snippet.snippet, "Principles.");
    }

    #[test]
    fn test_custom_selector() {
        let extractor = SnippetExtractor::new("h4[id]").unwrap();
        let snippet = extractor.extract(r#"<h4 id="d">Deep</h4><p>Detail.</p>"#, "deep");
        assert_eq!(snippet.id, "d");
    }

    #[test]
    fn test_invalid_selector() {
        let err = SnippetExtractor::new("h2[").unwrap_err();
        assert!(matches!(err, DocSearchError::InvalidSelector { .. }));
    }
}
