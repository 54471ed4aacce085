//! Result overlay markup.
//!
//! The host page injects this markup as a modal above a dimming backdrop.
//! Clicking the backdrop or the close button dismisses it; result links carry
//! the `redirect-link` class so the host can close the modal on navigation.

use crate::search::SearchResult;

/// Shown when a search produced no results.
pub const NO_RESULTS_MESSAGE: &str = "No results found.";

/// Element id of the modal container.
pub const MODAL_ID: &str = "search-results-modal";

/// Element id of the backdrop behind the modal.
pub const OVERLAY_ID: &str = "search-results-overlay";

/// Renders the overlay for `results`.
#[must_use]
pub fn render_overlay(results: &[SearchResult]) -> String {
    format!(
        "<div id=\"{OVERLAY_ID}\" class=\"search-overlay\"></div>\
         <div id=\"{MODAL_ID}\" class=\"search-modal\" role=\"dialog\">\
         <button type=\"button\" class=\"search-close\" aria-label=\"Close\">X</button>\
         <div class=\"search-content\">{}</div></div>",
        render_results(results)
    )
}

/// Renders only the list (or the empty message), without the modal chrome.
#[must_use]
pub fn render_results(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return format!("<p>{NO_RESULTS_MESSAGE}</p>");
    }

    let items: String = results.iter().map(render_item).collect();
    format!("<h2>Search Results:</h2><ul>{items}</ul>")
}

fn render_item(result: &SearchResult) -> String {
    let snippet = if result.snippet.is_empty() {
        String::new()
    } else {
        format!("<p>{}</p>", html_escape(&result.snippet))
    };
    format!(
        "<li><a href=\"{}\" class=\"redirect-link\">{}</a>{snippet}</li>",
        html_escape(&result.href()),
        html_escape(&result.title),
    )
}

/// Escape HTML special characters.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topics::Topic;

    fn result(title: &str, snippet: &str, id: &str) -> SearchResult {
        SearchResult {
            name: "Sandbox Config".to_string(),
            link: "sandbox-config.html".to_string(),
            title: title.to_string(),
            snippet: snippet.to_string(),
            id: id.to_string(),
        }
    }

    #[test]
    fn test_empty_results() {
        let html = render_overlay(&[]);
        assert!(html.contains("<p>No results found.</p>"));
        assert!(!html.contains("Search Results:"));
        assert!(html.contains(MODAL_ID));
        assert!(html.contains(OVERLAY_ID));
    }

    #[test]
    fn test_result_with_anchor_and_snippet() {
        let html = render_results(&[result("Limits", "CPU and memory caps.", "limits")]);
        assert_eq!(
            html,
            "<h2>Search Results:</h2><ul><li><a href=\"sandbox-config.html#limits\" \
             class=\"redirect-link\">Limits</a><p>CPU and memory caps.</p></li></ul>"
        );
    }

    #[test]
    fn test_result_without_snippet_or_anchor() {
        let html = render_results(&[SearchResult::unavailable(Topic::new("Tools", "tools.html"), "")]);
        assert!(html.contains("<a href=\"tools.html\" class=\"redirect-link\">Tools</a></li>"));
        assert!(!html.contains("<p>"));
    }

    #[test]
    fn test_results_keep_order() {
        let html = render_results(&[result("First", "", "a"), result("Second", "", "b")]);
        let first = html.find("First").unwrap();
        let second = html.find("Second").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_escapes_page_text() {
        let html = render_results(&[result("<script>x</script>", "a & b", "")]);
        assert!(html.contains("&lt;script&gt;x&lt;/script&gt;"));
        assert!(html.contains("a &amp; b"));
    }
}
