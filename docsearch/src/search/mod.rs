//! Full-text search over the topic registry.
//!
//! Matching is plain substring containment on lower-cased text. A topic
//! matches when the query occurs in its name or anywhere in its raw page
//! markup, tags included. There is no ranking: results keep registry order.

mod orchestrator;
mod session;

pub use orchestrator::{DocSearch, DocSearchBuilder};
pub use session::{ResultView, SearchSession};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::extract::{Snippet, SnippetExtractor};
use crate::topics::{base_url, Topic};

/// A normalized, non-empty search query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Query(String);

impl Query {
    /// Trims and lower-cases raw input. Returns `None` for blank input.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            None
        } else {
            Some(Self(normalized))
        }
    }

    /// The normalized query text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One matched topic, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Topic name.
    pub name: String,
    /// Topic link.
    pub link: String,
    /// Matched heading text, or the topic name.
    pub title: String,
    /// Descriptive text near the match; may be empty.
    pub snippet: String,
    /// Anchor to jump to; empty means the top of the page.
    pub id: String,
}

impl SearchResult {
    /// Builds a result from a topic and whatever the extractor found.
    ///
    /// An empty title falls back to the topic name.
    #[must_use]
    pub fn from_snippet(topic: Topic, snippet: Snippet) -> Self {
        let title = if snippet.title.is_empty() {
            topic.name.clone()
        } else {
            snippet.title
        };
        Self {
            name: topic.name,
            link: topic.link,
            title,
            snippet: snippet.snippet,
            id: snippet.id,
        }
    }

    /// Builds the name-only result used when the page could not be loaded.
    #[must_use]
    pub fn unavailable(topic: Topic, snippet: impl Into<String>) -> Self {
        Self {
            title: topic.name.clone(),
            name: topic.name,
            link: topic.link,
            snippet: snippet.into(),
            id: String::new(),
        }
    }

    /// Link target: the topic link, or its page with `#id` when an anchor
    /// matched.
    ///
    /// This is not plain `link#id` concatenation. A matched anchor replaces
    /// any fragment the link already had, so `configuration-files.html#matrix-config`
    /// with id `matrix-size` becomes `configuration-files.html#matrix-size`.
    #[must_use]
    pub fn href(&self) -> String {
        if self.id.is_empty() {
            self.link.clone()
        } else {
            format!("{}#{}", base_url(&self.link), self.id)
        }
    }

    /// The topic this result came from.
    #[must_use]
    pub fn topic(&self) -> Topic {
        Topic::new(self.name.clone(), self.link.clone())
    }
}

/// Decides whether `topic` matches given its page markup and, if so, builds
/// its result.
#[must_use]
pub fn match_topic(
    topic: Topic,
    markup: &str,
    query: &Query,
    extractor: &SnippetExtractor,
) -> Option<SearchResult> {
    let query = query.as_str();
    if !topic.name_matches(query) && !markup.to_lowercase().contains(query) {
        return None;
    }

    let snippet = extractor.extract(markup, query);
    Some(SearchResult::from_snippet(topic, snippet))
}

/// Decides whether `topic` matches when its page could not be loaded.
#[must_use]
pub fn match_unavailable(
    topic: Topic,
    query: &Query,
    unavailable_snippet: &str,
) -> Option<SearchResult> {
    topic
        .name_matches(query.as_str())
        .then(|| SearchResult::unavailable(topic, unavailable_snippet))
}
