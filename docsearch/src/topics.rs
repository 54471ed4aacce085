//! The topic registry: every searchable documentation page, in display order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::errors::DocSearchError;

/// One searchable documentation page (or a section of one).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Topic {
    /// Display name.
    pub name: String,
    /// Link relative to the site root, optionally with a `#fragment`.
    pub link: String,
}

impl Topic {
    /// Creates a new topic.
    #[must_use]
    pub fn new(name: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            link: link.into(),
        }
    }

    /// The link with any fragment removed; the page cache key.
    #[must_use]
    pub fn base_url(&self) -> &str {
        base_url(&self.link)
    }

    /// The fragment part of the link, if any.
    #[must_use]
    pub fn fragment(&self) -> Option<&str> {
        self.link.split_once('#').map(|(_, fragment)| fragment)
    }

    /// Whether the lower-cased name contains an already normalized query.
    #[must_use]
    pub fn name_matches(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(query)
    }
}

/// Strips a trailing `#fragment` from a link.
#[must_use]
pub fn base_url(link: &str) -> &str {
    link.split('#').next().unwrap_or(link)
}

/// Topics shipped with the documentation site.
pub const DEFAULT_TOPICS: &[(&str, &str)] = &[
    ("General", "general.html"),
    ("SP Tools", "tools.html"),
    ("File Structure", "file-structure.html"),
    ("File Import Order", "file-order.html"),
    ("Framework Essentials", "essentials.html"),
    ("GUI Design Principles", "gui-design.html"),
    ("Boot Agent", "boot-agent.html"),
    ("Configuration Files", "configuration-files.html"),
    ("Device Configuration", "configuration-files.html#device-config"),
    ("Matrix Configuration", "configuration-files.html#matrix-config"),
    ("What is a Sandbox?", "sandbox.html"),
    ("Defining a Sandbox", "defining-a-sandbox.html"),
    ("Sandbox Config", "sandbox-config.html"),
    ("Creating Elements", "example-creating-elements.html"),
    ("Host Management", "host_management.html"),
];

/// Ordered, immutable list of topics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicRegistry {
    topics: Vec<Topic>,
}

impl TopicRegistry {
    /// Creates a registry from topics in display order.
    #[must_use]
    pub fn new(topics: Vec<Topic>) -> Self {
        Self { topics }
    }

    /// Parses a JSON array of `{"name": ..., "link": ...}` objects.
    pub fn from_json(json: &str) -> Result<Self, DocSearchError> {
        let registry: Self = serde_json::from_str(json)?;
        if let Some(topic) = registry.topics.iter().find(|t| base_url(&t.link).is_empty()) {
            return Err(DocSearchError::Config(format!(
                "topic {:?} has no page in its link {:?}",
                topic.name, topic.link
            )));
        }
        Ok(registry)
    }

    /// Returns the topics in registry order.
    #[must_use]
    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    /// Iterates over topics in registry order.
    pub fn iter(&self) -> std::slice::Iter<'_, Topic> {
        self.topics.iter()
    }

    /// Number of topics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.topics.len()
    }

    /// Returns true if there are no topics.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Distinct base URLs, i.e. the pages a full search may fetch.
    #[must_use]
    pub fn base_urls(&self) -> BTreeSet<&str> {
        self.topics.iter().map(Topic::base_url).collect()
    }
}

impl Default for TopicRegistry {
    fn default() -> Self {
        Self::new(
            DEFAULT_TOPICS
                .iter()
                .map(|(name, link)| Topic::new(*name, *link))
                .collect(),
        )
    }
}

impl FromIterator<Topic> for TopicRegistry {
    fn from_iter<I: IntoIterator<Item = Topic>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a TopicRegistry {
    type Item = &'a Topic;
    type IntoIter = std::slice::Iter<'a, Topic>;

    fn into_iter(self) -> Self::IntoIter {
        self.topics.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_strips_fragment() {
        assert_eq!(base_url("configuration-files.html#device-config"), "configuration-files.html");
        assert_eq!(base_url("general.html"), "general.html");
        assert_eq!(base_url("#top"), "");
    }

    #[test]
    fn test_topic_fragment() {
        let topic = Topic::new("Matrix Configuration", "configuration-files.html#matrix-config");
        assert_eq!(topic.base_url(), "configuration-files.html");
        assert_eq!(topic.fragment(), Some("matrix-config"));
        assert_eq!(Topic::new("General", "general.html").fragment(), None);
    }

    #[test]
    fn test_name_matches_is_case_insensitive() {
        let topic = Topic::new("Sandbox Config", "sandbox-config.html");
        assert!(topic.name_matches("sandbox"));
        assert!(topic.name_matches("box con"));
        assert!(!topic.name_matches("matrix"));
    }

    #[test]
    fn test_default_registry() {
        let registry = TopicRegistry::default();
        assert_eq!(registry.len(), 15);
        assert_eq!(registry.topics()[0].name, "General");
        // Three topics share configuration-files.html.
        assert_eq!(registry.base_urls().len(), 13);
    }

    #[test]
    fn test_from_json_preserves_order() {
        let registry = TopicRegistry::from_json(
            r#"[{"name": "B", "link": "b.html"}, {"name": "A", "link": "a.html#x"}]"#,
        )
        .unwrap();

        let names: Vec<_> = registry.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[test]
    fn test_from_json_rejects_fragment_only_link() {
        let err = TopicRegistry::from_json(r##"[{"name": "Top", "link": "#top"}]"##).unwrap_err();
        assert!(matches!(err, DocSearchError::Config(_)));
    }
}
