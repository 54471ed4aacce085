//! Configuration types for docsearch.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::errors::DocSearchError;

/// Snippet shown for a name-only match whose page could not be loaded.
pub const UNAVAILABLE_SNIPPET: &str = "Page content not available, but title matches search query.";

/// Configuration for fetching documentation pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: f64,
    /// Maximum number of redirects to follow.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
    /// User agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Maximum response size in bytes.
    #[serde(default = "default_max_size")]
    pub max_response_size: usize,
    /// Additional headers to include.
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

fn default_timeout() -> f64 {
    30.0
}

fn default_max_redirects() -> usize {
    10
}

fn default_user_agent() -> String {
    concat!("docsearch/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_max_size() -> usize {
    10 * 1024 * 1024 // 10MB
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            max_redirects: default_max_redirects(),
            user_agent: default_user_agent(),
            max_response_size: default_max_size(),
            headers: HashMap::new(),
        }
    }
}

impl FetchConfig {
    /// Creates a new fetch configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the timeout.
    #[must_use]
    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Sets the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Sets the maximum accepted body size.
    #[must_use]
    pub fn with_max_response_size(mut self, bytes: usize) -> Self {
        self.max_response_size = bytes;
        self
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Gets timeout as Duration.
    ///
    /// Fails unless the timeout is finite and positive.
    pub fn timeout(&self) -> Result<Duration, DocSearchError> {
        if self.timeout_seconds <= 0.0 {
            return Err(invalid_timeout(self.timeout_seconds));
        }
        Duration::try_from_secs_f64(self.timeout_seconds)
            .map_err(|_| invalid_timeout(self.timeout_seconds))
    }
}

fn invalid_timeout(seconds: f64) -> DocSearchError {
    DocSearchError::Config(format!("fetch.timeout_seconds must be positive, got {seconds}"))
}

/// Top-level configuration for a documentation site's search client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocSearchConfig {
    /// Site root that topic links are relative to.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Quiet period before a typed query is searched, in milliseconds.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Location of the shared sidebar fragment.
    #[serde(default = "default_sidebar_url")]
    pub sidebar_url: String,
    /// Headings considered addressable sections.
    #[serde(default = "default_heading_selector")]
    pub heading_selector: String,
    /// Snippet used when only the topic name matched and the page is unavailable.
    #[serde(default = "default_unavailable_snippet")]
    pub unavailable_snippet: String,
    /// Fetch configuration.
    #[serde(default)]
    pub fetch: FetchConfig,
}

fn default_base_url() -> String {
    "http://localhost:8000/".to_string()
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_sidebar_url() -> String {
    "sidebar.html".to_string()
}

fn default_heading_selector() -> String {
    "h2[id], h3[id]".to_string()
}

fn default_unavailable_snippet() -> String {
    UNAVAILABLE_SNIPPET.to_string()
}

impl Default for DocSearchConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            debounce_ms: default_debounce_ms(),
            sidebar_url: default_sidebar_url(),
            heading_selector: default_heading_selector(),
            unavailable_snippet: default_unavailable_snippet(),
            fetch: FetchConfig::default(),
        }
    }
}

impl DocSearchConfig {
    /// Creates a new configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, DocSearchError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the site base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the debounce interval.
    #[must_use]
    pub fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    /// Sets the sidebar fragment location.
    #[must_use]
    pub fn with_sidebar_url(mut self, sidebar_url: impl Into<String>) -> Self {
        self.sidebar_url = sidebar_url.into();
        self
    }

    /// Sets the fetch configuration.
    #[must_use]
    pub fn with_fetch(mut self, fetch: FetchConfig) -> Self {
        self.fetch = fetch;
        self
    }

    /// Gets the debounce interval as Duration.
    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Checks values that serde cannot.
    pub fn validate(&self) -> Result<(), DocSearchError> {
        if self.heading_selector.trim().is_empty() {
            return Err(DocSearchError::Config(
                "heading_selector must not be empty".to_string(),
            ));
        }
        self.fetch.timeout()?;
        Ok(())
    }
}
