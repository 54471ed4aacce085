//! Error types for docsearch.
//!
//! Per-page failures never reach the user: the search orchestrator turns them
//! into fallback results and log lines. These errors surface from the lower
//! layers (fetchers, configuration, sidebar loading) to callers that want them.

use std::collections::HashMap;
use thiserror::Error;

/// The main error type for docsearch operations.
#[derive(Debug, Error)]
pub enum DocSearchError {
    /// The request never produced a response (connect, timeout, body read).
    #[error("Failed to fetch {url}: {reason}")]
    Fetch {
        /// The requested URL.
        url: String,
        /// Transport-level reason.
        reason: String,
    },

    /// The server answered with a non-success status.
    #[error("Failed to load {url}: HTTP {status}")]
    HttpStatus {
        /// The requested URL.
        url: String,
        /// The status code received.
        status: u16,
    },

    /// A link could not be resolved against the site base URL.
    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl {
        /// The offending URL or link.
        url: String,
        /// Parser message.
        reason: String,
    },

    /// A CSS selector from configuration failed to parse.
    #[error("Invalid selector {selector:?}: {reason}")]
    InvalidSelector {
        /// The selector text.
        selector: String,
        /// Parser message.
        reason: String,
    },

    /// Configuration was rejected.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A generic internal error.
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DocSearchError {
    /// Creates a transport failure error.
    #[must_use]
    pub fn fetch(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Creates a non-success status error.
    #[must_use]
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates an invalid URL error.
    #[must_use]
    pub fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid selector error.
    #[must_use]
    pub fn invalid_selector(selector: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSelector {
            selector: selector.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error means the page content is unavailable.
    ///
    /// Both transport failures and non-success statuses count.
    #[must_use]
    pub fn is_content_unavailable(&self) -> bool {
        matches!(self, Self::Fetch { .. } | Self::HttpStatus { .. })
    }

    /// Converts to a dictionary representation for diagnostics.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();

        match self {
            Self::Fetch { url, reason } => {
                map.insert("type".to_string(), serde_json::json!("FetchError"));
                map.insert("url".to_string(), serde_json::json!(url));
                map.insert("reason".to_string(), serde_json::json!(reason));
            }
            Self::HttpStatus { url, status } => {
                map.insert("type".to_string(), serde_json::json!("HttpStatusError"));
                map.insert("url".to_string(), serde_json::json!(url));
                map.insert("status".to_string(), serde_json::json!(status));
            }
            Self::InvalidUrl { url, reason } => {
                map.insert("type".to_string(), serde_json::json!("InvalidUrl"));
                map.insert("url".to_string(), serde_json::json!(url));
                map.insert("reason".to_string(), serde_json::json!(reason));
            }
            Self::InvalidSelector { selector, reason } => {
                map.insert("type".to_string(), serde_json::json!("InvalidSelector"));
                map.insert("selector".to_string(), serde_json::json!(selector));
                map.insert("reason".to_string(), serde_json::json!(reason));
            }
            Self::Config(_) => {
                map.insert("type".to_string(), serde_json::json!("ConfigError"));
            }
            Self::Serialization(_) => {
                map.insert("type".to_string(), serde_json::json!("SerializationError"));
            }
            Self::Internal(_) => {
                map.insert("type".to_string(), serde_json::json!("InternalError"));
            }
            Self::Io(_) => {
                map.insert("type".to_string(), serde_json::json!("IoError"));
            }
        }

        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        map
    }
}

impl From<serde_json::Error> for DocSearchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_message() {
        let err = DocSearchError::http_status("sandbox-config.html", 404);
        assert_eq!(err.to_string(), "Failed to load sandbox-config.html: HTTP 404");
        assert!(err.is_content_unavailable());
    }

    #[test]
    fn test_fetch_error_is_content_unavailable() {
        let err = DocSearchError::fetch("general.html", "connection refused");
        assert!(err.is_content_unavailable());
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_config_error_is_not_content_unavailable() {
        let err = DocSearchError::Config("bad".to_string());
        assert!(!err.is_content_unavailable());
    }

    #[test]
    fn test_error_to_dict() {
        let err = DocSearchError::http_status("tools.html", 500);
        let dict = err.to_dict();

        assert_eq!(dict.get("type").unwrap(), "HttpStatusError");
        assert_eq!(dict.get("url").unwrap(), "tools.html");
        assert_eq!(dict.get("status").unwrap(), 500);
        assert!(dict.contains_key("message"));
    }

    #[test]
    fn test_from_serde_json() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let err: DocSearchError = parse.unwrap_err().into();
        assert!(matches!(err, DocSearchError::Serialization(_)));
    }
}
