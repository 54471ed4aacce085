//! Document fetching.
//!
//! The [`Fetcher`] trait is the only way the search and sidebar code reaches
//! the network, so tests can swap in a recording double.

mod directory;
#[cfg(feature = "http")]
mod http;

pub use directory::DirectoryFetcher;
#[cfg(feature = "http")]
pub use http::HttpFetcher;

use async_trait::async_trait;

use crate::errors::DocSearchError;

/// Result of a fetch operation.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResult {
    /// HTTP status code.
    pub status_code: u16,
    /// Response body as text.
    pub text: String,
    /// Final URL after redirects.
    pub final_url: String,
    /// Content type from headers.
    pub content_type: Option<String>,
    /// Time taken to fetch in milliseconds.
    pub duration_ms: f64,
}

impl FetchResult {
    /// A 200 response carrying `text`.
    #[must_use]
    pub fn ok(url: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            status_code: 200,
            text: text.into(),
            final_url: url.into(),
            content_type: Some("text/html".to_string()),
            duration_ms: 0.0,
        }
    }

    /// An empty response with the given status.
    #[must_use]
    pub fn status(url: impl Into<String>, status_code: u16) -> Self {
        Self {
            status_code,
            text: String::new(),
            final_url: url.into(),
            content_type: None,
            duration_ms: 0.0,
        }
    }

    /// Whether the response is HTML.
    #[must_use]
    pub fn is_html(&self) -> bool {
        self.content_type
            .as_ref()
            .is_some_and(|ct| ct.contains("text/html") || ct.contains("application/xhtml"))
    }

    /// Whether the fetch was successful (2xx status).
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// Protocol for fetching documents relative to the site root.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches a URL and returns the result.
    ///
    /// A response with any status is `Ok`; `Err` means no response was
    /// obtained at all.
    async fn fetch(&self, url: &str) -> Result<FetchResult, DocSearchError>;
}

/// Fetches `url` and returns its body, treating non-success statuses as errors.
pub async fn fetch_page(fetcher: &dyn Fetcher, url: &str) -> Result<String, DocSearchError> {
    let result = fetcher.fetch(url).await?;
    if !result.is_success() {
        return Err(DocSearchError::http_status(url, result.status_code));
    }
    tracing::debug!(
        url,
        status = result.status_code,
        bytes = result.text.len(),
        duration_ms = result.duration_ms,
        "Fetched page"
    );
    Ok(result.text)
}
