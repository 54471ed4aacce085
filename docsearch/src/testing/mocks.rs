//! Mock fetchers for testing.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;

use crate::errors::DocSearchError;
use crate::fetch::{FetchResult, Fetcher};

/// What a [`RecordingFetcher`] answers for one URL.
#[derive(Debug, Clone, PartialEq)]
pub enum MockResponse {
    /// A 200 response with this body.
    Page(String),
    /// An empty response with this status.
    Status(u16),
    /// No response; the fetch fails with this reason.
    Error(String),
}

/// A fetcher that serves canned responses and records every call.
///
/// URLs without a configured response answer 404.
#[derive(Debug, Default)]
pub struct RecordingFetcher {
    responses: Mutex<HashMap<String, MockResponse>>,
    delays: Mutex<HashMap<String, Duration>>,
    calls: Mutex<Vec<String>>,
}

impl RecordingFetcher {
    /// Creates a fetcher with no pages.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `body` for `url`.
    #[must_use]
    pub fn with_page(self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.set_page(url, body);
        self
    }

    /// Answers `url` with an empty response of `status`.
    #[must_use]
    pub fn with_status(self, url: impl Into<String>, status: u16) -> Self {
        self.set_status(url, status);
        self
    }

    /// Fails every fetch of `url`.
    #[must_use]
    pub fn with_error(self, url: impl Into<String>, reason: impl Into<String>) -> Self {
        self.set_response(url, MockResponse::Error(reason.into()));
        self
    }

    /// Delays every fetch of `url`.
    #[must_use]
    pub fn with_delay(self, url: impl Into<String>, delay: Duration) -> Self {
        self.delays.lock().insert(url.into(), delay);
        self
    }

    /// Replaces the response for `url` with a page.
    pub fn set_page(&self, url: impl Into<String>, body: impl Into<String>) {
        self.set_response(url, MockResponse::Page(body.into()));
    }

    /// Replaces the response for `url` with a bare status.
    pub fn set_status(&self, url: impl Into<String>, status: u16) {
        self.set_response(url, MockResponse::Status(status));
    }

    /// Replaces the response for `url`.
    pub fn set_response(&self, url: impl Into<String>, response: MockResponse) {
        self.responses.lock().insert(url.into(), response);
    }

    /// Returns how many times `url` was fetched.
    #[must_use]
    pub fn call_count(&self, url: &str) -> usize {
        self.calls.lock().iter().filter(|called| *called == url).count()
    }

    /// Returns the total number of fetches.
    #[must_use]
    pub fn total_calls(&self) -> usize {
        self.calls.lock().len()
    }

    /// Returns the fetched URLs in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// Resets call tracking.
    pub fn reset(&self) {
        self.calls.lock().clear();
    }
}

#[async_trait]
impl Fetcher for RecordingFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResult, DocSearchError> {
        self.calls.lock().push(url.to_string());

        let delay = self.delays.lock().get(url).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let response = self.responses.lock().get(url).cloned();
        match response {
            Some(MockResponse::Page(body)) => Ok(FetchResult::ok(url, body)),
            Some(MockResponse::Status(status)) => Ok(FetchResult::status(url, status)),
            Some(MockResponse::Error(reason)) => Err(DocSearchError::fetch(url, reason)),
            None => Ok(FetchResult::status(url, 404)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_recording_fetcher_responses() {
        let fetcher = RecordingFetcher::new()
            .with_page("general.html", "<p>hi</p>")
            .with_status("tools.html", 500)
            .with_error("boot-agent.html", "refused");

        assert_eq!(fetcher.fetch("general.html").await.unwrap().text, "<p>hi</p>");
        assert_eq!(fetcher.fetch("tools.html").await.unwrap().status_code, 500);
        assert_eq!(fetcher.fetch("missing.html").await.unwrap().status_code, 404);
        assert!(fetcher.fetch("boot-agent.html").await.is_err());

        assert_eq!(fetcher.total_calls(), 4);
        assert_eq!(fetcher.call_count("general.html"), 1);
        assert_eq!(fetcher.calls()[3], "boot-agent.html");

        fetcher.reset();
        assert_eq!(fetcher.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_set_page_replaces_status() {
        let fetcher = RecordingFetcher::new().with_status("general.html", 503);
        assert!(!fetcher.fetch("general.html").await.unwrap().is_success());

        fetcher.set_page("general.html", "<p>back</p>");
        assert!(fetcher.fetch("general.html").await.unwrap().is_success());
    }
}
