//! HTTP fetcher backed by `reqwest`.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{redirect, Client, Url};

use super::{FetchResult, Fetcher};
use crate::config::{DocSearchConfig, FetchConfig};
use crate::errors::DocSearchError;
use crate::observability::SpanTimer;

/// Fetches documentation pages over HTTP, resolving links against the site root.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    base_url: Url,
    config: FetchConfig,
}

impl HttpFetcher {
    /// Creates a fetcher for the site rooted at `base_url`.
    pub fn new(base_url: &str, config: FetchConfig) -> Result<Self, DocSearchError> {
        let base_url =
            Url::parse(base_url).map_err(|e| DocSearchError::invalid_url(base_url, e.to_string()))?;

        let mut headers = HeaderMap::new();
        for (key, value) in &config.headers {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|e| DocSearchError::Config(format!("invalid header name {key:?}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| DocSearchError::Config(format!("invalid value for header {key:?}: {e}")))?;
            headers.insert(name, value);
        }

        let client = Client::builder()
            .timeout(config.timeout()?)
            .user_agent(config.user_agent.as_str())
            .redirect(redirect::Policy::limited(config.max_redirects))
            .default_headers(headers)
            .build()
            .map_err(|e| DocSearchError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    /// Creates a fetcher from the site configuration.
    pub fn from_config(config: &DocSearchConfig) -> Result<Self, DocSearchError> {
        Self::new(&config.base_url, config.fetch.clone())
    }

    /// Gets the configuration.
    #[must_use]
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Resolves a site-relative link to an absolute URL.
    pub fn resolve(&self, link: &str) -> Result<Url, DocSearchError> {
        self.base_url
            .join(link)
            .map_err(|e| DocSearchError::invalid_url(link, e.to_string()))
    }

    fn too_large(&self, url: &str, size: u64) -> DocSearchError {
        DocSearchError::fetch(
            url,
            format!(
                "response of {size} bytes exceeds limit of {} bytes",
                self.config.max_response_size
            ),
        )
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResult, DocSearchError> {
        let target = self.resolve(url)?;
        let timer = SpanTimer::start(target.as_str());
        let limit = self.config.max_response_size as u64;

        let response = self
            .client
            .get(target)
            .send()
            .await
            .map_err(|e| DocSearchError::fetch(url, e.to_string()))?;

        if let Some(length) = response.content_length() {
            if length > limit {
                return Err(self.too_large(url, length));
            }
        }

        let status_code = response.status().as_u16();
        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let body = response
            .bytes()
            .await
            .map_err(|e| DocSearchError::fetch(url, e.to_string()))?;
        if body.len() as u64 > limit {
            return Err(self.too_large(url, body.len() as u64));
        }

        Ok(FetchResult {
            status_code,
            text: String::from_utf8_lossy(&body).into_owned(),
            final_url,
            content_type,
            duration_ms: timer.finish(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_links() {
        let fetcher =
            HttpFetcher::new("https://docs.example.com/v0.2/", FetchConfig::default()).unwrap();

        assert_eq!(
            fetcher.resolve("general.html").unwrap().as_str(),
            "https://docs.example.com/v0.2/general.html"
        );
        assert_eq!(
            fetcher.resolve("/sidebar.html").unwrap().as_str(),
            "https://docs.example.com/sidebar.html"
        );
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let err = HttpFetcher::new("not a url", FetchConfig::default()).unwrap_err();
        assert!(matches!(err, DocSearchError::InvalidUrl { .. }));
    }

    #[test]
    fn test_rejects_invalid_header() {
        let config = FetchConfig::new().with_header("bad header", "x");
        let err = HttpFetcher::new("https://docs.example.com/", config).unwrap_err();
        assert!(matches!(err, DocSearchError::Config(_)));
    }

    #[test]
    fn test_rejects_negative_timeout() {
        let config = FetchConfig::new().with_timeout(-1.0);
        let err = HttpFetcher::new("https://docs.example.com/", config).unwrap_err();
        assert!(matches!(err, DocSearchError::Config(_)));
    }

    #[test]
    fn test_from_config() {
        let config = DocSearchConfig::new().with_base_url("https://docs.example.com/");
        let fetcher = HttpFetcher::from_config(&config).unwrap();
        assert_eq!(fetcher.config().max_redirects, 10);
    }
}
