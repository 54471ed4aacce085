//! Fetcher that serves pages from a built site directory on disk.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use super::{FetchResult, Fetcher};
use crate::errors::DocSearchError;
use crate::observability::SpanTimer;
use crate::topics::base_url;

/// Reads site-relative links from a local directory.
///
/// A missing file answers with status 404, like a static file server would.
#[derive(Debug, Clone)]
pub struct DirectoryFetcher {
    root: PathBuf,
}

impl DirectoryFetcher {
    /// Creates a fetcher rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The site root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a link to a path under the root, refusing anything that escapes it.
    pub fn resolve(&self, link: &str) -> Result<PathBuf, DocSearchError> {
        let page = base_url(link);
        let page = page.split('?').next().unwrap_or(page);
        let relative = Path::new(page.trim_start_matches('/'));

        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(DocSearchError::invalid_url(link, "path leaves the site root"));
        }
        Ok(self.root.join(relative))
    }
}

fn content_type_for(path: &Path) -> Option<String> {
    let content_type = match path.extension()?.to_str()? {
        "html" | "htm" => "text/html; charset=utf-8",
        "xhtml" => "application/xhtml+xml",
        "txt" => "text/plain; charset=utf-8",
        "json" => "application/json",
        _ => return None,
    };
    Some(content_type.to_string())
}

#[async_trait]
impl Fetcher for DirectoryFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResult, DocSearchError> {
        let path = self.resolve(url)?;
        let timer = SpanTimer::start(url);

        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(FetchResult {
                status_code: 200,
                text: String::from_utf8_lossy(&bytes).into_owned(),
                final_url: url.to_string(),
                content_type: content_type_for(&path),
                duration_ms: timer.finish(),
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(FetchResult::status(url, 404)),
            Err(e) => Err(DocSearchError::fetch(url, e.to_string())),
        }
    }
}
