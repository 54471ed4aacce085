//! Session-scoped cache of raw page markup.

use dashmap::DashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::errors::DocSearchError;

type Slot = Arc<OnceCell<Arc<str>>>;

/// Write-once store of fetched pages, keyed by base URL.
///
/// Each key owns a slot that is filled at most once. While a fetch for a key is
/// in flight, other callers of [`PageCache::get_or_fetch`] wait on it instead of
/// issuing their own request. A failed fetch leaves the slot empty, so the next
/// caller tries again. Entries are never evicted or refreshed.
#[derive(Debug, Default)]
pub struct PageCache {
    entries: DashMap<String, Slot>,
}

impl PageCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets cached markup.
    pub fn get(&self, base_url: &str) -> Option<Arc<str>> {
        self.entries
            .get(base_url)
            .and_then(|slot| slot.get().cloned())
    }

    /// Stores markup. Returns false if the key was already populated (or is
    /// being populated); the existing entry wins.
    pub fn put(&self, base_url: &str, markup: impl Into<Arc<str>>) -> bool {
        self.slot(base_url).set(markup.into()).is_ok()
    }

    /// Returns cached markup, or runs `fetch` to populate the entry.
    ///
    /// Concurrent calls for the same key share a single `fetch`. Errors are
    /// returned to the caller that ran the fetch and are not cached.
    pub async fn get_or_fetch<F, Fut>(
        &self,
        base_url: &str,
        fetch: F,
    ) -> Result<Arc<str>, DocSearchError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, DocSearchError>>,
    {
        let slot = self.slot(base_url);
        slot.get_or_try_init(|| async { fetch().await.map(Arc::from) })
            .await
            .cloned()
    }

    /// Whether markup for `base_url` is cached.
    #[must_use]
    pub fn contains(&self, base_url: &str) -> bool {
        self.get(base_url).is_some()
    }

    /// Number of populated entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.value().initialized())
            .count()
    }

    /// Returns true if nothing has been cached yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Populated keys, sorted.
    #[must_use]
    pub fn cached_urls(&self) -> Vec<String> {
        let mut urls: Vec<String> = self
            .entries
            .iter()
            .filter(|entry| entry.value().initialized())
            .map(|entry| entry.key().clone())
            .collect();
        urls.sort();
        urls
    }

    fn slot(&self, base_url: &str) -> Slot {
        Arc::clone(&self.entries.entry(base_url.to_string()).or_default())
    }
}
