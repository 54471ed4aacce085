//! The search orchestrator: fetch-or-reuse every page, match, aggregate.

use futures::future::{join_all, BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::{match_topic, match_unavailable, Query, SearchResult};
use crate::cache::PageCache;
use crate::config::{DocSearchConfig, UNAVAILABLE_SNIPPET};
use crate::errors::DocSearchError;
use crate::extract::{SnippetExtractor, DEFAULT_HEADING_SELECTOR};
use crate::fetch::{fetch_page, Fetcher};
use crate::observability::SpanTimer;
use crate::topics::{Topic, TopicRegistry};

/// One page load, awaited by every topic on that page.
type PageLoad = Shared<BoxFuture<'static, Result<Arc<str>, Arc<DocSearchError>>>>;

struct Inner {
    registry: TopicRegistry,
    cache: Arc<PageCache>,
    fetcher: Arc<dyn Fetcher>,
    extractor: SnippetExtractor,
    unavailable_snippet: String,
}

/// Searches every registered topic for a query.
///
/// Cloning is cheap and clones share the page cache.
#[derive(Clone)]
pub struct DocSearch {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for DocSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocSearch")
            .field("topics", &self.inner.registry.len())
            .field("cached_pages", &self.inner.cache.len())
            .finish()
    }
}

impl DocSearch {
    /// Starts building a search over `registry` using `fetcher`.
    #[must_use]
    pub fn builder(registry: TopicRegistry, fetcher: Arc<dyn Fetcher>) -> DocSearchBuilder {
        DocSearchBuilder::new(registry, fetcher)
    }

    /// The topics searched.
    #[must_use]
    pub fn registry(&self) -> &TopicRegistry {
        &self.inner.registry
    }

    /// The page cache shared by this search and its clones.
    #[must_use]
    pub fn cache(&self) -> &Arc<PageCache> {
        &self.inner.cache
    }

    /// Searches all topics for `raw_query`.
    ///
    /// Blank input returns no results without fetching anything. Otherwise
    /// every topic is resolved concurrently and the matches are returned in
    /// registry order. Page failures never fail the search; they degrade to
    /// name-only matching for the affected topic.
    pub async fn search(&self, raw_query: &str) -> Vec<SearchResult> {
        let Some(query) = Query::parse(raw_query) else {
            debug!("Empty query, skipping search");
            return Vec::new();
        };

        let search_id = Uuid::new_v4();
        let timer = SpanTimer::start("search");

        // Topics on the same page await one load, so a failing page is
        // requested once per search.
        let mut pages: HashMap<&str, PageLoad> = HashMap::new();
        let mut tasks = Vec::with_capacity(self.inner.registry.len());
        for topic in &self.inner.registry {
            let page = pages
                .entry(topic.base_url())
                .or_insert_with(|| self.inner.load_page(topic.base_url()))
                .clone();
            let inner = Arc::clone(&self.inner);
            let topic = topic.clone();
            let query = query.clone();
            tasks.push(tokio::spawn(async move {
                inner.resolve_topic(topic, &query, page).await
            }));
        }

        let settled = join_all(tasks).await;
        let results = match settled.into_iter().collect::<Result<Vec<_>, _>>() {
            Ok(per_topic) => per_topic.into_iter().flatten().collect(),
            Err(e) => {
                error!(%search_id, query = %query, error = %e, "Error in search");
                Vec::new()
            }
        };

        info!(
            %search_id,
            query = %query,
            results = results.len(),
            cached_pages = self.inner.cache.len(),
            duration_ms = timer.finish(),
            "Search completed"
        );
        results
    }

    /// Fetches every page not yet cached, so later searches need no network.
    ///
    /// Returns the number of pages that are cached afterwards.
    pub async fn warm_cache(&self) -> usize {
        let pages = self.inner.registry.base_urls();
        let fetches = pages.iter().map(|page| self.inner.content(page));
        for (page, outcome) in pages.iter().zip(join_all(fetches).await) {
            if let Err(e) = outcome {
                warn!(url = *page, error = %e, "Error warming page cache");
            }
        }
        self.inner.cache.len()
    }
}

impl Inner {
    fn load_page(self: &Arc<Self>, base_url: &str) -> PageLoad {
        let inner = Arc::clone(self);
        let base_url = base_url.to_string();
        async move {
            inner.content(&base_url).await.map_err(|e| {
                warn!(url = %base_url, error = %e, "Error fetching page");
                Arc::new(e)
            })
        }
        .boxed()
        .shared()
    }

    async fn resolve_topic(&self, topic: Topic, query: &Query, page: PageLoad) -> Option<SearchResult> {
        match page.await {
            Ok(markup) => match_topic(topic, &markup, query, &self.extractor),
            Err(_) => match_unavailable(topic, query, &self.unavailable_snippet),
        }
    }

    async fn content(&self, base_url: &str) -> Result<Arc<str>, DocSearchError> {
        if let Some(markup) = self.cache.get(base_url) {
            debug!(url = base_url, "Page cache hit");
            return Ok(markup);
        }
        self.cache
            .get_or_fetch(base_url, || fetch_page(self.fetcher.as_ref(), base_url))
            .await
    }
}

/// Builder for [`DocSearch`].
pub struct DocSearchBuilder {
    registry: TopicRegistry,
    fetcher: Arc<dyn Fetcher>,
    cache: Option<Arc<PageCache>>,
    heading_selector: String,
    unavailable_snippet: String,
}

impl DocSearchBuilder {
    /// Creates a builder with default settings.
    #[must_use]
    pub fn new(registry: TopicRegistry, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            registry,
            fetcher,
            cache: None,
            heading_selector: DEFAULT_HEADING_SELECTOR.to_string(),
            unavailable_snippet: UNAVAILABLE_SNIPPET.to_string(),
        }
    }

    /// Applies the search-related settings of a site configuration.
    #[must_use]
    pub fn config(mut self, config: &DocSearchConfig) -> Self {
        self.heading_selector = config.heading_selector.clone();
        self.unavailable_snippet = config.unavailable_snippet.clone();
        self
    }

    /// Uses an existing cache instead of a fresh one.
    #[must_use]
    pub fn cache(mut self, cache: Arc<PageCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Sets the heading selector used for snippets.
    #[must_use]
    pub fn heading_selector(mut self, selector: impl Into<String>) -> Self {
        self.heading_selector = selector.into();
        self
    }

    /// Sets the snippet for name-only matches on unavailable pages.
    #[must_use]
    pub fn unavailable_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.unavailable_snippet = snippet.into();
        self
    }

    /// Builds the search.
    pub fn build(self) -> Result<DocSearch, DocSearchError> {
        let extractor = SnippetExtractor::new(&self.heading_selector)?;
        Ok(DocSearch {
            inner: Arc::new(Inner {
                registry: self.registry,
                cache: self.cache.unwrap_or_default(),
                fetcher: self.fetcher,
                extractor,
                unavailable_snippet: self.unavailable_snippet,
            }),
        })
    }
}
