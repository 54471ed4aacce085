//! # Docsearch
//!
//! Client-side search for a static documentation site.
//!
//! A fixed registry of topics, each a link to a page, is searched for a
//! query. Pages are fetched on first use and cached for the life of the
//! search, so repeated queries cost no network at all. A match on a heading
//! yields a snippet and an anchor to jump to; a page that cannot be loaded
//! still matches by topic name.
//!
//! - **Topics**: the searchable registry, ordered as displayed
//! - **Cache**: write-once page store with in-flight fetch sharing
//! - **Extraction**: heading, snippet and anchor from raw page markup
//! - **Sessions**: debounced input, stale-result discarding, overlay markup
//! - **Sidebar**: table-of-contents loading and submenu toggling
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use docsearch::prelude::*;
//!
//! let config = DocSearchConfig::default();
//! let fetcher = Arc::new(HttpFetcher::from_config(&config)?);
//! let search = DocSearch::builder(TopicRegistry::default(), fetcher)
//!     .config(&config)
//!     .build()?;
//!
//! for result in search.search("sandbox").await {
//!     println!("{} -> {}", result.title, result.href());
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod cache;
pub mod config;
pub mod debounce;
pub mod errors;
pub mod extract;
pub mod fetch;
pub mod observability;
pub mod presenter;
pub mod search;
pub mod sidebar;
pub mod testing;
pub mod topics;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::cache::PageCache;
    pub use crate::config::{DocSearchConfig, FetchConfig, UNAVAILABLE_SNIPPET};
    pub use crate::errors::DocSearchError;
    pub use crate::extract::{Snippet, SnippetExtractor};
    pub use crate::fetch::{fetch_page, DirectoryFetcher, FetchResult, Fetcher};
    #[cfg(feature = "http")]
    pub use crate::fetch::HttpFetcher;
    pub use crate::observability::{init_tracing, LogFormat, SpanTimer};
    pub use crate::presenter::render_overlay;
    pub use crate::search::{DocSearch, Query, ResultView, SearchResult, SearchSession};
    pub use crate::sidebar::{Sidebar, SidebarLoader, SubmenuState, TocEntry};
    pub use crate::topics::{Topic, TopicRegistry};
    pub use std::sync::Arc;
}
