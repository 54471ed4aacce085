//! The navigation sidebar: loading, table of contents, submenu state.
//!
//! Pages share one sidebar fragment that the host injects into a placeholder
//! after load. Clicking a table-of-contents link that owns a nested list
//! shows or hides that list.

use scraper::{ElementRef, Html};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, error};

use crate::config::DocSearchConfig;
use crate::errors::DocSearchError;
use crate::extract::parse_selector;
use crate::fetch::{fetch_page, Fetcher};

const TOC_ROOT_SELECTOR: &str = ".sidebar ul";
const SEARCH_INPUT_SELECTOR: &str = "#search";

/// One link in the table of contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    /// Trimmed link text.
    pub label: String,
    /// The link's `href`; empty if it has none.
    pub href: String,
    /// Entries of the list directly following the link.
    pub children: Vec<TocEntry>,
}

impl TocEntry {
    /// Whether clicking this entry toggles a submenu.
    #[must_use]
    pub fn has_submenu(&self) -> bool {
        !self.children.is_empty()
    }
}

/// A parsed sidebar fragment.
#[derive(Debug, Clone)]
pub struct Sidebar {
    markup: String,
    entries: Vec<TocEntry>,
    has_search_input: bool,
}

impl Sidebar {
    /// Parses a sidebar fragment.
    ///
    /// The table of contents is the first list inside `.sidebar`; a fragment
    /// without one yields no entries.
    pub fn parse(markup: impl Into<String>) -> Result<Self, DocSearchError> {
        let markup = markup.into();
        let toc_root = parse_selector(TOC_ROOT_SELECTOR)?;
        let search_input = parse_selector(SEARCH_INPUT_SELECTOR)?;

        let fragment = Html::parse_fragment(&markup);
        let entries = fragment
            .select(&toc_root)
            .next()
            .map(parse_list)
            .unwrap_or_default();
        let has_search_input = fragment.select(&search_input).next().is_some();

        Ok(Self {
            markup,
            entries,
            has_search_input,
        })
    }

    /// The raw fragment, for injection into the page.
    #[must_use]
    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Top-level table-of-contents entries.
    #[must_use]
    pub fn entries(&self) -> &[TocEntry] {
        &self.entries
    }

    /// Whether the fragment carries the `#search` input.
    #[must_use]
    pub fn has_search_input(&self) -> bool {
        self.has_search_input
    }

    /// Finds the first entry, at any depth, linking to `href`.
    #[must_use]
    pub fn find(&self, href: &str) -> Option<&TocEntry> {
        find_in(&self.entries, href)
    }
}

fn find_in<'a>(entries: &'a [TocEntry], href: &str) -> Option<&'a TocEntry> {
    entries.iter().find_map(|entry| {
        if entry.href == href {
            Some(entry)
        } else {
            find_in(&entry.children, href)
        }
    })
}

fn child_elements<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    element.children().filter_map(ElementRef::wrap)
}

fn parse_list(list: ElementRef<'_>) -> Vec<TocEntry> {
    child_elements(list)
        .filter(|child| child.value().name() == "li")
        .filter_map(|item| {
            let link = child_elements(item).find(|child| child.value().name() == "a")?;
            let children = link
                .next_siblings()
                .find_map(ElementRef::wrap)
                .filter(|sibling| sibling.value().name() == "ul")
                .map(parse_list)
                .unwrap_or_default();

            Some(TocEntry {
                label: link.text().collect::<String>().trim().to_string(),
                href: link.value().attr("href").unwrap_or_default().to_string(),
                children,
            })
        })
        .collect()
}

/// Loads the sidebar fragment through a [`Fetcher`].
pub struct SidebarLoader {
    fetcher: Arc<dyn Fetcher>,
    url: String,
}

impl SidebarLoader {
    /// Creates a loader fetching `url`.
    #[must_use]
    pub fn new(fetcher: Arc<dyn Fetcher>, url: impl Into<String>) -> Self {
        Self {
            fetcher,
            url: url.into(),
        }
    }

    /// Creates a loader for the configured sidebar URL.
    #[must_use]
    pub fn from_config(fetcher: Arc<dyn Fetcher>, config: &DocSearchConfig) -> Self {
        Self::new(fetcher, config.sidebar_url.clone())
    }

    /// The URL this loader fetches.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetches and parses the sidebar.
    ///
    /// Failures are logged and returned; the host leaves its placeholder
    /// empty in that case.
    pub async fn load(&self) -> Result<Sidebar, DocSearchError> {
        let loaded = fetch_page(self.fetcher.as_ref(), &self.url)
            .await
            .and_then(Sidebar::parse);

        match loaded {
            Ok(sidebar) => {
                debug!(url = %self.url, entries = sidebar.entries().len(), "Loaded sidebar");
                Ok(sidebar)
            }
            Err(e) => {
                error!(url = %self.url, error = %e, "Error loading sidebar");
                Err(e)
            }
        }
    }
}

/// Which submenus are currently shown. All start hidden.
#[derive(Debug, Clone, Default)]
pub struct SubmenuState {
    expanded: HashSet<String>,
}

impl SubmenuState {
    /// Creates a state with every submenu hidden.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles a click on the entry linking to `href`.
    ///
    /// Returns the submenu's new visibility, or `None` if the entry does not
    /// exist or owns no submenu.
    pub fn toggle(&mut self, sidebar: &Sidebar, href: &str) -> Option<bool> {
        let entry = sidebar.find(href).filter(|entry| entry.has_submenu())?;
        if self.expanded.remove(&entry.href) {
            Some(false)
        } else {
            self.expanded.insert(entry.href.clone());
            Some(true)
        }
    }

    /// Whether the submenu under `href` is shown.
    #[must_use]
    pub fn is_expanded(&self, href: &str) -> bool {
        self.expanded.contains(href)
    }
}
