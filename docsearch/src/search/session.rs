//! A search box session: debounced input in, rendered result views out.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

use super::{DocSearch, SearchResult};
use crate::debounce::debounce;
use crate::errors::DocSearchError;
use crate::presenter::render_overlay;

/// Results of one search, tagged with the generation that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    /// Increases by one for every search the session starts.
    pub generation: u64,
    /// The raw input that was searched.
    pub query: String,
    /// Matches in registry order.
    pub results: Vec<SearchResult>,
}

impl ResultView {
    /// Renders the result overlay markup.
    #[must_use]
    pub fn render(&self) -> String {
        render_overlay(&self.results)
    }

    /// Returns true if the search found nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[derive(Debug, Default)]
struct SessionState {
    generation: AtomicU64,
    in_flight: AtomicUsize,
}

/// Marks a search as running until dropped, including on panic.
struct SearchingGuard(Arc<SessionState>);

impl SearchingGuard {
    fn new(state: Arc<SessionState>) -> Self {
        state.in_flight.fetch_add(1, Ordering::SeqCst);
        Self(state)
    }
}

impl Drop for SearchingGuard {
    fn drop(&mut self) {
        self.0.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Drives searches from a stream of raw search-box values.
///
/// Input is debounced; each quiet period starts a search. Searches are never
/// cancelled, but a view from an older generation that finishes after a newer
/// search has started is discarded.
#[derive(Debug, Clone)]
pub struct SearchSession {
    input: mpsc::UnboundedSender<String>,
    state: Arc<SessionState>,
}

impl SearchSession {
    /// Starts a session on the current runtime.
    ///
    /// Returns the session handle and the receiver of result views.
    pub fn spawn(search: DocSearch, debounce_delay: Duration) -> (Self, mpsc::UnboundedReceiver<ResultView>) {
        let (input_tx, input_rx) = mpsc::unbounded_channel::<String>();
        let (view_tx, view_rx) = mpsc::unbounded_channel();
        let state = Arc::new(SessionState::default());

        let mut debounced = debounce(debounce_delay, input_rx);
        let session_state = Arc::clone(&state);
        tokio::spawn(async move {
            while let Some(raw) = debounced.recv().await {
                let generation = session_state.generation.fetch_add(1, Ordering::SeqCst) + 1;
                let guard = SearchingGuard::new(Arc::clone(&session_state));
                let search = search.clone();
                let view_tx = view_tx.clone();
                let state = Arc::clone(&session_state);

                tokio::spawn(async move {
                    let results = search.search(&raw).await;
                    drop(guard);

                    if generation < state.generation.load(Ordering::SeqCst) {
                        debug!(generation, query = %raw, "Discarding stale search results");
                        return;
                    }
                    let _ = view_tx.send(ResultView {
                        generation,
                        query: raw,
                        results,
                    });
                });
            }
        });

        (
            Self {
                input: input_tx,
                state,
            },
            view_rx,
        )
    }

    /// Feeds the current search-box value.
    pub fn input(&self, raw: impl Into<String>) -> Result<(), DocSearchError> {
        self.input
            .send(raw.into())
            .map_err(|_| DocSearchError::Internal("search session has stopped".to_string()))
    }

    /// Whether any search is still running.
    #[must_use]
    pub fn is_searching(&self) -> bool {
        self.state.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Number of searches started so far.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.state.generation.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingFetcher;
    use crate::topics::{Topic, TopicRegistry};

    fn session(fetcher: RecordingFetcher, delay_ms: u64) -> (SearchSession, mpsc::UnboundedReceiver<ResultView>, Arc<RecordingFetcher>) {
        let fetcher = Arc::new(fetcher);
        let registry = TopicRegistry::new(vec![
            Topic::new("Boot Agent", "boot-agent.html"),
            Topic::new("Sandbox Config", "sandbox-config.html"),
        ]);
        let search = DocSearch::builder(registry, fetcher.clone()).build().unwrap();
        let (session, views) = SearchSession::spawn(search, Duration::from_millis(delay_ms));
        (session, views, fetcher)
    }

    #[tokio::test]
    async fn test_typing_burst_runs_one_search() {
        let fetcher = RecordingFetcher::new()
            .with_page("boot-agent.html", r#"<h2 id="start">Starting the agent</h2><p>Run it.</p>"#)
            .with_page("sandbox-config.html", "<p>nothing</p>");
        let (session, mut views, fetcher) = session(fetcher, 30);

        for raw in ["a", "ag", "age", "agent"] {
            session.input(raw).unwrap();
        }

        let view = views.recv().await.unwrap();
        assert_eq!(view.generation, 1);
        assert_eq!(view.query, "agent");
        assert_eq!(view.results.len(), 1);
        assert_eq!(view.results[0].id, "start");
        assert_eq!(session.generation(), 1);
        assert!(!session.is_searching());
        assert_eq!(fetcher.total_calls(), 2);
    }

    #[tokio::test]
    async fn test_blank_input_yields_empty_view() {
        let (session, mut views, fetcher) = session(RecordingFetcher::new(), 5);

        session.input("   ").unwrap();
        let view = views.recv().await.unwrap();

        assert!(view.is_empty());
        assert!(view.render().contains("No results found."));
        assert_eq!(fetcher.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_stale_results_are_discarded() {
        let fetcher = RecordingFetcher::new()
            .with_page("boot-agent.html", "<p>boot</p>")
            .with_page("sandbox-config.html", "<p>sandbox</p>")
            .with_delay("boot-agent.html", Duration::from_millis(150));
        let (session, mut views, _fetcher) = session(fetcher, 5);

        // First search stalls on the slow page.
        session.input("boot").unwrap();
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(session.is_searching());

        // The second search reuses the in-flight fetch and finishes later or
        // together; either way only generation 2 is delivered.
        session.input("sandbox").unwrap();

        let view = views.recv().await.unwrap();
        assert_eq!(view.generation, 2);
        assert_eq!(view.query, "sandbox");
        assert_eq!(view.results[0].name, "Sandbox Config");
    }
}
