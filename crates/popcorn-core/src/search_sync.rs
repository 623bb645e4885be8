use popcorn_models::SearchResult;
use popcorn_sources::{CatalogSource, FetchError};
use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, warn};

/// What the search box renders
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    /// Query this state belongs to
    pub query: String,
    pub results: Vec<SearchResult>,
    pub loading: bool,
    pub error: Option<FetchError>,
}

impl SearchState {
    pub fn result_count(&self) -> usize {
        self.results.len()
    }

    /// User-visible error text, if any
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(|e| e.to_string())
    }
}

/// Keeps search results in step with a changing query.
///
/// Every accepted query change starts one request with its own cancellation token and
/// cancels the previous one first. A cancelled request never writes state, so a slow
/// stale response cannot overwrite a newer one. Dropping the `SearchSync` cancels
/// whatever is in flight and clears the loading flag.
///
/// Must be driven from inside a tokio runtime.
pub struct SearchSync {
    source: Arc<dyn CatalogSource>,
    min_query_len: usize,
    state_tx: Arc<watch::Sender<SearchState>>,
    inflight: Option<DropGuard>,
}

impl SearchSync {
    pub fn new(source: Arc<dyn CatalogSource>, min_query_len: usize) -> Self {
        let (state_tx, _) = watch::channel(SearchState::default());
        Self {
            source,
            min_query_len,
            state_tx: Arc::new(state_tx),
            inflight: None,
        }
    }

    pub fn state(&self) -> SearchState {
        self.state_tx.borrow().clone()
    }

    /// Receiver that sees every state published from now on
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state_tx.subscribe()
    }

    /// Re-evaluate for a new query. Setting the current query again does nothing.
    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if self.state_tx.borrow().query == query {
            return;
        }

        // Dropping the guard cancels the previous request
        self.inflight = None;

        if query.chars().count() < self.min_query_len {
            debug!(query = %query, "Query too short, clearing results");
            self.state_tx.send_modify(|state| {
                state.query = query;
                state.results.clear();
                state.loading = false;
                state.error = None;
            });
            return;
        }

        self.state_tx.send_modify(|state| {
            state.query = query.clone();
            state.loading = true;
            state.error = None;
        });

        let token = CancellationToken::new();
        let task_token = token.clone();
        let source = Arc::clone(&self.source);
        let state_tx = Arc::clone(&self.state_tx);

        tokio::spawn(async move {
            let outcome = tokio::select! {
                _ = task_token.cancelled() => Err(FetchError::Cancelled),
                result = source.search(&query) => result,
            };
            apply_outcome(&state_tx, &task_token, &query, outcome);
        });

        self.inflight = Some(token.drop_guard());
    }
}

impl Drop for SearchSync {
    fn drop(&mut self) {
        self.inflight = None;
        self.state_tx.send_if_modified(|state| {
            if !state.loading {
                return false;
            }
            debug!(query = %state.query, "Search torn down while loading");
            state.loading = false;
            true
        });
    }
}

fn apply_outcome(
    state_tx: &watch::Sender<SearchState>,
    token: &CancellationToken,
    query: &str,
    outcome: Result<Vec<SearchResult>, FetchError>,
) {
    state_tx.send_if_modified(|state| {
        // Checked under the channel lock: a newer query cancels before it publishes
        if token.is_cancelled() {
            debug!(query = %query, "Search superseded, dropping response");
            return false;
        }

        match outcome {
            Ok(results) => {
                debug!(query = %query, results = results.len(), "Search completed");
                state.results = results;
                state.error = None;
            }
            Err(err) if err.is_cancelled() => return false,
            Err(err) => {
                warn!(
                    operation = "search",
                    query = %query,
                    error = %err,
                    detail = %err.detail(),
                    "Search failed"
                );
                // Previous results stay visible under the error
                state.error = Some(err);
            }
        }
        state.loading = false;
        true
    });
}
