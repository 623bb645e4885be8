use crate::collection::WatchedCollection;
use crate::error::DetailError;
use crate::keys::{KeyEvents, KeySubscription};
use crate::label::{DisplayLabel, TitleGuard};
use popcorn_models::{DetailRecord, WatchedEntry};
use popcorn_sources::{CatalogSource, FetchError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, info, warn};

const DEFAULT_CANCEL_KEY: &str = "Escape";
const DEFAULT_TITLE: &str = "usePopcorn";

/// What the detail pane renders
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailState {
    /// Selected identifier; None means no detail view
    pub selected: Option<String>,
    pub record: DetailRecord,
    pub loading: bool,
    pub error: Option<FetchError>,
    /// 0 until the user rates the selection; reset on every selection change
    pub user_rating: f64,
}

impl DetailState {
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(|e| e.to_string())
    }
}

/// Resources owned by the current selection.
///
/// Lock order: `session`, then the state channel, then `title`.
#[derive(Default)]
struct Session {
    inflight: Option<DropGuard>,
    cancel_listener: Option<KeySubscription>,
}

struct Shared {
    source: Arc<dyn CatalogSource>,
    label: Arc<dyn DisplayLabel>,
    keys: KeyEvents,
    default_title: String,
    cancel_key: Mutex<String>,
    state_tx: watch::Sender<DetailState>,
    session: Mutex<Session>,
    title: Mutex<Option<TitleGuard>>,
}

/// Loads the full record for the selected title.
///
/// Same cancel-on-change discipline as `SearchSync`. While a title is selected the
/// display label shows its name and the cancel key closes the view; both are
/// released on deselect, on a new selection and on drop.
///
/// Must be driven from inside a tokio runtime.
pub struct DetailSync {
    shared: Arc<Shared>,
}

impl DetailSync {
    pub fn new(source: Arc<dyn CatalogSource>, label: Arc<dyn DisplayLabel>, keys: KeyEvents) -> Self {
        Self::with_options(source, label, keys, DEFAULT_CANCEL_KEY, DEFAULT_TITLE)
    }

    pub fn with_options(
        source: Arc<dyn CatalogSource>,
        label: Arc<dyn DisplayLabel>,
        keys: KeyEvents,
        cancel_key: &str,
        default_title: &str,
    ) -> Self {
        let (state_tx, _) = watch::channel(DetailState::default());
        Self {
            shared: Arc::new(Shared {
                source,
                label,
                keys,
                default_title: default_title.to_string(),
                cancel_key: Mutex::new(cancel_key.to_string()),
                state_tx,
                session: Mutex::new(Session::default()),
                title: Mutex::new(None),
            }),
        }
    }

    pub fn state(&self) -> DetailState {
        self.shared.state_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DetailState> {
        self.shared.state_tx.subscribe()
    }

    pub fn selected(&self) -> Option<String> {
        self.shared.state_tx.borrow().selected.clone()
    }

    /// Change the selection. An empty id is the same as None.
    pub fn select(&self, imdb_id: Option<String>) {
        Shared::select(&self.shared, imdb_id);
    }

    /// Select `imdb_id`, or deselect when it is already selected
    pub fn toggle(&self, imdb_id: &str) {
        if self.selected().as_deref() == Some(imdb_id) {
            self.deselect();
        } else {
            self.select(Some(imdb_id.to_string()));
        }
    }

    pub fn deselect(&self) {
        self.select(None);
    }

    pub fn user_rating(&self) -> f64 {
        self.shared.state_tx.borrow().user_rating
    }

    /// Record the user's rating for the current selection
    pub fn set_user_rating(&self, rating: f64) -> Result<(), DetailError> {
        if !rating.is_finite() || !(0.0..=10.0).contains(&rating) {
            return Err(DetailError::InvalidRating(rating));
        }
        let mut result = Ok(());
        self.shared.state_tx.send_if_modified(|state| {
            if state.selected.is_none() {
                result = Err(DetailError::NoSelection);
                return false;
            }
            state.user_rating = rating;
            true
        });
        result
    }

    /// The stored entry for the current selection, if the user already rated it
    pub fn watched_entry<'a>(&self, watched: &'a WatchedCollection) -> Option<&'a WatchedEntry> {
        self.selected().and_then(|id| watched.get(&id))
    }

    /// Save the loaded record with the user's rating, then close the detail view.
    ///
    /// Requires a rating above 0. Adding a title that is already in the list changes
    /// nothing and returns `Ok(false)`. The view is closed even if the write fails.
    pub fn add_to_watched(&self, watched: &mut WatchedCollection) -> Result<bool, DetailError> {
        let state = self.state();
        if state.selected.is_none() {
            return Err(DetailError::NoSelection);
        }
        if state.user_rating <= 0.0 {
            return Err(DetailError::RatingRequired);
        }
        let entry = WatchedEntry::from_detail(&state.record, state.user_rating)
            .ok_or(DetailError::NotLoaded)?;

        let imdb_id = entry.imdb_id.clone();
        let result = watched.add(entry);
        self.deselect();

        let added = result?;
        if added {
            info!(imdb_id = %imdb_id, rating = state.user_rating, "Added to watched list");
        } else {
            debug!(imdb_id = %imdb_id, "Already in watched list");
        }
        Ok(added)
    }

    /// Rebind the key that closes the detail view
    pub fn set_cancel_key(&self, key: &str) {
        Shared::set_cancel_key(&self.shared, key);
    }

    pub fn cancel_key(&self) -> String {
        lock(&self.shared.cancel_key).clone()
    }
}

impl Drop for DetailSync {
    fn drop(&mut self) {
        Shared::select(&self.shared, None);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Shared {
    fn select(this: &Arc<Self>, imdb_id: Option<String>) {
        let imdb_id = imdb_id.filter(|id| !id.trim().is_empty());
        let mut session = lock(&this.session);

        if imdb_id.is_some() && this.state_tx.borrow().selected == imdb_id {
            return;
        }

        // Dropping the guard cancels the previous fetch
        session.inflight = None;

        let Some(imdb_id) = imdb_id else {
            session.cancel_listener = None;
            this.state_tx.send_modify(|state| {
                *state = DetailState::default();
                lock(&this.title).take();
            });
            debug!("Detail view closed");
            return;
        };

        this.state_tx.send_modify(|state| {
            *state = DetailState {
                selected: Some(imdb_id.clone()),
                loading: true,
                ..DetailState::default()
            };
            lock(&this.title).take();
        });

        if session.cancel_listener.is_none() {
            session.cancel_listener = Some(Self::listen_for_cancel(this));
        }

        let token = CancellationToken::new();
        let task_token = token.clone();
        let shared = Arc::clone(this);
        tokio::spawn(async move {
            let outcome = tokio::select! {
                _ = task_token.cancelled() => Err(FetchError::Cancelled),
                result = shared.source.detail(&imdb_id) => result,
            };
            shared.apply_outcome(&task_token, &imdb_id, outcome);
        });
        session.inflight = Some(token.drop_guard());
    }

    fn listen_for_cancel(this: &Arc<Self>) -> KeySubscription {
        let key = lock(&this.cancel_key).clone();
        let weak = Arc::downgrade(this);
        this.keys.subscribe(&key, move || {
            if let Some(shared) = weak.upgrade() {
                debug!("Cancel key pressed, closing detail view");
                Shared::select(&shared, None);
            }
        })
    }

    fn set_cancel_key(this: &Arc<Self>, key: &str) {
        let mut session = lock(&this.session);
        *lock(&this.cancel_key) = key.to_string();
        if session.cancel_listener.is_some() {
            session.cancel_listener = None;
            session.cancel_listener = Some(Self::listen_for_cancel(this));
        }
    }

    fn apply_outcome(&self, token: &CancellationToken, imdb_id: &str, outcome: Result<DetailRecord, FetchError>) {
        self.state_tx.send_if_modified(|state| {
            if token.is_cancelled() || state.selected.as_deref() != Some(imdb_id) {
                debug!(imdb_id = %imdb_id, "Detail fetch superseded, dropping response");
                return false;
            }

            match outcome {
                Ok(record) => {
                    let mut title = lock(&self.title);
                    title.take();
                    if let Some(name) = record.display_title() {
                        *title = Some(TitleGuard::acquire(
                            Arc::clone(&self.label),
                            name,
                            &self.default_title,
                        ));
                    }
                    debug!(imdb_id = %imdb_id, "Detail loaded");
                    state.record = record;
                    state.error = None;
                }
                Err(err) if err.is_cancelled() => return false,
                Err(err) => {
                    warn!(
                        operation = "detail",
                        imdb_id = %imdb_id,
                        error = %err,
                        detail = %err.detail(),
                        "Detail fetch failed"
                    );
                    state.error = Some(err);
                }
            }
            state.loading = false;
            true
        });
    }
}
