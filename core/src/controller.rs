//! State holders that sit between the data sources and a presentation layer.
//!
//! # Design
//! Both controllers are owned by a single presentation thread and notify
//! registered listeners after every state change, so a UI layer can render
//! without depending on a particular framework.
//!
//! `SearchController` never mutates its state from the search thread. The
//! completion handed to `BookSearch::search` only posts the outcome into a
//! channel; the owner applies outcomes with `process_completions` or
//! `wait_for_completion`. In-flight searches are not cancelled, so when two
//! overlap the outcome applied last wins.
//!
//! `FavoritesController` logs storage failures and carries on. Callers get
//! no error back.

use std::sync::mpsc::{self, Receiver, Sender};

use crate::search::{BookSearch, SearchOutcome};
use crate::store::FavoritesStore;
use crate::types::{Book, FavoriteRecord};

/// Where a search controller is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchPhase {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed,
}

/// Snapshot of everything the search screen renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    pub query: String,
    pub phase: SearchPhase,
    pub books: Vec<Book>,
    pub error_message: Option<String>,
}

impl SearchState {
    pub fn is_loading(&self) -> bool {
        self.phase == SearchPhase::Loading
    }
}

type SearchListener = Box<dyn FnMut(&SearchState)>;
type FavoritesListener = Box<dyn FnMut(&[FavoriteRecord])>;

/// Drives searches and holds their results.
pub struct SearchController<S> {
    search: S,
    state: SearchState,
    listeners: Vec<SearchListener>,
    outcomes_tx: Sender<SearchOutcome>,
    outcomes_rx: Receiver<SearchOutcome>,
    in_flight: usize,
}

impl<S> SearchController<S>
where
    S: BookSearch,
{
    pub fn new(search: S) -> Self {
        let (outcomes_tx, outcomes_rx) = mpsc::channel();
        Self {
            search,
            state: SearchState::default(),
            listeners: Vec::new(),
            outcomes_tx,
            outcomes_rx,
            in_flight: 0,
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// Number of submitted searches whose outcome has not been applied yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Register a listener called with the new state after every change.
    pub fn subscribe(&mut self, listener: impl FnMut(&SearchState) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.state.query = query.into();
        self.notify();
    }

    /// Start a search for the current query. Does nothing if it is empty.
    pub fn submit_query(&mut self) {
        if self.state.query.is_empty() {
            return;
        }
        self.state.phase = SearchPhase::Loading;
        self.state.error_message = None;
        self.in_flight += 1;
        tracing::debug!(query = %self.state.query, "submitting search");
        self.notify();

        let outcomes = self.outcomes_tx.clone();
        self.search.search(
            &self.state.query,
            Box::new(move |outcome| {
                // The controller may be gone by the time a search finishes.
                let _ = outcomes.send(outcome);
            }),
        );
    }

    /// Apply every outcome that has arrived, without blocking.
    ///
    /// Returns how many outcomes were applied.
    pub fn process_completions(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(outcome) = self.outcomes_rx.try_recv() {
            self.apply(outcome);
            applied += 1;
        }
        applied
    }

    /// Block until the next outcome arrives and apply it.
    ///
    /// Returns `false` immediately when no search is in flight.
    pub fn wait_for_completion(&mut self) -> bool {
        if self.in_flight == 0 {
            return false;
        }
        match self.outcomes_rx.recv() {
            Ok(outcome) => {
                self.apply(outcome);
                true
            }
            Err(_) => false,
        }
    }

    fn apply(&mut self, outcome: SearchOutcome) {
        self.in_flight = self.in_flight.saturating_sub(1);
        match outcome {
            Ok(books) => {
                tracing::debug!(count = books.len(), "search loaded");
                self.state.phase = SearchPhase::Loaded;
                self.state.books = books;
            }
            Err(err) => {
                tracing::warn!(error = %err, "search failed");
                self.state.phase = SearchPhase::Failed;
                self.state.error_message = Some(err.to_string());
            }
        }
        self.notify();
    }

    fn notify(&mut self) {
        for listener in &mut self.listeners {
            listener(&self.state);
        }
    }
}

/// Holds the favorites list shown on the favorites screen.
pub struct FavoritesController<F> {
    store: F,
    favorites: Vec<FavoriteRecord>,
    listeners: Vec<FavoritesListener>,
}

impl<F> FavoritesController<F>
where
    F: FavoritesStore,
{
    pub fn new(store: F) -> Self {
        Self {
            store,
            favorites: Vec::new(),
            listeners: Vec::new(),
        }
    }

    pub fn favorites(&self) -> &[FavoriteRecord] {
        &self.favorites
    }

    pub fn store(&self) -> &F {
        &self.store
    }

    /// Register a listener called with the held list after every change.
    pub fn subscribe(&mut self, listener: impl FnMut(&[FavoriteRecord]) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Replace the held list with the store's contents.
    ///
    /// On a read failure the previous list is kept.
    pub fn refresh(&mut self) {
        match self.store.list() {
            Ok(records) => {
                self.favorites = records;
                self.notify();
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to fetch favorites");
            }
        }
    }

    /// Save `book` as a new favorite.
    ///
    /// The held list is not touched; call `refresh` to see the new record.
    pub fn add(&mut self, book: &Book) {
        if let Err(err) = self.store.add(book) {
            tracing::error!(error = %err, id = %book.id, "failed to save favorite");
        }
    }

    /// Delete `record` from the store and drop it from the held list.
    pub fn remove(&mut self, record: &FavoriteRecord) {
        if let Err(err) = self.store.remove(record) {
            tracing::error!(error = %err, key = record.key, "failed to delete favorite");
        }
        self.favorites.retain(|held| held.key != record.key);
        self.notify();
    }

    fn notify(&mut self) {
        for listener in &mut self.listeners {
            listener(&self.favorites);
        }
    }
}
