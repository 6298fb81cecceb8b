//! Wires the two controllers to the CLI commands.
//!
//! # Design
//! `App` owns one `SearchController` and one `FavoritesController`, both
//! built by the caller (the binary injects the HTTP search and the redb
//! store; tests inject the mock server and an in-memory store). Each command
//! drives the controllers the way a screen would and returns the rendered
//! text.

use anyhow::bail;
use bookshelf_core::{BookSearch, FavoritesController, FavoritesStore, SearchController, SearchState};

use crate::screens::{render_favorites_screen, render_search_screen};

pub struct App<S, F> {
    search: SearchController<S>,
    favorites: FavoritesController<F>,
}

impl<S, F> App<S, F>
where
    S: BookSearch,
    F: FavoritesStore,
{
    pub fn new(search: S, store: F) -> Self {
        Self {
            search: SearchController::new(search),
            favorites: FavoritesController::new(store),
        }
    }

    /// Register a listener on the search screen's state.
    pub fn on_search_change(&mut self, listener: impl FnMut(&SearchState) + 'static) {
        self.search.subscribe(listener);
    }

    pub fn search_state(&self) -> &SearchState {
        self.search.state()
    }

    /// Run `query` to completion, then star the 1-based result rows in `save`.
    ///
    /// Returns the search screen, followed by the favorites screen when
    /// anything was saved.
    pub fn search(&mut self, query: &str, save: &[usize]) -> anyhow::Result<String> {
        self.search.set_query(query);
        self.search.submit_query();
        while self.search.in_flight() > 0 {
            if !self.search.wait_for_completion() {
                break;
            }
        }

        let mut out = render_search_screen(self.search.state());
        if save.is_empty() {
            return Ok(out);
        }

        // Resolve every row before writing anything.
        let books = &self.search.state().books;
        let mut picked = Vec::with_capacity(save.len());
        for &row in save {
            let Some(book) = row.checked_sub(1).and_then(|i| books.get(i)) else {
                bail!("no result {row} to save; the search returned {} books", books.len());
            };
            picked.push(book);
        }
        for book in picked {
            self.favorites.add(book);
        }
        self.favorites.refresh();
        out.push('\n');
        out.push_str(&render_favorites_screen(self.favorites.favorites()));
        Ok(out)
    }

    pub fn list_favorites(&mut self) -> String {
        self.favorites.refresh();
        render_favorites_screen(self.favorites.favorites())
    }

    /// Delete the favorite stored under `key` and return the updated screen.
    pub fn remove_favorite(&mut self, key: u64) -> anyhow::Result<String> {
        self.favorites.refresh();
        let Some(record) = self
            .favorites
            .favorites()
            .iter()
            .find(|record| record.key == key)
            .cloned()
        else {
            bail!("no favorite with key {key}");
        };
        self.favorites.remove(&record);
        Ok(render_favorites_screen(self.favorites.favorites()))
    }
}
