//! Application core for searching a remote book catalog and keeping
//! favorites on the device.
//!
//! # Overview
//! `BooksClient` builds search requests and parses responses without
//! touching the network (host-does-IO pattern); a `Transport` performs the
//! round-trip and `HttpBookSearch` runs it off the caller's thread. Saved
//! books live in a redb-backed `FavoritesStore`. Two controllers,
//! `SearchController` and `FavoritesController`, hold the state a
//! presentation layer renders and notify subscribers when it changes.
//!
//! # Design
//! - `BooksClient` is stateless; it holds only `base_url`.
//! - Client and store are constructed once by the host and injected into the
//!   controllers; there are no globals.
//! - Search errors become a user-visible message. Storage errors are logged
//!   by the favorites controller and never surfaced.
//! - Types use owned `String` / `Vec` fields so they map cleanly onto the FFI
//!   crate.

pub mod client;
pub mod controller;
pub mod error;
pub mod http;
pub mod search;
pub mod store;
pub mod types;

pub use client::{BooksClient, DEFAULT_BASE_URL};
pub use controller::{FavoritesController, SearchController, SearchPhase, SearchState};
pub use error::{SearchError, StorageError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
pub use search::{BookSearch, HttpBookSearch, SearchCompletion, SearchOutcome};
pub use store::{FavoritesStore, RedbFavoritesStore};
pub use types::{Book, FavoriteRecord, UNKNOWN_PUBLISHER};
