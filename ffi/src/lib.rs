//! C-ABI wrapper around `bookshelf-core`.
//!
//! # Overview
//! Exposes book search and the favorites store through `extern "C"`
//! functions so a mobile host (Swift, Kotlin/JNI) can build search requests,
//! execute them with its own HTTP stack, parse the responses, and manage
//! favorites without linking against Rust types directly.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Search keeps the host-does-IO split: `bookshelf_build_search` /
//!   `bookshelf_parse_search` mirror `BooksClient` 1:1.
//! - Favorites calls return raw store results, errors included. Whether to
//!   show storage failures to the user is the host's decision.
//! - A single `FfiBookshelfResult` envelope with `FfiDataTag` + `void* data`
//!   conveys success payloads and errors uniformly.
//! - The C caller owns all returned pointers and must call the matching
//!   `bookshelf_free_*` / `*_close` function to release them.

pub mod types;

use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use bookshelf_core::http::HttpResponse;
use bookshelf_core::{BooksClient, FavoritesStore, RedbFavoritesStore};

use types::*;

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a new `BooksClient` bound to `base_url`.
///
/// Returns null if `base_url` is null or if an internal panic occurs.
/// The caller must free the returned pointer with `bookshelf_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn bookshelf_client_new(base_url: *const c_char) -> *mut FfiBooksClient {
    catch_unwind(|| {
        if base_url.is_null() {
            return std::ptr::null_mut();
        }
        let client = BooksClient::new(read_c_str(base_url));
        Box::into_raw(Box::new(FfiBooksClient { inner: client }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `bookshelf_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn bookshelf_client_free(client: *mut FfiBooksClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// Build the HTTP request for a search.
///
/// Returns null if `client` or `query` is null, or if the URL is invalid.
/// The caller must free the returned pointer with `bookshelf_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn bookshelf_build_search(
    client: *const FfiBooksClient,
    query: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() || query.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        match client.inner.build_search(read_c_str(query)) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Convert an `FfiHttpResponse` to a core `HttpResponse`. A null body reads
/// as empty.
fn ffi_response_to_core(resp: &FfiHttpResponse) -> HttpResponse {
    HttpResponse {
        status: resp.status,
        headers: Vec::new(),
        body: read_c_str(resp.body).to_string(),
    }
}

/// Parse the HTTP response of a search.
///
/// Returns a result with `data_tag = BookList` on success.
#[unsafe(no_mangle)]
pub extern "C" fn bookshelf_parse_search(
    client: *const FfiBooksClient,
    response: *const FfiHttpResponse,
) -> *mut FfiBookshelfResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiBookshelfResult::null_arg("client");
        }
        if response.is_null() {
            return FfiBookshelfResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let resp = unsafe { &*response };
        match client.inner.parse_search(ffi_response_to_core(resp)) {
            Ok(books) => FfiBookshelfResult::ok_book_list(books),
            Err(e) => FfiBookshelfResult::from_search_error(e),
        }
    })
    .unwrap_or_else(|_| FfiBookshelfResult::panic("panic in bookshelf_parse_search"))
}

// ---------------------------------------------------------------------------
// Favorites store
// ---------------------------------------------------------------------------

/// Open (or create) the favorites database at `path`.
///
/// Returns null if `path` is null or the database cannot be opened.
/// The caller must release the store with `bookshelf_favorites_close`.
#[unsafe(no_mangle)]
pub extern "C" fn bookshelf_favorites_open(path: *const c_char) -> *mut FfiFavoritesStore {
    catch_unwind(AssertUnwindSafe(|| {
        if path.is_null() {
            tracing::warn!("null path passed to bookshelf_favorites_open");
            return std::ptr::null_mut();
        }
        let path = read_c_str(path);
        match RedbFavoritesStore::open(path) {
            Ok(store) => Box::into_raw(Box::new(FfiFavoritesStore { inner: store })),
            Err(e) => {
                tracing::warn!(error = %e, path, "failed to open favorites store");
                std::ptr::null_mut()
            }
        }
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Close a store opened by `bookshelf_favorites_open`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn bookshelf_favorites_close(store: *mut FfiFavoritesStore) {
    if !store.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { Box::from_raw(store) });
        }));
    }
}

/// Save `book` as a new favorite.
///
/// `book` is typically an item from a `bookshelf_parse_search` result; the
/// store copies what it needs. Returns `data_tag = Favorite` on success.
#[unsafe(no_mangle)]
pub extern "C" fn bookshelf_favorites_add(
    store: *const FfiFavoritesStore,
    book: *const FfiBook,
) -> *mut FfiBookshelfResult {
    catch_unwind(AssertUnwindSafe(|| {
        if store.is_null() {
            return FfiBookshelfResult::null_arg("store");
        }
        if book.is_null() {
            return FfiBookshelfResult::null_arg("book");
        }
        let store = unsafe { &*store };
        let book = unsafe { &*book }.to_core();
        match store.inner.add(&book) {
            Ok(record) => FfiBookshelfResult::ok_favorite(record),
            Err(e) => FfiBookshelfResult::from_storage_error(e),
        }
    }))
    .unwrap_or_else(|_| FfiBookshelfResult::panic("panic in bookshelf_favorites_add"))
}

/// List every saved favorite in store order.
///
/// Returns `data_tag = FavoriteList` on success.
#[unsafe(no_mangle)]
pub extern "C" fn bookshelf_favorites_list(
    store: *const FfiFavoritesStore,
) -> *mut FfiBookshelfResult {
    catch_unwind(AssertUnwindSafe(|| {
        if store.is_null() {
            return FfiBookshelfResult::null_arg("store");
        }
        let store = unsafe { &*store };
        match store.inner.list() {
            Ok(records) => FfiBookshelfResult::ok_favorite_list(records),
            Err(e) => FfiBookshelfResult::from_storage_error(e),
        }
    }))
    .unwrap_or_else(|_| FfiBookshelfResult::panic("panic in bookshelf_favorites_list"))
}

/// Delete the favorite stored under `key`.
///
/// Returns `data_tag = None` on success and `NotFound` if no such record.
#[unsafe(no_mangle)]
pub extern "C" fn bookshelf_favorites_remove(
    store: *const FfiFavoritesStore,
    key: u64,
) -> *mut FfiBookshelfResult {
    catch_unwind(AssertUnwindSafe(|| {
        if store.is_null() {
            return FfiBookshelfResult::null_arg("store");
        }
        let store = unsafe { &*store };
        match store.inner.remove_key(key) {
            Ok(true) => FfiBookshelfResult::ok_empty(),
            Ok(false) => FfiBookshelfResult::not_found(format!("no favorite with key {key}")),
            Err(e) => FfiBookshelfResult::from_storage_error(e),
        }
    }))
    .unwrap_or_else(|_| FfiBookshelfResult::panic("panic in bookshelf_favorites_remove"))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by `bookshelf_build_search`.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn bookshelf_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        free_c_string(req.url);
        free_c_string(req.body);
        for h in from_raw_parts(req.headers, req.headers_len) {
            free_c_string(h.key);
            free_c_string(h.value);
        }
    });
}

/// Free an `FfiBookshelfResult` returned by any fallible function.
/// Safe to call with null. Uses `data_tag` to determine what `data` points to.
#[unsafe(no_mangle)]
pub extern "C" fn bookshelf_free_result(result: *mut FfiBookshelfResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        free_c_string(result.error_message);
        if result.data.is_null() {
            return;
        }
        match result.data_tag {
            FfiDataTag::BookList => {
                let list = unsafe { Box::from_raw(result.data as *mut FfiBookList) };
                for book in from_raw_parts(list.items, list.len) {
                    book.free_fields();
                }
            }
            FfiDataTag::Favorite => {
                let favorite = unsafe { Box::from_raw(result.data as *mut FfiFavorite) };
                favorite.free_fields();
            }
            FfiDataTag::FavoriteList => {
                let list = unsafe { Box::from_raw(result.data as *mut FfiFavoriteList) };
                for favorite in from_raw_parts(list.items, list.len) {
                    favorite.free_fields();
                }
            }
            FfiDataTag::None => {}
        }
    });
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
