//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! tagged enums with explicit discriminants. Conversion functions live here
//! to keep `lib.rs` focused on the `extern "C"` surface.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use bookshelf_core::http::HttpMethod;
use bookshelf_core::{Book, FavoriteRecord, SearchError, StorageError};

/// Opaque handle to a `BooksClient`.
pub struct FfiBooksClient {
    pub(crate) inner: bookshelf_core::BooksClient,
}

/// Opaque handle to an open favorites store.
pub struct FfiFavoritesStore {
    pub(crate) inner: bookshelf_core::RedbFavoritesStore,
}

// ---------------------------------------------------------------------------
// String helpers
// ---------------------------------------------------------------------------

/// Move `s` onto the C heap. Interior NULs are dropped rather than failing.
pub(crate) fn c_string(s: String) -> *mut c_char {
    let c = CString::new(s).unwrap_or_else(|e| {
        let mut bytes = e.into_vec();
        bytes.retain(|&b| b != 0);
        CString::new(bytes).unwrap_or_default()
    });
    c.into_raw()
}

pub(crate) fn c_string_opt(s: Option<String>) -> *mut c_char {
    s.map(c_string).unwrap_or(std::ptr::null_mut())
}

/// Borrow a caller-owned C string. Null or invalid UTF-8 reads as empty.
pub(crate) fn read_c_str<'a>(ptr: *const c_char) -> &'a str {
    if ptr.is_null() {
        return "";
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().unwrap_or("")
}

pub(crate) fn free_c_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(unsafe { CString::from_raw(ptr) });
    }
}

/// Hand a vector to C as a pointer + length. Empty vectors become null.
fn into_raw_parts<T>(items: Vec<T>) -> (*mut T, u32) {
    let len = items.len() as u32;
    if items.is_empty() {
        return (std::ptr::null_mut(), 0);
    }
    let mut boxed = items.into_boxed_slice();
    let ptr = boxed.as_mut_ptr();
    std::mem::forget(boxed);
    (ptr, len)
}

/// Reclaim a vector handed out by `into_raw_parts`.
pub(crate) fn from_raw_parts<T>(ptr: *mut T, len: u32) -> Vec<T> {
    if ptr.is_null() || len == 0 {
        return Vec::new();
    }
    let slice = std::ptr::slice_from_raw_parts_mut(ptr, len as usize);
    unsafe { Box::from_raw(slice) }.into_vec()
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
pub enum FfiHttpMethod {
    Get = 0,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// Built by `bookshelf_build_search`. The host executes the request and
/// passes the response back through `bookshelf_parse_search`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: bookshelf_core::HttpRequest) -> *mut Self {
        let headers: Vec<FfiHeader> = req
            .headers
            .into_iter()
            .map(|(k, v)| FfiHeader {
                key: c_string(k),
                value: c_string(v),
            })
            .collect();
        let (headers, headers_len) = into_raw_parts(headers);

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            url: c_string(req.url),
            headers,
            headers_len,
            body: c_string_opt(req.body),
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The host constructs this after executing a request and passes a pointer
/// to `bookshelf_parse_search`. The FFI layer reads but does not free it.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Books and favorites
// ---------------------------------------------------------------------------

/// A search result exposed to C. `description` is null when absent.
#[repr(C)]
pub struct FfiBook {
    pub id: *mut c_char,
    pub title: *mut c_char,
    pub authors: *mut *mut c_char,
    pub authors_len: u32,
    pub publisher: *mut c_char,
    pub cover_image_url: *mut c_char,
    pub description: *mut c_char,
}

impl FfiBook {
    fn from_core(book: Book) -> Self {
        let authors: Vec<*mut c_char> = book.authors.into_iter().map(c_string).collect();
        let (authors, authors_len) = into_raw_parts(authors);
        FfiBook {
            id: c_string(book.id),
            title: c_string(book.title),
            authors,
            authors_len,
            publisher: c_string(book.publisher),
            cover_image_url: c_string(book.cover_image_url),
            description: c_string_opt(book.description),
        }
    }

    /// Copy a host-provided book back into a core `Book`.
    pub(crate) fn to_core(&self) -> Book {
        let authors = if self.authors.is_null() {
            Vec::new()
        } else {
            let ptrs = unsafe { std::slice::from_raw_parts(self.authors, self.authors_len as usize) };
            ptrs.iter().map(|&p| read_c_str(p).to_string()).collect()
        };
        Book {
            id: read_c_str(self.id).to_string(),
            title: read_c_str(self.title).to_string(),
            authors,
            publisher: read_c_str(self.publisher).to_string(),
            cover_image_url: read_c_str(self.cover_image_url).to_string(),
            description: if self.description.is_null() {
                None
            } else {
                Some(read_c_str(self.description).to_string())
            },
        }
    }

    /// Free the C-string fields (but not the struct itself).
    pub(crate) fn free_fields(&self) {
        free_c_string(self.id);
        free_c_string(self.title);
        for author in from_raw_parts(self.authors, self.authors_len) {
            free_c_string(author);
        }
        free_c_string(self.publisher);
        free_c_string(self.cover_image_url);
        free_c_string(self.description);
    }
}

/// A list of books exposed to C.
#[repr(C)]
pub struct FfiBookList {
    pub items: *mut FfiBook,
    pub len: u32,
}

/// A saved favorite exposed to C. `book_description` is null when absent.
#[repr(C)]
pub struct FfiFavorite {
    pub key: u64,
    pub id: *mut c_char,
    pub title: *mut c_char,
    pub authors: *mut c_char,
    pub publisher: *mut c_char,
    pub cover_image_url: *mut c_char,
    pub book_description: *mut c_char,
}

impl FfiFavorite {
    fn from_core(record: FavoriteRecord) -> Self {
        FfiFavorite {
            key: record.key,
            id: c_string(record.id),
            title: c_string(record.title),
            authors: c_string(record.authors),
            publisher: c_string(record.publisher),
            cover_image_url: c_string(record.cover_image_url),
            book_description: c_string_opt(record.book_description),
        }
    }

    pub(crate) fn free_fields(&self) {
        free_c_string(self.id);
        free_c_string(self.title);
        free_c_string(self.authors);
        free_c_string(self.publisher);
        free_c_string(self.cover_image_url);
        free_c_string(self.book_description);
    }
}

/// A list of favorites exposed to C.
#[repr(C)]
pub struct FfiFavoriteList {
    pub items: *mut FfiFavorite,
    pub len: u32,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiBookshelfResult`.
#[repr(C)]
pub enum FfiErrorCode {
    Ok = 0,
    InvalidUrl = 1,
    Transport = 2,
    NoData = 3,
    Http = 4,
    Decode = 5,
    Storage = 6,
    NotFound = 7,
    Panic = 8,
    NullArg = 9,
}

/// Tag that tells `bookshelf_free_result` what `FfiBookshelfResult::data` points to.
#[repr(C)]
pub enum FfiDataTag {
    None = 0,
    BookList = 1,
    Favorite = 2,
    FavoriteList = 3,
}

/// Result envelope for every fallible operation.
///
/// On success `error_code` is `Ok`, `error_message` is null, and `data`
/// points to the payload (tagged by `data_tag`).
/// On failure `error_code` describes the category, `error_message` is a
/// human-readable C string, and `data` is null.
#[repr(C)]
pub struct FfiBookshelfResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub data_tag: FfiDataTag,
    pub data: *mut std::ffi::c_void,
}

impl FfiBookshelfResult {
    fn ok(data_tag: FfiDataTag, data: *mut std::ffi::c_void) -> *mut Self {
        Box::into_raw(Box::new(FfiBookshelfResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            http_status: 0,
            data_tag,
            data,
        }))
    }

    fn error(error_code: FfiErrorCode, http_status: u16, msg: String) -> *mut Self {
        Box::into_raw(Box::new(FfiBookshelfResult {
            error_code,
            error_message: c_string(msg),
            http_status,
            data_tag: FfiDataTag::None,
            data: std::ptr::null_mut(),
        }))
    }

    /// Build a success result carrying a `FfiBookList`.
    pub(crate) fn ok_book_list(books: Vec<Book>) -> *mut Self {
        let (items, len) = into_raw_parts(books.into_iter().map(FfiBook::from_core).collect());
        let list = Box::new(FfiBookList { items, len });
        Self::ok(FfiDataTag::BookList, Box::into_raw(list) as *mut std::ffi::c_void)
    }

    /// Build a success result carrying a single `FfiFavorite`.
    pub(crate) fn ok_favorite(record: FavoriteRecord) -> *mut Self {
        let favorite = Box::new(FfiFavorite::from_core(record));
        Self::ok(FfiDataTag::Favorite, Box::into_raw(favorite) as *mut std::ffi::c_void)
    }

    /// Build a success result carrying a `FfiFavoriteList`.
    pub(crate) fn ok_favorite_list(records: Vec<FavoriteRecord>) -> *mut Self {
        let (items, len) =
            into_raw_parts(records.into_iter().map(FfiFavorite::from_core).collect());
        let list = Box::new(FfiFavoriteList { items, len });
        Self::ok(FfiDataTag::FavoriteList, Box::into_raw(list) as *mut std::ffi::c_void)
    }

    /// Build a success result with no data payload (e.g. remove).
    pub(crate) fn ok_empty() -> *mut Self {
        Self::ok(FfiDataTag::None, std::ptr::null_mut())
    }

    /// Build an error result from a `SearchError`.
    pub(crate) fn from_search_error(err: SearchError) -> *mut Self {
        let (code, status) = match &err {
            SearchError::InvalidUrl(_) => (FfiErrorCode::InvalidUrl, 0),
            SearchError::Transport(_) => (FfiErrorCode::Transport, 0),
            SearchError::NoData => (FfiErrorCode::NoData, 0),
            SearchError::Status { status, .. } => (FfiErrorCode::Http, *status),
            SearchError::Decode(_) => (FfiErrorCode::Decode, 0),
        };
        Self::error(code, status, err.to_string())
    }

    /// Build an error result from a `StorageError`.
    pub(crate) fn from_storage_error(err: StorageError) -> *mut Self {
        Self::error(FfiErrorCode::Storage, 0, err.to_string())
    }

    pub(crate) fn not_found(msg: String) -> *mut Self {
        Self::error(FfiErrorCode::NotFound, 0, msg)
    }

    /// Build an error result for a null argument.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::error(FfiErrorCode::NullArg, 0, format!("null argument: {name}"))
    }

    /// Build an error result for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::error(FfiErrorCode::Panic, 0, msg.to_string())
    }
}
