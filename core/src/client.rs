//! Stateless request builder and response parser for the books search API.
//!
//! # Design
//! `BooksClient` holds only a `base_url` and carries no mutable state between
//! calls. A search is split into `build_search`, which produces an
//! `HttpRequest`, and `parse_search`, which consumes an `HttpResponse`. The
//! round-trip in between belongs to a `Transport`, keeping this module
//! deterministic and free of I/O.

use url::Url;

use crate::error::SearchError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Book, VolumesResponse};

/// Public Google Books volumes endpoint.
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/books/v1/volumes";

/// Synchronous, stateless client for the books search API.
#[derive(Debug, Clone)]
pub struct BooksClient {
    base_url: String,
}

impl Default for BooksClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl BooksClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the `GET {base}?q={query}` request.
    ///
    /// The query is form-encoded. Empty queries are not rejected here; the
    /// search controller never submits them.
    pub fn build_search(&self, query: &str) -> Result<HttpRequest, SearchError> {
        let url = Url::parse_with_params(&self.base_url, &[("q", query)])
            .map_err(|e| SearchError::InvalidUrl(e.to_string()))?;
        tracing::debug!(url = %url, "built search request");
        Ok(HttpRequest {
            method: HttpMethod::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        })
    }

    /// Map a search response into books.
    pub fn parse_search(&self, response: HttpResponse) -> Result<Vec<Book>, SearchError> {
        check_status(&response)?;
        if response.body.trim().is_empty() {
            return Err(SearchError::NoData);
        }
        let payload: VolumesResponse = serde_json::from_str(&response.body)?;
        Ok(payload.items.into_iter().map(Book::from).collect())
    }
}

/// Map non-success status codes to `SearchError::Status`.
fn check_status(response: &HttpResponse) -> Result<(), SearchError> {
    if (200..300).contains(&response.status) {
        return Ok(());
    }
    Err(SearchError::Status {
        status: response.status,
        body: response.body.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> BooksClient {
        BooksClient::new("http://localhost:3000/books/v1/volumes")
    }

    fn ok(body: &str) -> HttpResponse {
        HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn build_search_produces_get_with_query() {
        let req = client().build_search("golang").unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/books/v1/volumes?q=golang");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_search_encodes_special_characters() {
        let req = client().build_search("c++ & rust").unwrap();
        assert_eq!(
            req.url,
            "http://localhost:3000/books/v1/volumes?q=c%2B%2B+%26+rust"
        );
    }

    #[test]
    fn default_client_targets_google_books() {
        let req = BooksClient::default().build_search("dune").unwrap();
        assert_eq!(req.url, "https://www.googleapis.com/books/v1/volumes?q=dune");
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = BooksClient::new("http://localhost:3000/books/v1/volumes/");
        assert_eq!(client.base_url(), "http://localhost:3000/books/v1/volumes");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = BooksClient::new("not a url").build_search("x").unwrap_err();
        assert!(matches!(err, SearchError::InvalidUrl(_)));
    }

    #[test]
    fn parse_search_maps_every_item() {
        let body = r#"{"items":[
            {"id":"a","volumeInfo":{"title":"First","publisher":"P"}},
            {"id":"b","volumeInfo":{"title":"Second","authors":["X","Y"]}}
        ]}"#;
        let books = client().parse_search(ok(body)).unwrap();
        assert_eq!(books.len(), 2);
        assert_eq!(books[0].id, "a");
        assert_eq!(books[0].publisher, "P");
        assert_eq!(books[1].authors, vec!["X", "Y"]);
        assert_eq!(books[1].publisher, "Unknown");
    }

    #[test]
    fn parse_search_without_items_is_empty() {
        let books = client()
            .parse_search(ok(r#"{"kind":"books#volumes","totalItems":0}"#))
            .unwrap();
        assert!(books.is_empty());
    }

    #[test]
    fn parse_search_empty_body_is_no_data() {
        let err = client().parse_search(ok("")).unwrap_err();
        assert!(matches!(err, SearchError::NoData));
        assert_eq!(err.to_string(), "no data");
    }

    #[test]
    fn parse_search_bad_json_is_decode_error() {
        let err = client().parse_search(ok("not json")).unwrap_err();
        assert!(matches!(err, SearchError::Decode(_)));
    }

    #[test]
    fn parse_search_unexpected_shape_is_decode_error() {
        let err = client()
            .parse_search(ok(r#"{"items":[{"id":"a"}]}"#))
            .unwrap_err();
        assert!(matches!(err, SearchError::Decode(_)));
    }

    #[test]
    fn parse_search_error_status() {
        let response = HttpResponse {
            status: 400,
            headers: Vec::new(),
            body: r#"{"error":{"code":400,"message":"Missing query."}}"#.to_string(),
        };
        let err = client().parse_search(response).unwrap_err();
        assert!(matches!(err, SearchError::Status { status: 400, .. }));
    }
}
