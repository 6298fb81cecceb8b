//! Error types for the search client and the favorites store.
//!
//! # Design
//! `SearchError` reaches the user as a message string, so the transport and
//! decode variants are transparent: their `Display` is the underlying
//! error's description, unchanged. `StorageError` is only ever logged by the
//! controllers and keeps one variant per redb failure class.

use thiserror::Error;

use crate::http::TransportError;

/// Errors produced while building, executing, or parsing a search.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The base endpoint and query did not form a valid URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The transport could not complete the round-trip.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response carried no body.
    #[error("no data")]
    NoData,

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The body was not the expected JSON shape.
    #[error(transparent)]
    Decode(#[from] serde_json::Error),
}

/// Errors raised by the favorites store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("record serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_error_display_is_unchanged() {
        let err = SearchError::from(TransportError::new("connection refused"));
        assert_eq!(err.to_string(), "connection refused");
    }

    #[test]
    fn decode_error_display_is_serde_message() {
        let serde_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let expected = serde_err.to_string();
        assert_eq!(SearchError::from(serde_err).to_string(), expected);
    }

    #[test]
    fn status_error_includes_code_and_body() {
        let err = SearchError::Status {
            status: 503,
            body: "unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 503: unavailable");
    }
}
