//! Domain types and wire DTOs for the books API.
//!
//! # Design
//! The wire types (`VolumesResponse`, `Volume`, `VolumeInfo`, `ImageLinks`)
//! mirror the JSON the books endpoint returns and are only ever decoded.
//! They are defined independently from the mock-server crate; integration
//! tests catch schema drift. `Book` is the canonical in-memory record and
//! `FavoriteRecord` is the persisted shape of a starred book.

use serde::{Deserialize, Serialize};

/// Publisher recorded when the source omits one.
pub const UNKNOWN_PUBLISHER: &str = "Unknown";

/// Separator used to flatten a book's authors into a favorite record.
pub const AUTHORS_SEPARATOR: &str = ", ";

/// A single book returned by a search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub publisher: String,
    pub cover_image_url: String,
    pub description: Option<String>,
}

impl From<Volume> for Book {
    fn from(volume: Volume) -> Self {
        let info = volume.volume_info;
        Self {
            id: volume.id,
            title: info.title,
            authors: info.authors.unwrap_or_default(),
            publisher: info
                .publisher
                .unwrap_or_else(|| UNKNOWN_PUBLISHER.to_string()),
            cover_image_url: info
                .image_links
                .and_then(|links| links.thumbnail)
                .unwrap_or_default(),
            description: info.description,
        }
    }
}

/// A book saved to the favorites store.
///
/// `key` is assigned by the store and identifies the record; `id` is the
/// catalog identifier and is not unique, so the same book may be saved
/// more than once.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRecord {
    pub key: u64,
    pub id: String,
    pub title: String,
    pub authors: String,
    pub publisher: String,
    pub cover_image_url: String,
    pub book_description: Option<String>,
}

impl FavoriteRecord {
    pub fn from_book(key: u64, book: &Book) -> Self {
        Self {
            key,
            id: book.id.clone(),
            title: book.title.clone(),
            authors: book.authors.join(AUTHORS_SEPARATOR),
            publisher: book.publisher.clone(),
            cover_image_url: book.cover_image_url.clone(),
            book_description: book.description.clone(),
        }
    }

    /// Split the flattened authors back into a list.
    ///
    /// Lossy: an author whose name contains `", "` comes back as two entries.
    pub fn authors_list(&self) -> Vec<String> {
        if self.authors.is_empty() {
            return Vec::new();
        }
        self.authors
            .split(AUTHORS_SEPARATOR)
            .map(str::to_string)
            .collect()
    }
}

/// Top-level payload of a volumes search.
///
/// The API omits `items` entirely when nothing matched.
#[derive(Debug, Clone, Deserialize)]
pub struct VolumesResponse {
    #[serde(default)]
    pub items: Vec<Volume>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    pub id: String,
    pub volume_info: VolumeInfo,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfo {
    pub title: String,
    pub authors: Option<Vec<String>>,
    pub publisher: Option<String>,
    pub image_links: Option<ImageLinks>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLinks {
    pub thumbnail: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book() -> Book {
        Book {
            id: "abc".to_string(),
            title: "Go in Action".to_string(),
            authors: vec!["W. Kennedy".to_string(), "B. Ketelsen".to_string()],
            publisher: "Manning".to_string(),
            cover_image_url: "http://covers.example/abc.jpg".to_string(),
            description: Some("Concurrency in Go".to_string()),
        }
    }

    #[test]
    fn volume_with_missing_optionals_maps_to_defaults() {
        let volume: Volume = serde_json::from_str(
            r#"{"id":"abc","volumeInfo":{"title":"Go in Action","authors":["W. Kennedy"]}}"#,
        )
        .unwrap();
        let book = Book::from(volume);
        assert_eq!(
            book,
            Book {
                id: "abc".to_string(),
                title: "Go in Action".to_string(),
                authors: vec!["W. Kennedy".to_string()],
                publisher: "Unknown".to_string(),
                cover_image_url: String::new(),
                description: None,
            }
        );
    }

    #[test]
    fn volume_without_authors_maps_to_empty_list() {
        let volume: Volume =
            serde_json::from_str(r#"{"id":"x","volumeInfo":{"title":"Anonymous"}}"#).unwrap();
        assert!(Book::from(volume).authors.is_empty());
    }

    #[test]
    fn image_links_without_thumbnail_maps_to_empty_url() {
        let volume: Volume = serde_json::from_str(
            r#"{"id":"x","volumeInfo":{"title":"T","imageLinks":{"smallThumbnail":"http://s"}}}"#,
        )
        .unwrap();
        assert_eq!(Book::from(volume).cover_image_url, "");
    }

    #[test]
    fn volume_with_all_fields_keeps_them() {
        let volume: Volume = serde_json::from_str(
            r#"{"id":"abc","volumeInfo":{"title":"Go in Action","authors":["W. Kennedy","B. Ketelsen"],
                "publisher":"Manning","imageLinks":{"thumbnail":"http://covers.example/abc.jpg"},
                "description":"Concurrency in Go"}}"#,
        )
        .unwrap();
        assert_eq!(Book::from(volume), book());
    }

    #[test]
    fn volume_without_title_is_rejected() {
        let result: Result<Volume, _> = serde_json::from_str(r#"{"id":"x","volumeInfo":{}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn response_without_items_is_empty() {
        let response: VolumesResponse =
            serde_json::from_str(r#"{"kind":"books#volumes","totalItems":0}"#).unwrap();
        assert!(response.items.is_empty());
    }

    #[test]
    fn favorite_record_flattens_authors() {
        let record = FavoriteRecord::from_book(7, &book());
        assert_eq!(record.key, 7);
        assert_eq!(record.authors, "W. Kennedy, B. Ketelsen");
        assert_eq!(record.book_description.as_deref(), Some("Concurrency in Go"));
        assert_eq!(record.authors_list(), book().authors);
    }

    #[test]
    fn favorite_record_with_no_authors_splits_to_empty_list() {
        let mut source = book();
        source.authors.clear();
        let record = FavoriteRecord::from_book(1, &source);
        assert_eq!(record.authors, "");
        assert!(record.authors_list().is_empty());
    }

    #[test]
    fn authors_split_is_lossy_for_names_containing_separator() {
        let mut source = book();
        source.authors = vec!["Smith, Jr.".to_string()];
        let record = FavoriteRecord::from_book(1, &source);
        assert_eq!(record.authors_list(), vec!["Smith", "Jr."]);
    }

    #[test]
    fn favorite_record_serializes_description_under_its_own_name() {
        let json = serde_json::to_value(FavoriteRecord::from_book(1, &book())).unwrap();
        assert_eq!(json["bookDescription"], "Concurrency in Go");
        assert!(json.get("description").is_none());
        assert_eq!(json["coverImageUrl"], "http://covers.example/abc.jpg");
    }
}
