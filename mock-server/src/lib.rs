use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    pub id: String,
    pub volume_info: VolumeInfo,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfo {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_links: Option<ImageLinks>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLinks {
    pub small_thumbnail: String,
    pub thumbnail: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumesPage {
    pub kind: String,
    pub total_items: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<Volume>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: u16,
    pub message: String,
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

pub type Catalog = Arc<RwLock<Vec<Volume>>>;

/// Router serving the built-in sample catalog.
pub fn app() -> Router {
    app_with_catalog(sample_catalog())
}

pub fn app_with_catalog(volumes: Vec<Volume>) -> Router {
    let catalog: Catalog = Arc::new(RwLock::new(volumes));
    Router::new()
        .route("/books/v1/volumes", get(search_volumes).post(add_volume))
        .with_state(catalog)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// A handful of volumes covering every optional-field combination.
pub fn sample_catalog() -> Vec<Volume> {
    vec![
        Volume {
            id: "abc".to_string(),
            volume_info: VolumeInfo {
                title: "Go in Action".to_string(),
                authors: Some(vec!["W. Kennedy".to_string()]),
                publisher: None,
                image_links: None,
                description: None,
            },
        },
        Volume {
            id: "zyTCAlFPjgYC".to_string(),
            volume_info: VolumeInfo {
                title: "The Go Programming Language".to_string(),
                authors: Some(vec![
                    "Alan A. A. Donovan".to_string(),
                    "Brian W. Kernighan".to_string(),
                ]),
                publisher: Some("Addison-Wesley Professional".to_string()),
                image_links: Some(ImageLinks {
                    small_thumbnail: "http://books.example/covers/gopl-s.jpg".to_string(),
                    thumbnail: "http://books.example/covers/gopl.jpg".to_string(),
                }),
                description: Some("The authoritative resource for any programmer learning Go.".to_string()),
            },
        },
        Volume {
            id: "rustbook01".to_string(),
            volume_info: VolumeInfo {
                title: "The Rust Programming Language".to_string(),
                authors: Some(vec!["Steve Klabnik".to_string(), "Carol Nichols".to_string()]),
                publisher: Some("No Starch Press".to_string()),
                image_links: Some(ImageLinks {
                    small_thumbnail: "http://books.example/covers/trpl-s.jpg".to_string(),
                    thumbnail: "http://books.example/covers/trpl.jpg".to_string(),
                }),
                description: None,
            },
        },
        Volume {
            id: "anon0001".to_string(),
            volume_info: VolumeInfo {
                title: "Beowulf".to_string(),
                authors: None,
                publisher: Some("Penguin".to_string()),
                image_links: None,
                description: Some("An Old English epic poem.".to_string()),
            },
        },
    ]
}

/// True when every whitespace-separated term occurs in the title or an author.
fn matches(volume: &Volume, terms: &[String]) -> bool {
    let mut haystack = volume.volume_info.title.to_lowercase();
    for author in volume.volume_info.authors.iter().flatten() {
        haystack.push(' ');
        haystack.push_str(&author.to_lowercase());
    }
    terms.iter().all(|term| haystack.contains(term.as_str()))
}

async fn search_volumes(
    State(catalog): State<Catalog>,
    Query(params): Query<SearchParams>,
) -> Result<Json<VolumesPage>, (StatusCode, Json<ErrorBody>)> {
    let query = params.q.unwrap_or_default();
    let terms: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
    if terms.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                error: ErrorDetail {
                    code: 400,
                    message: "Missing query.".to_string(),
                },
            }),
        ));
    }

    let volumes = catalog.read().await;
    let items: Vec<Volume> = volumes.iter().filter(|v| matches(v, &terms)).cloned().collect();
    tracing::debug!(query = %query, hits = items.len(), "search");
    Ok(Json(VolumesPage {
        kind: "books#volumes".to_string(),
        total_items: items.len(),
        items,
    }))
}

async fn add_volume(
    State(catalog): State<Catalog>,
    Json(volume): Json<Volume>,
) -> (StatusCode, Json<Volume>) {
    catalog.write().await.push(volume.clone());
    (StatusCode::CREATED, Json(volume))
}
