/// API route handlers.
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;
use tracing::{info, Instrument};

use crate::download;
use crate::error::DownloadError;
use crate::AppState;

// ====== REQUEST / RESPONSE TYPES ======

/// Download request parameters, read from the raw query pairs.
#[derive(Debug)]
pub struct DownloadQuery {
    pub url: Option<String>,
}

impl DownloadQuery {
    /// The first `url` value wins.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let url = pairs
            .into_iter()
            .find(|(key, _)| key == "url")
            .map(|(_, value)| value);
        Self { url }
    }
}

// ====== DOWNLOAD ROUTE ======

/// GET /api/download?url=<watch url> - Stream the best combined format as an
/// MP4 attachment
pub async fn download(
    State(state): State<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, DownloadError> {
    let query = DownloadQuery::from_pairs(pairs);
    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!(
        "download",
        %request_id,
        url = query.url.as_deref().unwrap_or_default()
    );

    async move {
        let resolver = state.resolver.as_ref();
        let url = download::validate_input(resolver, query.url.as_deref())?;
        let descriptor = download::resolve(resolver, &url).await?;
        info!("Streaming \"{}.mp4\" for {}", descriptor.title, url);
        Ok::<_, DownloadError>(download::attachment_response(descriptor))
    }
    .instrument(span)
    .await
}

// ====== HEALTH ROUTE ======

/// GET /api/health
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
