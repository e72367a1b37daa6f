/// Classified download failures and their HTTP rendering.
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use nuit_shared::{ResolveError, UpstreamClass};

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Every way a download request can fail. The display text is the only
/// detail a client ever sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DownloadError {
    #[error("Missing url query parameter.")]
    MissingParameter,

    #[error("Please provide a valid YouTube watch URL.")]
    InvalidUrl,

    #[error("No combined audio/video stream is available for this link. Try a different video.")]
    NoCombinedFormat,

    #[error("YouTube returned a 410 (Gone) response. Copy the full watch URL from your browser and try again.")]
    UpstreamGone,

    #[error("YouTube refused the request. Please try again later.")]
    UpstreamForbidden,

    #[error("Unable to download this video right now.")]
    Unknown,
}

impl DownloadError {
    pub fn status(&self) -> StatusCode {
        match self {
            DownloadError::MissingParameter | DownloadError::InvalidUrl => StatusCode::BAD_REQUEST,
            DownloadError::NoCombinedFormat => StatusCode::UNPROCESSABLE_ENTITY,
            DownloadError::UpstreamGone => StatusCode::GONE,
            DownloadError::UpstreamForbidden => StatusCode::FORBIDDEN,
            DownloadError::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<&ResolveError> for DownloadError {
    fn from(err: &ResolveError) -> Self {
        match err.class() {
            UpstreamClass::Gone => DownloadError::UpstreamGone,
            UpstreamClass::Forbidden => DownloadError::UpstreamForbidden,
            UpstreamClass::Other => DownloadError::Unknown,
        }
    }
}

impl IntoResponse for DownloadError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
