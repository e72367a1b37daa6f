/// Download orchestration: validate, resolve, pick a format, open the stream.
///
/// Every request walks `validate -> resolve -> stream` on its own; nothing is
/// cached or shared between requests.
use axum::body::Body;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::{error, info, warn};

use nuit_downloader::VideoResolver;
use nuit_shared::{CanonicalUrl, DownloadDescriptor, FormatDescriptor, ResolveError};

use crate::error::DownloadError;
use crate::filename::sanitize_filename;

/// Pick the best format carrying both audio and video, by the resolver's own
/// quality rank.
pub fn select_combined_format(formats: &[FormatDescriptor]) -> Option<&FormatDescriptor> {
    formats
        .iter()
        .filter(|f| f.is_combined())
        .max_by_key(|f| f.quality_rank)
}

/// Check the raw `url` parameter and turn it into a canonical watch URL.
pub fn validate_input(
    resolver: &dyn VideoResolver,
    raw: Option<&str>,
) -> Result<CanonicalUrl, DownloadError> {
    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Err(DownloadError::MissingParameter);
    }

    CanonicalUrl::validate(raw, |url| resolver.is_resolvable_url(url)).ok_or_else(|| {
        warn!("Rejected invalid URL: {}", raw);
        DownloadError::InvalidUrl
    })
}

/// Resolve a validated URL into a title and a live byte stream.
pub async fn resolve(
    resolver: &dyn VideoResolver,
    url: &CanonicalUrl,
) -> Result<DownloadDescriptor, DownloadError> {
    let metadata = resolver
        .fetch_metadata(url)
        .await
        .map_err(|e| upstream_failure(url, "metadata fetch", &e))?;

    let format = select_combined_format(&metadata.formats).ok_or_else(|| {
        warn!(
            "No combined audio/video format for {} ({} formats available)",
            url,
            metadata.formats.len()
        );
        DownloadError::NoCombinedFormat
    })?;

    info!(
        "Selected format {} ({}, {}p) for {}",
        format.format_id,
        format.ext.as_deref().unwrap_or("?"),
        format.height.unwrap_or_default(),
        url
    );

    let stream = resolver
        .open_stream(url, &format.format_id)
        .await
        .map_err(|e| upstream_failure(url, "stream open", &e))?;

    Ok(DownloadDescriptor {
        title: sanitize_filename(&metadata.title),
        stream,
    })
}

/// Log a resolver failure with full detail and classify it for the client.
fn upstream_failure(url: &CanonicalUrl, stage: &str, err: &ResolveError) -> DownloadError {
    match err {
        ResolveError::ExtractorMissing(program) => {
            error!("Extractor '{}' is not installed; cannot serve {}", program, url)
        }
        _ => error!(
            "YouTube {} failed for {}: {} (upstream status: {:?}, class: {})",
            stage,
            url,
            err,
            err.upstream_status(),
            err.class()
        ),
    }
    DownloadError::from(err)
}

/// Build the streaming attachment response. The body pulls from the
/// resolver's stream as the client reads; nothing is buffered up front.
pub fn attachment_response(descriptor: DownloadDescriptor) -> Response {
    let disposition = format!("attachment; filename=\"{}.mp4\"", descriptor.title);

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "video/mp4".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
            (header::CACHE_CONTROL, "no-store".to_string()),
        ],
        Body::from_stream(descriptor.stream),
    )
        .into_response()
}
