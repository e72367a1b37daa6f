/// Request-scoped models shared by the API and the resolver backends.
use bytes::Bytes;
use futures::stream::BoxStream;

use crate::errors::ResolveError;
use crate::normalize::normalize;

/// Lazy, finite, non-restartable sequence of media bytes.
///
/// Dropping the stream must release whatever upstream resource feeds it.
pub type ByteStream = BoxStream<'static, Result<Bytes, ResolveError>>;

/// A watch URL that went through normalization and passed the resolver's
/// validity check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalUrl(String);

impl CanonicalUrl {
    /// Normalize `raw` and keep the result only if `is_resolvable` accepts it.
    pub fn validate(raw: &str, is_resolvable: impl FnOnce(&str) -> bool) -> Option<Self> {
        let url = normalize(raw);
        if is_resolvable(&url) {
            Some(Self(url))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CanonicalUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CanonicalUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One downloadable format as reported by the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatDescriptor {
    /// Opaque identifier understood by the resolver's `open_stream`.
    pub format_id: String,
    /// Position in the resolver's own quality ordering; higher is better.
    pub quality_rank: u32,
    pub has_audio: bool,
    pub has_video: bool,
    pub ext: Option<String>,
    pub height: Option<u32>,
}

impl FormatDescriptor {
    /// Whether audio and video travel together in this one stream.
    pub fn is_combined(&self) -> bool {
        self.has_audio && self.has_video
    }
}

/// Video metadata returned by the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoMetadata {
    pub title: String,
    pub formats: Vec<FormatDescriptor>,
}

/// Everything needed to answer one download request.
pub struct DownloadDescriptor {
    /// Sanitized title, without extension.
    pub title: String,
    pub stream: ByteStream,
}

impl std::fmt::Debug for DownloadDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadDescriptor")
            .field("title", &self.title)
            .finish_non_exhaustive()
    }
}
