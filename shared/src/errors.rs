/// Unified error types for the Nuit system.
use thiserror::Error;

/// Coarse classification of an upstream failure.
///
/// The API maps these onto HTTP statuses without knowing anything about the
/// extractor that produced the error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamClass {
    /// The upstream resource no longer exists (HTTP 410).
    Gone,
    /// The upstream refused the request (HTTP 403).
    Forbidden,
    /// Anything else.
    Other,
}

impl UpstreamClass {
    /// Classify a raw upstream HTTP status code.
    pub fn from_status(status: u16) -> Self {
        match status {
            410 => UpstreamClass::Gone,
            403 => UpstreamClass::Forbidden,
            _ => UpstreamClass::Other,
        }
    }
}

impl std::fmt::Display for UpstreamClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpstreamClass::Gone => write!(f, "gone"),
            UpstreamClass::Forbidden => write!(f, "forbidden"),
            UpstreamClass::Other => write!(f, "other"),
        }
    }
}

/// Errors surfaced by a video resolution backend.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("upstream responded with HTTP {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("extractor failed: {0}")]
    Extractor(String),

    #[error("extractor binary not found: {0}")]
    ExtractorMissing(String),

    #[error("timed out after {0}s")]
    Timeout(u64),

    #[error("extractor exited without producing any media")]
    EmptyStream,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ResolveError {
    /// The upstream HTTP status, if the failure carried one.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            ResolveError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Coarse classification used by the API layer.
    pub fn class(&self) -> UpstreamClass {
        self.upstream_status()
            .map(UpstreamClass::from_status)
            .unwrap_or(UpstreamClass::Other)
    }
}

/// Result type alias for resolution operations.
pub type ResolveResult<T> = Result<T, ResolveError>;
