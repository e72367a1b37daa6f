/// The video resolution capability the API depends on.
use async_trait::async_trait;

use nuit_shared::{ByteStream, CanonicalUrl, ResolveResult, VideoMetadata};

/// Turns a watch URL into metadata and a media byte stream.
///
/// Implementations own every detail of talking to YouTube. Failures are
/// reported as [`nuit_shared::ResolveError`], whose `class()` is all the API
/// looks at.
#[async_trait]
pub trait VideoResolver: Send + Sync {
    /// Whether `url` identifies a single video this resolver can handle.
    fn is_resolvable_url(&self, url: &str) -> bool;

    /// Fetch the title and the list of available formats.
    async fn fetch_metadata(&self, url: &CanonicalUrl) -> ResolveResult<VideoMetadata>;

    /// Open a byte stream for one format. The stream is consumed once;
    /// dropping it stops the transfer.
    async fn open_stream(&self, url: &CanonicalUrl, format_id: &str) -> ResolveResult<ByteStream>;
}
