//! Types shared by the Nuit API server and its resolver backends.
pub mod errors;
pub mod models;
pub mod normalize;

pub use errors::{ResolveError, ResolveResult, UpstreamClass};
pub use models::{ByteStream, CanonicalUrl, DownloadDescriptor, FormatDescriptor, VideoMetadata};
