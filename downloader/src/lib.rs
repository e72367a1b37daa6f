//! Nuit video resolution backends.
//!
//! The API talks to YouTube only through the [`VideoResolver`] trait. The
//! production backend drives the `yt-dlp` binary as a child process and
//! relays its stdout as the media stream.
pub mod config;
pub mod resolver;
pub mod stream;
pub mod validate;
pub mod ytdlp;

pub use config::ResolverConfig;
pub use resolver::VideoResolver;
pub use ytdlp::YtDlpResolver;
