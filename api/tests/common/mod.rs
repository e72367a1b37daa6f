//! In-memory resolver used by the API tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;

use nuit_api::{router, AppState};
use nuit_downloader::validate::is_watch_url;
use nuit_downloader::VideoResolver;
use nuit_shared::{
    ByteStream, CanonicalUrl, FormatDescriptor, ResolveError, ResolveResult, VideoMetadata,
};

/// Sets its flag when dropped; rides inside a stream to observe cancellation.
pub struct DropFlag(pub Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

pub struct FakeResolver {
    pub title: String,
    pub formats: Vec<FormatDescriptor>,
    pub chunks: Vec<Bytes>,
    /// Upstream status returned by `fetch_metadata` instead of metadata.
    pub metadata_status: Option<u16>,
    /// Upstream status returned by `open_stream` instead of a stream.
    pub stream_status: Option<u16>,
    /// Keep the stream open after the last chunk.
    pub hang_after_chunks: bool,
    pub stream_dropped: Arc<AtomicBool>,
    pub fetched: Mutex<Vec<String>>,
    pub opened: Mutex<Vec<(String, String)>>,
}

pub fn format(id: &str, rank: u32, has_audio: bool, has_video: bool) -> FormatDescriptor {
    FormatDescriptor {
        format_id: id.to_string(),
        quality_rank: rank,
        has_audio,
        has_video,
        ext: Some("mp4".to_string()),
        height: Some(360),
    }
}

impl FakeResolver {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            formats: vec![format("18", 1, true, true)],
            chunks: vec![Bytes::from_static(b"fake-mp4-")],
            metadata_status: None,
            stream_status: None,
            hang_after_chunks: false,
            stream_dropped: Arc::new(AtomicBool::new(false)),
            fetched: Mutex::new(Vec::new()),
            opened: Mutex::new(Vec::new()),
        }
    }

    pub fn with_formats(mut self, formats: Vec<FormatDescriptor>) -> Self {
        self.formats = formats;
        self
    }

    pub fn with_chunks(mut self, chunks: &[&'static str]) -> Self {
        self.chunks = chunks.iter().map(|c| Bytes::from_static(c.as_bytes())).collect();
        self
    }

    pub fn failing_metadata(mut self, status: u16) -> Self {
        self.metadata_status = Some(status);
        self
    }

    pub fn failing_stream(mut self, status: u16) -> Self {
        self.stream_status = Some(status);
        self
    }

    pub fn hanging(mut self) -> Self {
        self.hang_after_chunks = true;
        self
    }
}

fn upstream(status: u16) -> ResolveError {
    ResolveError::Upstream {
        status,
        message: format!("simulated HTTP Error {}", status),
    }
}

#[async_trait]
impl VideoResolver for FakeResolver {
    fn is_resolvable_url(&self, url: &str) -> bool {
        is_watch_url(url)
    }

    async fn fetch_metadata(&self, url: &CanonicalUrl) -> ResolveResult<VideoMetadata> {
        self.fetched.lock().unwrap().push(url.to_string());
        if let Some(status) = self.metadata_status {
            return Err(upstream(status));
        }
        Ok(VideoMetadata {
            title: self.title.clone(),
            formats: self.formats.clone(),
        })
    }

    async fn open_stream(&self, url: &CanonicalUrl, format_id: &str) -> ResolveResult<ByteStream> {
        self.opened
            .lock()
            .unwrap()
            .push((url.to_string(), format_id.to_string()));
        if let Some(status) = self.stream_status {
            return Err(upstream(status));
        }

        let guard = DropFlag(self.stream_dropped.clone());
        let chunks = futures::stream::iter(self.chunks.clone()).map(move |chunk| {
            let _keep_alive = &guard;
            Ok::<_, ResolveError>(chunk)
        });

        if self.hang_after_chunks {
            Ok(chunks.chain(futures::stream::pending()).boxed())
        } else {
            Ok(chunks.boxed())
        }
    }
}

/// Router wired to `resolver`, without the static page.
pub fn app(resolver: Arc<FakeResolver>) -> axum::Router {
    router(Arc::new(AppState::new(resolver)), None)
}
