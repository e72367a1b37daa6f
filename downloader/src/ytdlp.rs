/// yt-dlp backed resolver.
///
/// Metadata comes from `yt-dlp -J`; media comes from `yt-dlp -f <id> -o -`
/// with stdout relayed chunk by chunk. Stderr is forwarded to tracing and
/// kept so an upstream refusal can be classified.
use std::collections::VecDeque;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{ChildStderr, Command};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use nuit_shared::{
    ByteStream, CanonicalUrl, FormatDescriptor, ResolveError, ResolveResult, VideoMetadata,
};

use crate::config::ResolverConfig;
use crate::resolver::VideoResolver;
use crate::stream::ChildStream;
use crate::validate;

/// Number of stderr lines kept for error classification.
const STDERR_TAIL_LINES: usize = 20;

static HTTP_ERROR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"HTTP Error (\d{3})").unwrap()
});

// ====== yt-dlp JSON ======

#[derive(Debug, Deserialize)]
struct YtDlpInfo {
    title: Option<String>,
    #[serde(default)]
    formats: Vec<YtDlpFormat>,
}

#[derive(Debug, Deserialize)]
struct YtDlpFormat {
    format_id: String,
    ext: Option<String>,
    vcodec: Option<String>,
    acodec: Option<String>,
    height: Option<u32>,
}

fn has_codec(codec: &Option<String>) -> bool {
    matches!(codec.as_deref(), Some(c) if !c.is_empty() && c != "none")
}

/// Parse `yt-dlp -J` output. yt-dlp lists formats from worst to best, so the
/// list position is the quality rank.
pub fn parse_metadata(json: &[u8]) -> ResolveResult<VideoMetadata> {
    let info: YtDlpInfo = serde_json::from_slice(json)?;

    let formats = info
        .formats
        .into_iter()
        .enumerate()
        .map(|(rank, f)| FormatDescriptor {
            has_audio: has_codec(&f.acodec),
            has_video: has_codec(&f.vcodec),
            format_id: f.format_id,
            quality_rank: rank as u32,
            ext: f.ext,
            height: f.height,
        })
        .collect();

    Ok(VideoMetadata {
        title: info.title.unwrap_or_default(),
        formats,
    })
}

/// Turn extractor stderr into a [`ResolveError`], picking up the last
/// `HTTP Error <code>` line when there is one.
pub fn classify_stderr(stderr: &str) -> ResolveError {
    let message = stderr
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .next_back()
        .unwrap_or("extractor exited without output")
        .to_string();

    let status = HTTP_ERROR_RE
        .captures_iter(stderr)
        .last()
        .and_then(|cap| cap[1].parse::<u16>().ok());

    match status {
        Some(status) => ResolveError::Upstream { status, message },
        None => ResolveError::Extractor(message),
    }
}

/// Drain stderr into the log, returning the last few lines once it closes.
fn forward_stderr(stderr: ChildStderr) -> JoinHandle<String> {
    tokio::spawn(async move {
        let mut lines = BufReader::new(stderr).lines();
        let mut tail: VecDeque<String> = VecDeque::with_capacity(STDERR_TAIL_LINES);
        while let Ok(Some(line)) = lines.next_line().await {
            debug!("[yt-dlp] {}", line);
            if tail.len() == STDERR_TAIL_LINES {
                tail.pop_front();
            }
            tail.push_back(line);
        }
        Vec::from(tail).join("\n")
    })
}

fn secs(duration: Duration) -> u64 {
    duration.as_secs().max(1)
}

// ====== RESOLVER ======

/// [`VideoResolver`] that shells out to yt-dlp.
pub struct YtDlpResolver {
    config: ResolverConfig,
}

impl YtDlpResolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.config.program);
        cmd.args(&self.config.program_args)
            .stdin(Stdio::null())
            .kill_on_drop(true);
        for (name, value) in &self.config.headers {
            cmd.arg("--add-header").arg(format!("{}:{}", name, value));
        }
        cmd
    }

    fn spawn_error(&self, e: std::io::Error) -> ResolveError {
        if e.kind() == std::io::ErrorKind::NotFound {
            ResolveError::ExtractorMissing(self.config.program.clone())
        } else {
            ResolveError::Io(e)
        }
    }
}

#[async_trait]
impl VideoResolver for YtDlpResolver {
    fn is_resolvable_url(&self, url: &str) -> bool {
        validate::is_watch_url(url)
    }

    async fn fetch_metadata(&self, url: &CanonicalUrl) -> ResolveResult<VideoMetadata> {
        let mut cmd = self.command();
        cmd.args(["-J", "--no-playlist", "--no-warnings", "--"])
            .arg(url.as_str());

        debug!("Fetching metadata for {}", url);
        let output = tokio::time::timeout(self.config.metadata_timeout, cmd.output())
            .await
            .map_err(|_| ResolveError::Timeout(secs(self.config.metadata_timeout)))?
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            return Err(classify_stderr(&String::from_utf8_lossy(&output.stderr)));
        }

        let metadata = parse_metadata(&output.stdout)?;
        info!("Resolved {} ({} formats)", url, metadata.formats.len());
        Ok(metadata)
    }

    async fn open_stream(&self, url: &CanonicalUrl, format_id: &str) -> ResolveResult<ByteStream> {
        let mut cmd = self.command();
        cmd.args(["-f", format_id, "-o", "-", "--quiet", "--no-part", "--no-playlist", "--no-warnings", "--"])
            .arg(url.as_str())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|e| self.spawn_error(e))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ResolveError::Extractor("stdout was not captured".to_string()))?;
        let stderr_tail = child.stderr.take().map(forward_stderr);
        let mut stream = ChildStream::new(child, stdout, stderr_tail);

        // Hold the response until the first chunk so an upstream refusal can
        // still become a proper error status.
        let first = tokio::time::timeout(self.config.open_timeout, stream.next())
            .await
            .map_err(|_| ResolveError::Timeout(secs(self.config.open_timeout)))?;

        match first {
            Some(Ok(chunk)) => {
                info!("Streaming format {} of {}", format_id, url);
                Ok(futures::stream::once(async move { Ok::<_, ResolveError>(chunk) })
                    .chain(stream)
                    .boxed())
            }
            // A failed exit before any data surfaces here, already classified.
            Some(Err(e)) => Err(e),
            None => Err(ResolveError::EmptyStream),
        }
    }
}
