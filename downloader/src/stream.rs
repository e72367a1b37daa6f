/// Child process stdout relayed as a byte stream.
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::future::BoxFuture;
use futures::{ready, FutureExt, Stream};
use tokio::process::{Child, ChildStdout};
use tokio::task::JoinHandle;
use tokio_util::io::ReaderStream;
use tracing::{debug, warn};

use nuit_shared::ResolveError;

use crate::ytdlp::classify_stderr;

enum State {
    Reading,
    /// Stdout hit EOF; waiting for the exit status.
    Exiting(BoxFuture<'static, Option<ResolveError>>),
    Done,
}

/// Streams an extractor's stdout and owns the child process.
///
/// Once stdout closes, the exit status decides how the stream ends: a clean
/// exit ends it, a failed exit yields one classified error so a truncated
/// transfer is never mistaken for a complete one.
///
/// The child is spawned with `kill_on_drop`, and dropping this stream also
/// starts the kill explicitly, so a client that disconnects mid-transfer
/// stops the extractor and its upstream connection.
pub struct ChildStream {
    child: Option<Child>,
    stderr_tail: Option<JoinHandle<String>>,
    inner: ReaderStream<ChildStdout>,
    bytes_relayed: u64,
    state: State,
}

impl ChildStream {
    pub fn new(child: Child, stdout: ChildStdout, stderr_tail: Option<JoinHandle<String>>) -> Self {
        Self {
            child: Some(child),
            stderr_tail,
            inner: ReaderStream::new(stdout),
            bytes_relayed: 0,
            state: State::Reading,
        }
    }
}

async fn exit_outcome(
    mut child: Child,
    stderr_tail: Option<JoinHandle<String>>,
    bytes_relayed: u64,
) -> Option<ResolveError> {
    let status = match child.wait().await {
        Ok(status) => status,
        Err(e) => return Some(ResolveError::Io(e)),
    };
    if status.success() {
        debug!("Extractor stream finished after {} bytes", bytes_relayed);
        return None;
    }

    let stderr = match stderr_tail {
        Some(handle) => handle.await.unwrap_or_else(|e| {
            warn!("Failed to collect extractor stderr: {}", e);
            String::new()
        }),
        None => String::new(),
    };
    let err = classify_stderr(&stderr);
    warn!(
        "Extractor exited with {} after {} bytes: {}",
        status, bytes_relayed, err
    );
    Some(err)
}

impl Stream for ChildStream {
    type Item = Result<Bytes, ResolveError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            match &mut this.state {
                State::Reading => match ready!(Pin::new(&mut this.inner).poll_next(cx)) {
                    Some(Ok(chunk)) => {
                        this.bytes_relayed += chunk.len() as u64;
                        return Poll::Ready(Some(Ok(chunk)));
                    }
                    Some(Err(e)) => {
                        this.state = State::Done;
                        return Poll::Ready(Some(Err(ResolveError::Io(e))));
                    }
                    None => match this.child.take() {
                        Some(child) => {
                            let outcome =
                                exit_outcome(child, this.stderr_tail.take(), this.bytes_relayed);
                            this.state = State::Exiting(outcome.boxed());
                        }
                        None => this.state = State::Done,
                    },
                },
                State::Exiting(outcome) => {
                    let outcome = ready!(outcome.as_mut().poll(cx));
                    this.state = State::Done;
                    return Poll::Ready(outcome.map(Err));
                }
                State::Done => return Poll::Ready(None),
            }
        }
    }
}

impl Drop for ChildStream {
    fn drop(&mut self) {
        if let Some(child) = self.child.as_mut() {
            debug!("Stream dropped after {} bytes, stopping extractor", self.bytes_relayed);
            let _ = child.start_kill();
        }
    }
}
