//! Byte streams produced by external processes.

use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, ReadBuf};
use tokio::process::{Child, ChildStderr, ChildStdout};
use tracing::debug;

/// A media byte stream handed from a `MediaTool` to a `Transcoder`.
pub type MediaStream = Box<dyn AsyncRead + Send + Unpin>;

/// Standard output of a running child process, exposed as an `AsyncRead`.
///
/// The stream owns the child: dropping it kills the process (the child must
/// be spawned with `kill_on_drop(true)`), so an abandoned download never
/// outlives the request that started it.
pub struct ProcessStream {
    // Held for its drop behaviour.
    _child: Child,
    stdout: ChildStdout,
}

impl ProcessStream {
    /// Wrap a spawned child whose stdout was piped.
    ///
    /// Returns `None` when stdout was not captured. If stderr was captured it
    /// is drained in the background into debug logs so the child never blocks
    /// on a full pipe.
    pub fn from_child(tool: &'static str, mut child: Child) -> Option<Self> {
        let stdout = child.stdout.take()?;
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(drain_stderr(tool, stderr));
        }
        Some(Self {
            _child: child,
            stdout,
        })
    }
}

impl AsyncRead for ProcessStream {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        Pin::new(&mut self.stdout).poll_read(cx, buf)
    }
}

async fn drain_stderr(tool: &'static str, stderr: ChildStderr) {
    let mut lines = BufReader::new(stderr).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let line = line.trim();
        if !line.is_empty() {
            debug!(tool, "{}", line);
        }
    }
}
