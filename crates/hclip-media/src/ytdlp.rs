//! Media tool adapter backed by yt-dlp.
//!
//! Probing runs `yt-dlp -J` and parses the single JSON document it prints.
//! Streaming runs yt-dlp with `-o -` and hands its stdout to the caller as a
//! `MediaStream`.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, info, warn};

use hclip_models::VideoMetadata;

use crate::command::check_ytdlp;
use crate::error::{MediaError, MediaResult};
use crate::stream::{MediaStream, ProcessStream};

const TOOL: &str = "yt-dlp";

/// Which rendition of a video to stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamFormat {
    /// Best single-file rendition no taller than `max_height`, else best available
    Video { max_height: u32 },
    /// Best audio-only rendition, else best available
    AudioOnly,
}

impl StreamFormat {
    /// yt-dlp `-f` selector for this format.
    pub fn selector(&self) -> String {
        match self {
            StreamFormat::Video { max_height } => {
                format!("best[height<={}][ext=mp4]/best[height<={}]/best", max_height, max_height)
            }
            StreamFormat::AudioOnly => "bestaudio/best".to_string(),
        }
    }
}

/// Capability to resolve a video URL into metadata or a media byte stream.
#[async_trait]
pub trait MediaTool: Send + Sync {
    /// Fetch metadata for a video URL.
    async fn probe(&self, url: &str) -> MediaResult<VideoMetadata>;

    /// Start streaming the media behind a URL.
    async fn fetch_stream(&self, url: &str, format: StreamFormat) -> MediaResult<MediaStream>;
}

/// yt-dlp adapter configuration.
#[derive(Debug, Clone)]
pub struct YtDlpConfig {
    /// Program name or path
    pub program: String,
    /// Timeout for metadata probing
    pub probe_timeout: Duration,
}

impl Default for YtDlpConfig {
    fn default() -> Self {
        Self {
            program: TOOL.to_string(),
            probe_timeout: Duration::from_secs(60),
        }
    }
}

/// `MediaTool` implementation that shells out to yt-dlp.
#[derive(Debug, Clone, Default)]
pub struct YtDlp {
    config: YtDlpConfig,
}

impl YtDlp {
    pub fn new(config: YtDlpConfig) -> Self {
        Self { config }
    }

    fn command(&self) -> MediaResult<Command> {
        if self.config.program == TOOL {
            check_ytdlp()?;
        }
        let mut cmd = Command::new(&self.config.program);
        cmd.stdin(Stdio::null()).kill_on_drop(true);
        Ok(cmd)
    }
}

#[async_trait]
impl MediaTool for YtDlp {
    async fn probe(&self, url: &str) -> MediaResult<VideoMetadata> {
        let mut cmd = self.command()?;
        cmd.args(["-J", "--no-playlist", "--no-warnings", "--", url])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        info!(url = %url, "Probing video metadata");

        let secs = self.config.probe_timeout.as_secs();
        let output = tokio::time::timeout(self.config.probe_timeout, cmd.output())
            .await
            .map_err(|_| {
                warn!(url = %url, "yt-dlp probe timed out after {} seconds", secs);
                MediaError::Timeout { tool: TOOL, secs }
            })??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("yt-dlp stderr: {}", stderr);
            let message = stderr.lines().last().unwrap_or("Unknown error").to_string();
            return Err(MediaError::tool_failed(TOOL, message, output.status.code()));
        }

        parse_probe_output(&output.stdout)
    }

    async fn fetch_stream(&self, url: &str, format: StreamFormat) -> MediaResult<MediaStream> {
        let mut cmd = self.command()?;
        cmd.args(["--no-playlist", "--no-warnings", "--no-part", "-f"])
            .arg(format.selector())
            .args(["-o", "-", "--", url])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        info!(url = %url, format = ?format, "Streaming media");

        let child = cmd.spawn()?;
        let stream = ProcessStream::from_child(TOOL, child)
            .ok_or_else(|| MediaError::tool_failed(TOOL, "stdout was not captured", None))?;

        Ok(Box::new(stream))
    }
}

/// The subset of `yt-dlp -J` output we care about.
#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    duration: Option<f64>,
    #[serde(default)]
    thumbnail: Option<String>,
    #[serde(default)]
    uploader: Option<String>,
    #[serde(default)]
    channel: Option<String>,
}

/// Parse the JSON document printed by `yt-dlp -J`.
pub fn parse_probe_output(stdout: &[u8]) -> MediaResult<VideoMetadata> {
    let probe: ProbeOutput =
        serde_json::from_slice(stdout).map_err(|source| MediaError::Parse { tool: TOOL, source })?;

    Ok(VideoMetadata {
        title: probe.title.unwrap_or_default(),
        duration_seconds: probe.duration.unwrap_or(0.0),
        thumbnail_url: probe.thumbnail.unwrap_or_default(),
        author: probe.uploader.or(probe.channel).unwrap_or_default(),
    })
}
