//! Transcoder adapter backed by FFmpeg.
//!
//! The source stream is copied into FFmpeg's stdin while FFmpeg writes the
//! trimmed, re-encoded result straight to the destination path, so the
//! source is never held in memory. Every failure removes the partial output
//! file.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::command::{check_ffmpeg, FfmpegCommand};
use crate::error::{MediaError, MediaResult};
use crate::stream::MediaStream;

const TOOL: &str = "ffmpeg";

/// Encoding settings applied to the trimmed output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeProfile {
    /// H.264/AAC MP4 tuned for encode speed (clip creation)
    FastVideo,
    /// Mono 16 kHz MP3 at 64 kbit/s, video dropped (speech transcription)
    SpeechAudio,
}

/// What to cut out of the input stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrimSpec {
    /// Start offset in seconds (>= 0)
    pub start_seconds: f64,
    /// Length in seconds (> 0)
    pub duration_seconds: f64,
    /// Output encoding
    pub profile: EncodeProfile,
}

impl TrimSpec {
    pub fn new(start_seconds: f64, duration_seconds: f64, profile: EncodeProfile) -> Self {
        Self {
            start_seconds,
            duration_seconds,
            profile,
        }
    }

    /// Check `start >= 0` and `duration > 0`.
    pub fn validate(&self) -> MediaResult<()> {
        if !self.start_seconds.is_finite() || self.start_seconds < 0.0 {
            return Err(MediaError::invalid_argument(format!(
                "start must be >= 0, got {}",
                self.start_seconds
            )));
        }
        if !self.duration_seconds.is_finite() || self.duration_seconds <= 0.0 {
            return Err(MediaError::invalid_argument(format!(
                "duration must be > 0, got {}",
                self.duration_seconds
            )));
        }
        Ok(())
    }

    /// Build the FFmpeg command that applies this trim to stdin.
    pub fn to_command(&self, output: &Path) -> FfmpegCommand {
        let cmd = FfmpegCommand::from_stdin(output);
        let cmd = if self.start_seconds > 0.0 {
            cmd.seek(self.start_seconds)
        } else {
            cmd
        };
        let cmd = cmd.duration(self.duration_seconds);

        match self.profile {
            EncodeProfile::FastVideo => cmd
                .video_codec("libx264")
                .preset("ultrafast")
                .crf(23)
                .audio_codec("aac")
                .audio_bitrate("128k")
                .faststart(),
            EncodeProfile::SpeechAudio => cmd
                .no_video()
                .audio_channels(1)
                .audio_sample_rate(16_000)
                .audio_codec("libmp3lame")
                .audio_bitrate("64k"),
        }
    }
}

/// Capability to trim a media stream into a file.
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Trim `input` according to `spec` and write the result to `output`.
    async fn trim(&self, input: MediaStream, spec: &TrimSpec, output: &Path) -> MediaResult<()>;
}

/// FFmpeg runner configuration.
#[derive(Debug, Clone)]
pub struct FfmpegConfig {
    /// Program name or path
    pub program: String,
    /// Wall-clock limit for one trim
    pub timeout: Duration,
    /// Ceiling on captured diagnostic output
    pub max_output_bytes: usize,
}

impl Default for FfmpegConfig {
    fn default() -> Self {
        Self {
            program: TOOL.to_string(),
            timeout: Duration::from_secs(300),
            max_output_bytes: 50 * 1024 * 1024,
        }
    }
}

/// `Transcoder` implementation that shells out to FFmpeg.
#[derive(Debug, Clone, Default)]
pub struct Ffmpeg {
    config: FfmpegConfig,
}

impl Ffmpeg {
    pub fn new(config: FfmpegConfig) -> Self {
        Self { config }
    }

    /// Run an FFmpeg command whose input is fed from `input`.
    pub async fn run_piped(&self, mut input: MediaStream, cmd: &FfmpegCommand) -> MediaResult<()> {
        if self.config.program == TOOL {
            check_ffmpeg()?;
        }

        let args = cmd.build_args();
        debug!("Running FFmpeg: {} {}", self.config.program, args.join(" "));

        let mut child = Command::new(&self.config.program)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| MediaError::tool_failed(TOOL, "stdin was not captured", None))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| MediaError::tool_failed(TOOL, "stderr was not captured", None))?;

        let feed = async move {
            let copied = tokio::io::copy(&mut input, &mut stdin).await;
            drop(stdin);
            match copied {
                Ok(bytes) => {
                    debug!(bytes, "Finished feeding FFmpeg");
                    Ok(())
                }
                // FFmpeg stops reading once it has the requested duration.
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
                Err(e) => Err(MediaError::Io(e)),
            }
        };
        let drain = collect_bounded(stderr, self.config.max_output_bytes);
        let wait = async { child.wait().await.map_err(MediaError::from) };

        let secs = self.config.timeout.as_secs();
        let result = match tokio::time::timeout(self.config.timeout, async {
            tokio::try_join!(feed, drain, wait)
        })
        .await
        {
            Ok(result) => result,
            Err(_) => Err(MediaError::Timeout { tool: TOOL, secs }),
        };

        let (_, diagnostics, status) = match result {
            Ok(done) => done,
            Err(e) => {
                warn!(output = %cmd.output().display(), "FFmpeg aborted: {}", e);
                let _ = child.kill().await;
                remove_partial(cmd.output()).await;
                return Err(e);
            }
        };

        if !status.success() {
            remove_partial(cmd.output()).await;
            let message = diagnostics
                .lines()
                .rev()
                .find(|l| !l.trim().is_empty())
                .unwrap_or("FFmpeg exited with non-zero status")
                .to_string();
            return Err(MediaError::tool_failed(TOOL, message, status.code()));
        }

        Ok(())
    }
}

#[async_trait]
impl Transcoder for Ffmpeg {
    async fn trim(&self, input: MediaStream, spec: &TrimSpec, output: &Path) -> MediaResult<()> {
        spec.validate()?;

        info!(
            output = %output.display(),
            start = spec.start_seconds,
            duration = spec.duration_seconds,
            profile = ?spec.profile,
            "Trimming media stream"
        );

        let cmd = spec.to_command(output);
        self.run_piped(input, &cmd).await?;

        info!(output = %output.display(), "Trim complete");
        Ok(())
    }
}

/// Read a diagnostic stream to the end, failing once it exceeds `limit` bytes.
async fn collect_bounded<R>(mut reader: R, limit: usize) -> MediaResult<String>
where
    R: AsyncRead + Unpin,
{
    let mut collected = Vec::new();
    let mut chunk = [0u8; 8192];
    loop {
        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        if collected.len() + n > limit {
            return Err(MediaError::OutputLimit { tool: TOOL, limit });
        }
        collected.extend_from_slice(&chunk[..n]);
    }
    Ok(String::from_utf8_lossy(&collected).into_owned())
}

async fn remove_partial(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => debug!("Removed partial output {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to remove partial output {}: {}", path.display(), e),
    }
}
