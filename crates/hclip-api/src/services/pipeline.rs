//! Highlight extraction pipeline.
//!
//! Audio extraction, transcription, model reasoning and response parsing run
//! strictly in sequence for one URL. The extracted audio file never outlives
//! [`HighlightPipeline::analyze`]: it is removed on every return path, and by
//! the guard's `Drop` if the future is cancelled mid-flight.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use hclip_ai::{AiError, HighlightReasoner, Transcriber};
use hclip_media::{EncodeProfile, MediaError, MediaTool, StreamFormat, Transcoder, TrimSpec};
use hclip_models::{Highlight, HighlightAnalysis};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::metrics;

/// Only the first ten minutes of a video are analyzed.
pub const MAX_ANALYSIS_SECONDS: f64 = 600.0;

/// Errors that abort a highlight analysis.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Audio extraction failed: {0}")]
    Tool(#[source] MediaError),

    #[error("AI service request failed")]
    Api(#[source] AiError),

    #[error("Highlight response is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),
}

impl PipelineError {
    fn outcome(&self) -> &'static str {
        match self {
            PipelineError::Tool(_) => "tool_error",
            PipelineError::Api(_) => "api_error",
            PipelineError::Parse(_) => "parse_error",
        }
    }
}

/// Locate the first JSON-array-shaped substring: first `[` through last `]`.
pub fn extract_first_json_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    (end > start).then(|| &text[start..=end])
}

/// Turn raw model output into highlights.
///
/// No array in the text yields an empty list; an array that does not parse
/// is an error. Elements are kept as written, whatever their shape.
pub fn parse_highlights(raw: &str) -> Result<Vec<Highlight>, serde_json::Error> {
    match extract_first_json_array(raw) {
        Some(array) => serde_json::from_str(array),
        None => {
            warn!(
                response_len = raw.len(),
                "Model response contained no JSON array; returning no highlights"
            );
            Ok(Vec::new())
        }
    }
}

/// An extracted audio file that is deleted when the analysis ends.
pub struct AudioArtifact {
    path: PathBuf,
    removed: bool,
}

impl AudioArtifact {
    /// Reserve a unique audio path inside `dir`. Nothing is created yet.
    pub fn new(dir: &Path) -> Self {
        let suffix = Uuid::new_v4().simple().to_string();
        let name = format!("audio_{}_{}.mp3", Utc::now().timestamp_millis(), &suffix[..8]);
        Self {
            path: dir.join(name),
            removed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the file. A file that was never created is not an error.
    pub async fn remove(mut self) {
        self.removed = true;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => debug!(path = %self.path.display(), "Removed audio file"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), "Failed to remove audio file: {}", e),
        }
    }
}

impl Drop for AudioArtifact {
    fn drop(&mut self) {
        if self.removed {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Removed audio file on drop"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), "Failed to remove audio file: {}", e),
        }
    }
}

/// Orchestrates one highlight analysis.
pub struct HighlightPipeline {
    media: Arc<dyn MediaTool>,
    transcoder: Arc<dyn Transcoder>,
    transcriber: Arc<dyn Transcriber>,
    reasoner: Arc<dyn HighlightReasoner>,
    audio_dir: PathBuf,
}

impl HighlightPipeline {
    pub fn new(
        media: Arc<dyn MediaTool>,
        transcoder: Arc<dyn Transcoder>,
        transcriber: Arc<dyn Transcriber>,
        reasoner: Arc<dyn HighlightReasoner>,
        audio_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            media,
            transcoder,
            transcriber,
            reasoner,
            audio_dir: audio_dir.into(),
        }
    }

    /// Analyze the first ten minutes of `url` and propose highlights.
    pub async fn analyze(&self, url: &str) -> Result<HighlightAnalysis, PipelineError> {
        let started = Instant::now();
        let audio = AudioArtifact::new(&self.audio_dir);

        let result = self.run(url, audio.path()).await;
        audio.remove().await;

        let outcome = match &result {
            Ok(_) => "success",
            Err(e) => e.outcome(),
        };
        metrics::record_pipeline_outcome(outcome, started.elapsed().as_secs_f64());

        result
    }

    async fn run(&self, url: &str, audio_path: &Path) -> Result<HighlightAnalysis, PipelineError> {
        info!(url = %url, "Starting highlight analysis");

        self.extract_audio(url, audio_path)
            .await
            .map_err(PipelineError::Tool)?;

        let transcription = self
            .transcriber
            .transcribe(audio_path)
            .await
            .map_err(PipelineError::Api)?;

        let transcript = transcription.timestamped();
        debug!(
            segments = transcription.segments.len(),
            "Built timestamped transcript"
        );

        let raw = self
            .reasoner
            .propose_highlights(&transcript)
            .await
            .map_err(PipelineError::Api)?;

        let highlights = parse_highlights(&raw).map_err(PipelineError::Parse)?;
        for highlight in &highlights {
            debug!(
                start = ?highlight.start(),
                end = ?highlight.end(),
                score = ?highlight.score(),
                title = highlight.title().unwrap_or_default(),
                "Proposed highlight"
            );
        }

        info!(
            url = %url,
            highlights = highlights.len(),
            well_formed = highlights.iter().filter(|h| h.is_well_formed()).count(),
            "Highlight analysis complete"
        );

        Ok(HighlightAnalysis {
            full_transcript: transcription.full_text,
            highlights,
        })
    }

    async fn extract_audio(&self, url: &str, output: &Path) -> Result<(), MediaError> {
        tokio::fs::create_dir_all(&self.audio_dir).await?;

        let spec = TrimSpec::new(0.0, MAX_ANALYSIS_SECONDS, EncodeProfile::SpeechAudio);
        let stream = self.media.fetch_stream(url, StreamFormat::AudioOnly).await?;
        self.transcoder.trim(stream, &spec, output).await
    }
}
