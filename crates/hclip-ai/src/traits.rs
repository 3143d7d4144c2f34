//! Capabilities the highlight pipeline depends on.

use std::path::Path;

use async_trait::async_trait;
use hclip_models::Transcription;

use crate::error::AiResult;

/// Speech-to-text over an audio file.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe an audio file into full text plus ordered segments.
    async fn transcribe(&self, audio_path: &Path) -> AiResult<Transcription>;
}

/// Language-model highlight proposals.
#[async_trait]
pub trait HighlightReasoner: Send + Sync {
    /// Ask the model for highlights; returns its reply text unvalidated.
    async fn propose_highlights(&self, timestamped_transcript: &str) -> AiResult<String>;
}
