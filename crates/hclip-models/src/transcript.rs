//! Transcript models.

use serde::{Deserialize, Serialize};

/// A time-bounded chunk of transcribed speech.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Offset from the start of the audio, in seconds
    pub start_seconds: f64,

    /// End offset in seconds, when the provider reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_seconds: Option<f64>,

    /// Spoken text
    pub text: String,
}

impl TranscriptSegment {
    pub fn new(start_seconds: f64, text: impl Into<String>) -> Self {
        Self {
            start_seconds,
            end_seconds: None,
            text: text.into(),
        }
    }
}

/// Result of transcribing one audio file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Transcription {
    /// Entire transcript as a single string
    pub full_text: String,

    /// Segments in chronological order
    pub segments: Vec<TranscriptSegment>,
}

impl Transcription {
    /// Render this transcription in the timestamped form used for prompting.
    pub fn timestamped(&self) -> String {
        timestamped_transcript(&self.segments)
    }
}

/// Render segments as `[<whole seconds>s]: <text>` lines, preserving order.
pub fn timestamped_transcript(segments: &[TranscriptSegment]) -> String {
    segments
        .iter()
        .map(|s| format!("[{}s]: {}", s.start_seconds.max(0.0).floor() as u64, s.text.trim()))
        .collect::<Vec<_>>()
        .join("\n")
}
