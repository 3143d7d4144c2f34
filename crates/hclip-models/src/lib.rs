//! Shared data models for the hclip service.
//!
//! This crate provides Serde-serializable types for:
//! - Remote video metadata
//! - Transcripts and their timestamped rendering
//! - AI-proposed highlights
//! - Clip requests, artifacts and filename sanitization

pub mod clip;
pub mod highlight;
pub mod transcript;
pub mod video;

// Re-export common types
pub use clip::{clip_filename, sanitize_clip_name, ClipArtifact, ClipRequest, DEFAULT_CLIP_NAME, MAX_CLIP_NAME_LEN};
pub use highlight::{Highlight, HighlightAnalysis};
pub use transcript::{timestamped_transcript, TranscriptSegment, Transcription};
pub use video::VideoMetadata;
