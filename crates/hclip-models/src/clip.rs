//! Clip request and artifact models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Name used when a request does not provide one.
pub const DEFAULT_CLIP_NAME: &str = "clip";

/// Maximum length of the sanitized name part of a clip filename.
pub const MAX_CLIP_NAME_LEN: usize = 50;

/// A validated request to cut a sub-clip out of a remote video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipRequest {
    /// Source video URL
    pub url: String,

    /// Start offset in seconds (>= 0)
    pub start_seconds: f64,

    /// Clip length in seconds (> 0)
    pub duration_seconds: f64,

    /// Human-readable name, unsanitized
    pub name: String,
}

/// A clip written to the clips working directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipArtifact {
    /// File name inside the clips directory
    pub filename: String,

    /// Public retrieval path
    pub download_url: String,
}

impl ClipArtifact {
    /// Build the artifact for a filename served under `/downloads`.
    pub fn new(filename: impl Into<String>) -> Self {
        let filename = filename.into();
        Self {
            download_url: format!("/downloads/{}", filename),
            filename,
        }
    }
}

/// Strip everything outside `[A-Za-z0-9_-]` and truncate to 50 characters.
pub fn sanitize_clip_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .take(MAX_CLIP_NAME_LEN)
        .collect()
}

/// Deterministic clip filename: sanitized name plus a millisecond timestamp.
///
/// Uniqueness is probabilistic: two requests with the same name in the same
/// millisecond collide.
pub fn clip_filename(name: &str, created_at: DateTime<Utc>) -> String {
    format!(
        "{}_{}.mp4",
        sanitize_clip_name(name),
        created_at.timestamp_millis()
    )
}
