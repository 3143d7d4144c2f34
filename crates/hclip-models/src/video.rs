//! Video metadata models.

use serde::{Deserialize, Serialize};

/// Metadata describing a remote video, as reported by the download tool.
///
/// Produced transiently per request and never persisted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VideoMetadata {
    /// Video title
    pub title: String,

    /// Duration in seconds (0 when unknown, e.g. live streams)
    pub duration_seconds: f64,

    /// Thumbnail URL
    pub thumbnail_url: String,

    /// Uploader / channel name
    pub author: String,
}
