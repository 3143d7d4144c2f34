//! Clip creation.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use hclip_media::{
    EncodeProfile, MediaError, MediaResult, MediaTool, StreamFormat, Transcoder, TrimSpec,
};
use hclip_models::{clip_filename, ClipArtifact, ClipRequest};
use tracing::{info, warn};

use crate::metrics;

/// Height ceiling for the source stream of a clip.
pub const CLIP_MAX_HEIGHT: u32 = 720;

/// Cuts sub-clips out of remote videos into the clips directory.
pub struct ClipService {
    media: Arc<dyn MediaTool>,
    transcoder: Arc<dyn Transcoder>,
    clips_dir: PathBuf,
}

impl ClipService {
    pub fn new(
        media: Arc<dyn MediaTool>,
        transcoder: Arc<dyn Transcoder>,
        clips_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            media,
            transcoder,
            clips_dir: clips_dir.into(),
        }
    }

    /// Create a clip and return where it can be downloaded.
    ///
    /// The clip only counts as created once the output file is on disk;
    /// a transcoder that exits cleanly without writing it is a failure.
    pub async fn create_clip(&self, request: &ClipRequest) -> MediaResult<ClipArtifact> {
        let started = Instant::now();
        let result = self.cut(request).await;

        let outcome = if result.is_ok() { "success" } else { "error" };
        metrics::record_clip_outcome(outcome, started.elapsed().as_secs_f64());

        result
    }

    async fn cut(&self, request: &ClipRequest) -> MediaResult<ClipArtifact> {
        let spec = TrimSpec::new(
            request.start_seconds,
            request.duration_seconds,
            EncodeProfile::FastVideo,
        );
        spec.validate()?;

        let filename = clip_filename(&request.name, Utc::now());
        let output = self.clips_dir.join(&filename);

        info!(
            url = %request.url,
            start = request.start_seconds,
            duration = request.duration_seconds,
            filename = %filename,
            "Creating clip"
        );

        tokio::fs::create_dir_all(&self.clips_dir).await?;

        let stream = self
            .media
            .fetch_stream(
                &request.url,
                StreamFormat::Video {
                    max_height: CLIP_MAX_HEIGHT,
                },
            )
            .await?;
        self.transcoder.trim(stream, &spec, &output).await?;

        if !tokio::fs::try_exists(&output).await.unwrap_or(false) {
            warn!(path = %output.display(), "Transcoder succeeded but produced no file");
            return Err(MediaError::MissingOutput(output));
        }

        info!(filename = %filename, "Clip created");
        Ok(ClipArtifact::new(filename))
    }
}
