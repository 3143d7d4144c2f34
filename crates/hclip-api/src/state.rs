//! Application state.

use std::sync::Arc;

use hclip_ai::{HighlightReasoner, OpenAiClient, Transcriber};
use hclip_media::{Ffmpeg, FfmpegConfig, MediaTool, Transcoder, YtDlp, YtDlpConfig};
use tracing::{info, warn};

use crate::config::ApiConfig;
use crate::services::{ClipService, HighlightPipeline};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ApiConfig>,
    pub media: Arc<dyn MediaTool>,
    pub clips: Arc<ClipService>,
    /// `None` when no AI credential is configured
    pub pipeline: Option<Arc<HighlightPipeline>>,
}

impl AppState {
    /// Create application state backed by yt-dlp, FFmpeg and the hosted AI API.
    pub fn new(config: ApiConfig) -> anyhow::Result<Self> {
        let media: Arc<dyn MediaTool> = Arc::new(YtDlp::new(YtDlpConfig {
            probe_timeout: config.probe_timeout,
            ..Default::default()
        }));
        let transcoder: Arc<dyn Transcoder> = Arc::new(Ffmpeg::new(FfmpegConfig {
            timeout: config.transcode_timeout,
            ..Default::default()
        }));

        let ai = if config.ai_enabled() {
            let client = Arc::new(OpenAiClient::new(config.ai.clone())?);
            info!(
                base_url = %config.ai.base_url,
                transcription_model = %config.ai.transcription_model,
                reasoning_model = %config.ai.reasoning_model,
                "AI service enabled"
            );
            Some((
                client.clone() as Arc<dyn Transcriber>,
                client as Arc<dyn HighlightReasoner>,
            ))
        } else {
            warn!("OPENAI_API_KEY not set; highlight analysis is disabled");
            None
        };

        Ok(Self::from_parts(config, media, transcoder, ai))
    }

    /// Assemble state from explicit collaborators.
    pub fn from_parts(
        config: ApiConfig,
        media: Arc<dyn MediaTool>,
        transcoder: Arc<dyn Transcoder>,
        ai: Option<(Arc<dyn Transcriber>, Arc<dyn HighlightReasoner>)>,
    ) -> Self {
        let pipeline = ai.map(|(transcriber, reasoner)| {
            Arc::new(HighlightPipeline::new(
                media.clone(),
                transcoder.clone(),
                transcriber,
                reasoner,
                config.audio_dir.clone(),
            ))
        });
        let clips = Arc::new(ClipService::new(
            media.clone(),
            transcoder,
            config.clips_dir.clone(),
        ));

        Self {
            config: Arc::new(config),
            media,
            clips,
            pipeline,
        }
    }

    /// Whether highlight analysis is available.
    pub fn ai_enabled(&self) -> bool {
        self.pipeline.is_some()
    }
}
