//! Highlight analysis handler.

use axum::extract::State;
use axum::Json;
use hclip_models::Highlight;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::handlers::require_url;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeVideoRequest {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeVideoResponse {
    pub success: bool,
    pub transcription: String,
    pub highlights: Vec<Highlight>,
}

/// Transcribe the first ten minutes of a video and propose highlights.
pub async fn analyze_video(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeVideoRequest>,
) -> ApiResult<Json<AnalyzeVideoResponse>> {
    let url = require_url(request.url)?;
    let pipeline = state.pipeline.as_ref().ok_or(ApiError::NotConfigured)?;

    let analysis = pipeline.analyze(&url).await?;

    Ok(Json(AnalyzeVideoResponse {
        success: true,
        transcription: analysis.full_transcript,
        highlights: analysis.highlights,
    }))
}
