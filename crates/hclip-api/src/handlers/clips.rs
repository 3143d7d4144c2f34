//! Clip creation handler.

use axum::extract::State;
use axum::Json;
use hclip_models::{ClipRequest, DEFAULT_CLIP_NAME};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::handlers::require_url;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateClipRequest {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub start_time: Option<f64>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub clip_name: Option<String>,
}

impl CreateClipRequest {
    fn validate(self) -> ApiResult<ClipRequest> {
        let url = require_url(self.url)?;

        let start_seconds = match self.start_time {
            Some(t) if t.is_finite() && t >= 0.0 => t,
            _ => return Err(ApiError::validation("startTime must be a number >= 0")),
        };
        let duration_seconds = match self.duration {
            Some(d) if d.is_finite() && d > 0.0 => d,
            _ => return Err(ApiError::validation("duration must be a number > 0")),
        };

        let name = self
            .clip_name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CLIP_NAME.to_string());

        Ok(ClipRequest {
            url,
            start_seconds,
            duration_seconds,
            name,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateClipResponse {
    pub success: bool,
    pub download_url: String,
    pub filename: String,
}

/// Cut `[startTime, startTime + duration)` out of a video.
pub async fn create_clip(
    State(state): State<AppState>,
    Json(request): Json<CreateClipRequest>,
) -> ApiResult<Json<CreateClipResponse>> {
    let request = request.validate()?;
    let artifact = state.clips.create_clip(&request).await?;

    Ok(Json(CreateClipResponse {
        success: true,
        download_url: artifact.download_url,
        filename: artifact.filename,
    }))
}
