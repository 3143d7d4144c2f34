//! Video metadata handler.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ApiResult;
use crate::handlers::require_url;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct VideoInfoRequest {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VideoInfoResponse {
    pub success: bool,
    pub title: String,
    pub duration: f64,
    pub thumbnail: String,
    pub author: String,
}

/// Look up title, duration, thumbnail and author of a video.
pub async fn video_info(
    State(state): State<AppState>,
    Json(request): Json<VideoInfoRequest>,
) -> ApiResult<Json<VideoInfoResponse>> {
    let url = require_url(request.url)?;
    let metadata = state.media.probe(&url).await.inspect_err(|e| {
        warn!(url = %url, not_found = e.is_not_found(), "Video lookup failed: {}", e);
    })?;

    Ok(Json(VideoInfoResponse {
        success: true,
        title: metadata.title,
        duration: metadata.duration_seconds,
        thumbnail: metadata.thumbnail_url,
        author: metadata.author,
    }))
}
