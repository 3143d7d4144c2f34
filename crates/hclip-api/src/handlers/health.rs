//! Health check handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use hclip_media::{check_ffmpeg, check_ytdlp, MediaResult};
use serde::Serialize;

use crate::state::AppState;

/// Health response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub ai: &'static str,
    pub version: &'static str,
}

/// Health check endpoint (liveness probe).
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "online",
        ai: if state.ai_enabled() { "enabled" } else { "disabled" },
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Readiness check response.
#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    pub checks: ReadinessChecks,
}

#[derive(Serialize)]
pub struct ReadinessChecks {
    #[serde(rename = "yt-dlp")]
    pub ytdlp: CheckStatus,
    pub ffmpeg: CheckStatus,
}

#[derive(Serialize)]
pub struct CheckStatus {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CheckStatus {
    fn from_lookup(result: MediaResult<std::path::PathBuf>) -> Self {
        match result {
            Ok(path) => Self {
                status: "ok",
                path: Some(path.display().to_string()),
                error: None,
            },
            Err(e) => Self {
                status: "error",
                path: None,
                error: Some(e.to_string()),
            },
        }
    }

    fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// Readiness check endpoint: both external tools must be on `PATH`.
pub async fn ready() -> (StatusCode, Json<ReadinessResponse>) {
    let checks = ReadinessChecks {
        ytdlp: CheckStatus::from_lookup(check_ytdlp()),
        ffmpeg: CheckStatus::from_lookup(check_ffmpeg()),
    };

    let (status_code, status) = if checks.ytdlp.is_ok() && checks.ffmpeg.is_ok() {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (status_code, Json(ReadinessResponse { status, checks }))
}
