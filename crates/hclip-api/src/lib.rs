//! Axum HTTP API server.
//!
//! This crate provides:
//! - Video metadata lookup backed by yt-dlp
//! - Highlight analysis (audio extraction, transcription, model reasoning)
//! - Clip creation and static download of the produced files
//! - A background janitor reclaiming stale working files

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

pub use config::{ApiConfig, JanitorConfig};
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use services::{
    extract_first_json_array, ClipService, HighlightPipeline, Janitor, PipelineError,
    MAX_ANALYSIS_SECONDS,
};
pub use state::AppState;
