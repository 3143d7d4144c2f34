//! Business logic services.

pub mod clips;
pub mod janitor;
pub mod pipeline;

pub use clips::ClipService;
pub use janitor::Janitor;
pub use pipeline::{
    extract_first_json_array, parse_highlights, AudioArtifact, HighlightPipeline, PipelineError,
    MAX_ANALYSIS_SECONDS,
};
