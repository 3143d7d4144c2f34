//! Error types for media operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur while running the external media tools.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("{0} not found in PATH")]
    ToolNotFound(&'static str),

    #[error("{tool} failed: {message}")]
    ToolFailed {
        tool: &'static str,
        message: String,
        exit_code: Option<i32>,
    },

    #[error("{tool} timed out after {secs} seconds")]
    Timeout { tool: &'static str, secs: u64 },

    #[error("{tool} produced more than {limit} bytes of diagnostic output")]
    OutputLimit { tool: &'static str, limit: usize },

    #[error("Could not parse {tool} output: {source}")]
    Parse {
        tool: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Output file was not created: {}", .0.display())]
    MissingOutput(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MediaError {
    /// Create a tool failure error.
    pub fn tool_failed(tool: &'static str, message: impl Into<String>, exit_code: Option<i32>) -> Self {
        Self::ToolFailed {
            tool,
            message: message.into(),
            exit_code,
        }
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Whether the failure means the requested video could not be resolved.
    pub fn is_not_found(&self) -> bool {
        match self {
            MediaError::ToolFailed { message, .. } => {
                let msg = message.to_lowercase();
                msg.contains("video unavailable")
                    || msg.contains("not found")
                    || msg.contains("unsupported url")
                    || msg.contains("private video")
            }
            _ => false,
        }
    }
}
