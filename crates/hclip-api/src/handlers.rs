//! Request handlers.

pub mod analysis;
pub mod clips;
pub mod health;
pub mod video_info;

pub use analysis::*;
pub use clips::*;
pub use health::*;
pub use video_info::*;

use crate::error::{ApiError, ApiResult};

/// Require a non-empty `url` field.
pub(crate) fn require_url(url: Option<String>) -> ApiResult<String> {
    match url.map(|u| u.trim().to_string()) {
        Some(url) if !url.is_empty() => Ok(url),
        _ => Err(ApiError::validation("URL is required")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_url() {
        assert_eq!(
            require_url(Some(" https://youtu.be/abc ".to_string())).unwrap(),
            "https://youtu.be/abc"
        );
        assert!(require_url(None).is_err());
        assert!(require_url(Some("   ".to_string())).is_err());
    }
}
