//! API configuration.

use std::path::PathBuf;
use std::time::Duration;

use hclip_ai::AiClientConfig;

/// Janitor configuration.
#[derive(Debug, Clone)]
pub struct JanitorConfig {
    /// Whether the background sweep runs at all
    pub enabled: bool,
    /// Time between sweeps
    pub interval: Duration,
    /// Entries last modified longer ago than this are removed
    pub max_age: Duration,
}

impl Default for JanitorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: Duration::from_secs(30 * 60),
            max_age: Duration::from_secs(60 * 60),
        }
    }
}

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Max request body size
    pub max_body_size: usize,
    /// Working directory for extracted audio
    pub audio_dir: PathBuf,
    /// Working directory for produced clips, served under `/downloads`
    pub clips_dir: PathBuf,
    /// yt-dlp metadata probe timeout
    pub probe_timeout: Duration,
    /// FFmpeg timeout for one trim
    pub transcode_timeout: Duration,
    /// Whether `/metrics` is exposed
    pub metrics_enabled: bool,
    /// Janitor settings
    pub janitor: JanitorConfig,
    /// Hosted AI service settings
    pub ai: AiClientConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            cors_origins: vec!["*".to_string()],
            max_body_size: 1024 * 1024, // 1MB
            audio_dir: PathBuf::from("./temp"),
            clips_dir: PathBuf::from("./downloads"),
            probe_timeout: Duration::from_secs(60),
            transcode_timeout: Duration::from_secs(300),
            metrics_enabled: true,
            janitor: JanitorConfig::default(),
            ai: AiClientConfig::default(),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

fn env_flag(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(default)
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("API_HOST").unwrap_or(defaults.host),
            port: env_parse("PORT")
                .or_else(|| env_parse("API_PORT"))
                .unwrap_or(defaults.port),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or(defaults.cors_origins),
            max_body_size: env_parse("MAX_BODY_SIZE").unwrap_or(defaults.max_body_size),
            audio_dir: std::env::var("AUDIO_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.audio_dir),
            clips_dir: std::env::var("CLIPS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.clips_dir),
            probe_timeout: env_parse("PROBE_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.probe_timeout),
            transcode_timeout: env_parse("TRANSCODE_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.transcode_timeout),
            metrics_enabled: env_flag("METRICS_ENABLED", defaults.metrics_enabled),
            janitor: JanitorConfig {
                enabled: env_flag("JANITOR_ENABLED", true),
                interval: env_parse("JANITOR_INTERVAL_SECS")
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.janitor.interval),
                max_age: env_parse("JANITOR_MAX_AGE_SECS")
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.janitor.max_age),
            },
            ai: AiClientConfig::from_env(),
        }
    }

    /// Whether a credential for the hosted AI service is present.
    pub fn ai_enabled(&self) -> bool {
        self.ai.is_configured()
    }
}
