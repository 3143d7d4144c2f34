//! OpenAI-compatible HTTP client.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use hclip_models::{TranscriptSegment, Transcription};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use tracing::{debug, info, warn};

use crate::error::{AiError, AiResult};
use crate::prompt::{build_highlight_prompt, SYSTEM_PROMPT};
use crate::traits::{HighlightReasoner, Transcriber};
use crate::types::{ChatMessage, ChatRequest, ChatResponse, VerboseTranscription};

/// Longest error body kept from a failed API call.
const MAX_ERROR_BODY: usize = 512;

/// Configuration for the AI client.
#[derive(Clone)]
pub struct AiClientConfig {
    /// Bearer credential; `None` means the service is not configured
    pub api_key: Option<String>,
    /// API base URL, without trailing slash
    pub base_url: String,
    /// Speech-to-text model
    pub transcription_model: String,
    /// Chat model used for highlight reasoning
    pub reasoning_model: String,
    /// Sampling temperature for highlight reasoning
    pub temperature: f32,
    /// Per-request timeout
    pub timeout: Duration,
}

impl std::fmt::Debug for AiClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiClientConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("transcription_model", &self.transcription_model)
            .field("reasoning_model", &self.reasoning_model)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for AiClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            transcription_model: "whisper-1".to_string(),
            reasoning_model: "gpt-4o-mini".to_string(),
            temperature: 0.3,
            timeout: Duration::from_secs(300), // long audio uploads
        }
    }
}

impl AiClientConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: std::env::var("OPENAI_API_KEY")
                .ok()
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty()),
            base_url: std::env::var("OPENAI_BASE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            transcription_model: std::env::var("TRANSCRIPTION_MODEL")
                .unwrap_or(defaults.transcription_model),
            reasoning_model: std::env::var("REASONING_MODEL").unwrap_or(defaults.reasoning_model),
            temperature: std::env::var("REASONING_TEMPERATURE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.temperature),
            timeout: Duration::from_secs(
                std::env::var("AI_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(300),
            ),
        }
    }

    /// Whether a credential is present.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Client for an OpenAI-compatible transcription and chat API.
pub struct OpenAiClient {
    http: Client,
    api_key: String,
    config: AiClientConfig,
}

impl OpenAiClient {
    /// Create a new client. Fails with `NotConfigured` without a credential.
    pub fn new(config: AiClientConfig) -> AiResult<Self> {
        let api_key = config.api_key.clone().ok_or(AiError::NotConfigured)?;
        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http,
            api_key,
            config,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn check_status(response: Response) -> AiResult<Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let mut body = response.text().await.unwrap_or_default();
        if body.len() > MAX_ERROR_BODY {
            let mut cut = MAX_ERROR_BODY;
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            body.truncate(cut);
        }
        warn!(status, "AI service request failed");
        Err(AiError::Api { status, body })
    }
}

#[async_trait]
impl Transcriber for OpenAiClient {
    async fn transcribe(&self, audio_path: &Path) -> AiResult<Transcription> {
        let bytes = tokio::fs::read(audio_path).await?;
        let file_name = audio_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "audio.mp3".to_string());

        debug!(
            path = %audio_path.display(),
            size = bytes.len(),
            model = %self.config.transcription_model,
            "Uploading audio for transcription"
        );

        let file = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("audio/mpeg")?;
        let form = Form::new()
            .text("model", self.config.transcription_model.clone())
            .text("response_format", "verbose_json")
            .text("timestamp_granularities[]", "segment")
            .part("file", file);

        let response = self
            .http
            .post(self.endpoint("audio/transcriptions"))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let body = response.text().await?;
        let parsed: VerboseTranscription = serde_json::from_str(&body)
            .map_err(|e| AiError::invalid_response(format!("transcription body: {e}")))?;

        let segments: Vec<TranscriptSegment> = parsed
            .segments
            .into_iter()
            .map(|s| TranscriptSegment {
                start_seconds: s.start,
                end_seconds: s.end,
                text: s.text,
            })
            .collect();

        info!(
            segments = segments.len(),
            chars = parsed.text.len(),
            "Transcription complete"
        );

        Ok(Transcription {
            full_text: parsed.text,
            segments,
        })
    }
}

#[async_trait]
impl HighlightReasoner for OpenAiClient {
    async fn propose_highlights(&self, timestamped_transcript: &str) -> AiResult<String> {
        let prompt = build_highlight_prompt(timestamped_transcript);
        let request = ChatRequest {
            model: &self.config.reasoning_model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            temperature: self.config.temperature,
        };

        debug!(model = %self.config.reasoning_model, "Requesting highlight proposals");

        let response = self
            .http
            .post(self.endpoint("chat/completions"))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let body = response.text().await?;
        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| AiError::invalid_response(format!("chat completion body: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| AiError::invalid_response("chat completion has no message content"))
    }
}
