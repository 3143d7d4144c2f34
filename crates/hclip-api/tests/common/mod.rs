//! Shared fakes and helpers for API integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use hclip_ai::{AiError, AiResult, HighlightReasoner, Transcriber};
use hclip_api::{create_router, ApiConfig, AppState};
use hclip_media::ytdlp::parse_probe_output;
use hclip_media::{MediaError, MediaResult, MediaStream, MediaTool, StreamFormat, Transcoder, TrimSpec};
use hclip_models::{TranscriptSegment, Transcription, VideoMetadata};
use tempfile::TempDir;
use tower::ServiceExt;

/// What the fake media tool returns from `probe`.
pub enum ProbeBehavior {
    Metadata(VideoMetadata),
    /// yt-dlp printed something that is not JSON
    Malformed,
    /// yt-dlp exited non-zero
    Fails,
}

pub struct FakeMedia {
    probe: ProbeBehavior,
    stream_fails: bool,
    pub probe_calls: AtomicUsize,
    pub stream_calls: AtomicUsize,
    pub formats: Mutex<Vec<StreamFormat>>,
}

impl FakeMedia {
    pub fn new(probe: ProbeBehavior) -> Self {
        Self {
            probe,
            stream_fails: false,
            probe_calls: AtomicUsize::new(0),
            stream_calls: AtomicUsize::new(0),
            formats: Mutex::new(Vec::new()),
        }
    }

    pub fn working() -> Self {
        Self::new(ProbeBehavior::Metadata(VideoMetadata {
            title: "Test Video".to_string(),
            duration_seconds: 212.0,
            thumbnail_url: "https://i.ytimg.com/vi/abc/hq.jpg".to_string(),
            author: "Test Channel".to_string(),
        }))
    }

    pub fn failing_stream() -> Self {
        Self {
            stream_fails: true,
            ..Self::working()
        }
    }

    pub fn calls(&self) -> usize {
        self.probe_calls.load(Ordering::SeqCst) + self.stream_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaTool for FakeMedia {
    async fn probe(&self, _url: &str) -> MediaResult<VideoMetadata> {
        self.probe_calls.fetch_add(1, Ordering::SeqCst);
        match &self.probe {
            ProbeBehavior::Metadata(m) => Ok(m.clone()),
            ProbeBehavior::Malformed => parse_probe_output(b"WARNING: not json at all"),
            ProbeBehavior::Fails => Err(MediaError::tool_failed(
                "yt-dlp",
                "ERROR: Video unavailable",
                Some(1),
            )),
        }
    }

    async fn fetch_stream(&self, _url: &str, format: StreamFormat) -> MediaResult<MediaStream> {
        self.stream_calls.fetch_add(1, Ordering::SeqCst);
        self.formats.lock().unwrap().push(format);
        if self.stream_fails {
            return Err(MediaError::tool_failed("yt-dlp", "ERROR: Unsupported URL", Some(1)));
        }
        Ok(Box::new(std::io::Cursor::new(b"fake media bytes".to_vec())))
    }
}

/// What the fake transcoder does with its output path.
#[derive(Clone, Copy, PartialEq)]
pub enum TranscodeBehavior {
    WritesOutput,
    /// Reports success without writing anything
    SilentlyWritesNothing,
    Fails,
}

pub struct FakeTranscoder {
    behavior: TranscodeBehavior,
    pub calls: AtomicUsize,
    pub outputs: Mutex<Vec<PathBuf>>,
    pub specs: Mutex<Vec<TrimSpec>>,
}

impl FakeTranscoder {
    pub fn new(behavior: TranscodeBehavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
            outputs: Mutex::new(Vec::new()),
            specs: Mutex::new(Vec::new()),
        }
    }

    pub fn last_output(&self) -> Option<PathBuf> {
        self.outputs.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Transcoder for FakeTranscoder {
    async fn trim(&self, mut input: MediaStream, spec: &TrimSpec, output: &Path) -> MediaResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outputs.lock().unwrap().push(output.to_path_buf());
        self.specs.lock().unwrap().push(*spec);
        spec.validate()?;

        let mut bytes = Vec::new();
        tokio::io::AsyncReadExt::read_to_end(&mut input, &mut bytes).await?;

        match self.behavior {
            TranscodeBehavior::WritesOutput => {
                tokio::fs::write(output, &bytes).await?;
                Ok(())
            }
            TranscodeBehavior::SilentlyWritesNothing => Ok(()),
            TranscodeBehavior::Fails => Err(MediaError::tool_failed(
                "ffmpeg",
                "pipe:0: Invalid data found when processing input",
                Some(1),
            )),
        }
    }
}

pub struct FakeTranscriber {
    fails: bool,
    pub calls: AtomicUsize,
    /// Whether the audio file existed when transcription was requested
    pub saw_audio_file: AtomicBool,
    pub audio_paths: Mutex<Vec<PathBuf>>,
}

impl FakeTranscriber {
    pub fn new() -> Self {
        Self {
            fails: false,
            calls: AtomicUsize::new(0),
            saw_audio_file: AtomicBool::new(false),
            audio_paths: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fails: true,
            ..Self::new()
        }
    }

    pub fn transcription() -> Transcription {
        Transcription {
            full_text: "Welcome to the show. Today we build a rocket.".to_string(),
            segments: vec![
                TranscriptSegment::new(0.0, " Welcome to the show."),
                TranscriptSegment::new(12.7, " Today we build a rocket."),
            ],
        }
    }

    pub fn last_audio_path(&self) -> Option<PathBuf> {
        self.audio_paths.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Transcriber for FakeTranscriber {
    async fn transcribe(&self, audio_path: &Path) -> AiResult<Transcription> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.audio_paths.lock().unwrap().push(audio_path.to_path_buf());
        self.saw_audio_file
            .store(audio_path.exists(), Ordering::SeqCst);

        if self.fails {
            return Err(AiError::Api {
                status: 500,
                body: "transcription backend unavailable".to_string(),
            });
        }
        Ok(Self::transcription())
    }
}

pub struct FakeReasoner {
    reply: Option<String>,
    pub calls: AtomicUsize,
    pub transcripts: Mutex<Vec<String>>,
}

impl FakeReasoner {
    /// Replies with `reply` verbatim.
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            calls: AtomicUsize::new(0),
            transcripts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            calls: AtomicUsize::new(0),
            transcripts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl HighlightReasoner for FakeReasoner {
    async fn propose_highlights(&self, timestamped_transcript: &str) -> AiResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.transcripts
            .lock()
            .unwrap()
            .push(timestamped_transcript.to_string());

        self.reply.clone().ok_or_else(|| AiError::Api {
            status: 429,
            body: "rate limited".to_string(),
        })
    }
}

pub const GOOD_REPLY: &str = r#"Here you go:
[{"start": 12, "end": 40, "title": "Rocket intro", "reason": "Sets up the build", "score": 88},
 {"start": 90, "end": 130, "title": "Launch", "reason": "Payoff", "score": 95}]"#;

/// Config rooted in a temporary directory.
pub fn test_config(dir: &TempDir) -> ApiConfig {
    ApiConfig {
        audio_dir: dir.path().join("audio"),
        clips_dir: dir.path().join("clips"),
        metrics_enabled: false,
        ..Default::default()
    }
}

/// Number of entries in a directory, zero when it does not exist.
pub fn entry_count(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}

pub struct TestApp {
    pub dir: TempDir,
    pub router: Router,
    pub config: ApiConfig,
}

impl TestApp {
    pub fn new(
        media: Arc<FakeMedia>,
        transcoder: Arc<FakeTranscoder>,
        ai: Option<(Arc<FakeTranscriber>, Arc<FakeReasoner>)>,
    ) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&dir);
        let ai = ai.map(|(t, r)| {
            (
                t as Arc<dyn Transcriber>,
                r as Arc<dyn HighlightReasoner>,
            )
        });
        let state = AppState::from_parts(config.clone(), media, transcoder, ai);
        let router = create_router(state, None);

        Self {
            dir,
            router,
            config,
        }
    }

    pub async fn post_json(&self, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }
}
