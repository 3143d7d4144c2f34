//! Highlight pipeline tests against fake collaborators.

mod common;

use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use common::*;
use hclip_api::{HighlightPipeline, PipelineError, MAX_ANALYSIS_SECONDS};
use hclip_media::{EncodeProfile, StreamFormat};
use tempfile::TempDir;

struct Harness {
    _dir: TempDir,
    audio_dir: PathBuf,
    media: Arc<FakeMedia>,
    transcoder: Arc<FakeTranscoder>,
    transcriber: Arc<FakeTranscriber>,
    reasoner: Arc<FakeReasoner>,
    pipeline: HighlightPipeline,
}

impl Harness {
    fn new(
        media: FakeMedia,
        transcoder: TranscodeBehavior,
        transcriber: FakeTranscriber,
        reasoner: FakeReasoner,
    ) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let audio_dir = dir.path().join("audio");
        let media = Arc::new(media);
        let transcoder = Arc::new(FakeTranscoder::new(transcoder));
        let transcriber = Arc::new(transcriber);
        let reasoner = Arc::new(reasoner);
        let pipeline = HighlightPipeline::new(
            media.clone(),
            transcoder.clone(),
            transcriber.clone(),
            reasoner.clone(),
            audio_dir.clone(),
        );

        Self {
            _dir: dir,
            audio_dir,
            media,
            transcoder,
            transcriber,
            reasoner,
            pipeline,
        }
    }

    fn replying(reply: &str) -> Self {
        Self::new(
            FakeMedia::working(),
            TranscodeBehavior::WritesOutput,
            FakeTranscriber::new(),
            FakeReasoner::replying(reply),
        )
    }

    fn assert_no_audio_left(&self) {
        assert_eq!(entry_count(&self.audio_dir), 0, "audio directory is not empty");
        if let Some(path) = self.transcoder.last_output() {
            assert!(!path.exists(), "audio file survived: {}", path.display());
        }
    }
}

#[tokio::test]
async fn test_success_returns_transcript_and_highlights() {
    let h = Harness::replying(GOOD_REPLY);

    let analysis = h.pipeline.analyze("https://youtu.be/abc").await.unwrap();

    assert_eq!(analysis.full_transcript, FakeTranscriber::transcription().full_text);
    assert_eq!(analysis.highlights.len(), 2);
    assert_eq!(analysis.highlights[0].title(), Some("Rocket intro"));
    assert_eq!(analysis.highlights[1].score(), Some(95.0));

    assert!(h.transcriber.saw_audio_file.load(Ordering::SeqCst));
    h.assert_no_audio_left();
}

#[tokio::test]
async fn test_extracts_first_ten_minutes_of_audio() {
    let h = Harness::replying(GOOD_REPLY);

    h.pipeline.analyze("https://youtu.be/abc").await.unwrap();

    assert_eq!(*h.media.formats.lock().unwrap(), vec![StreamFormat::AudioOnly]);
    let spec = h.transcoder.specs.lock().unwrap()[0];
    assert_eq!(spec.start_seconds, 0.0);
    assert_eq!(spec.duration_seconds, MAX_ANALYSIS_SECONDS);
    assert_eq!(spec.profile, EncodeProfile::SpeechAudio);
    assert_eq!(
        h.transcoder.last_output().unwrap(),
        h.transcriber.last_audio_path().unwrap()
    );
}

#[tokio::test]
async fn test_reasoner_receives_timestamped_transcript() {
    let h = Harness::replying(GOOD_REPLY);

    h.pipeline.analyze("https://youtu.be/abc").await.unwrap();

    let transcripts = h.reasoner.transcripts.lock().unwrap();
    assert_eq!(
        transcripts.as_slice(),
        ["[0s]: Welcome to the show.\n[12s]: Today we build a rocket."]
    );
}

#[tokio::test]
async fn test_reply_without_array_degrades_to_no_highlights() {
    let h = Harness::replying("Sorry, nothing in this video stands out.");

    let analysis = h.pipeline.analyze("https://youtu.be/abc").await.unwrap();

    assert!(analysis.highlights.is_empty());
    assert_eq!(analysis.full_transcript, FakeTranscriber::transcription().full_text);
    h.assert_no_audio_left();
}

#[tokio::test]
async fn test_malformed_array_is_fatal_and_cleans_up() {
    let h = Harness::replying("Result: [{\"start\": 10, \"end\": 40,]");

    let err = h.pipeline.analyze("https://youtu.be/abc").await.unwrap_err();

    assert!(matches!(err, PipelineError::Parse(_)));
    assert!(h.transcriber.saw_audio_file.load(Ordering::SeqCst));
    h.assert_no_audio_left();
}

#[tokio::test]
async fn test_odd_field_types_are_returned_not_rejected() {
    let h = Harness::replying(
        r#"[{"start": "1:30", "end": "2:05", "title": null, "reason": "Clock times", "score": -5}]"#,
    );

    let analysis = h.pipeline.analyze("https://youtu.be/abc").await.unwrap();

    assert_eq!(analysis.highlights.len(), 1);
    let highlight = &analysis.highlights[0];
    assert_eq!(highlight.as_value()["start"], "1:30");
    assert!(highlight.as_value()["title"].is_null());
    assert_eq!(highlight.score(), Some(-5.0));
    h.assert_no_audio_left();
}

#[tokio::test]
async fn test_truncated_reply_without_closing_bracket_is_not_an_array() {
    let h = Harness::replying(r#"[{"start": 10, "end": 40, "title": "Cut off"#);

    let analysis = h.pipeline.analyze("https://youtu.be/abc").await.unwrap();

    assert!(analysis.highlights.is_empty());
    h.assert_no_audio_left();
}

#[tokio::test]
async fn test_transcription_failure_cleans_up() {
    let h = Harness::new(
        FakeMedia::working(),
        TranscodeBehavior::WritesOutput,
        FakeTranscriber::failing(),
        FakeReasoner::replying(GOOD_REPLY),
    );

    let err = h.pipeline.analyze("https://youtu.be/abc").await.unwrap_err();

    assert!(matches!(err, PipelineError::Api(_)));
    assert!(h.transcriber.saw_audio_file.load(Ordering::SeqCst));
    assert_eq!(h.reasoner.calls.load(Ordering::SeqCst), 0);
    h.assert_no_audio_left();
}

#[tokio::test]
async fn test_reasoning_failure_cleans_up() {
    let h = Harness::new(
        FakeMedia::working(),
        TranscodeBehavior::WritesOutput,
        FakeTranscriber::new(),
        FakeReasoner::failing(),
    );

    let err = h.pipeline.analyze("https://youtu.be/abc").await.unwrap_err();

    assert!(matches!(err, PipelineError::Api(_)));
    assert_eq!(h.reasoner.calls.load(Ordering::SeqCst), 1);
    h.assert_no_audio_left();
}

#[tokio::test]
async fn test_extraction_failure_skips_ai_calls() {
    let h = Harness::new(
        FakeMedia::working(),
        TranscodeBehavior::Fails,
        FakeTranscriber::new(),
        FakeReasoner::replying(GOOD_REPLY),
    );

    let err = h.pipeline.analyze("https://youtu.be/abc").await.unwrap_err();

    assert!(matches!(err, PipelineError::Tool(_)));
    assert_eq!(h.transcriber.calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.reasoner.calls.load(Ordering::SeqCst), 0);
    h.assert_no_audio_left();
}

#[tokio::test]
async fn test_stream_failure_is_tool_error() {
    let h = Harness::new(
        FakeMedia::failing_stream(),
        TranscodeBehavior::WritesOutput,
        FakeTranscriber::new(),
        FakeReasoner::replying(GOOD_REPLY),
    );

    let err = h.pipeline.analyze("https://youtu.be/abc").await.unwrap_err();

    assert!(matches!(err, PipelineError::Tool(_)));
    assert_eq!(h.transcoder.calls.load(Ordering::SeqCst), 0);
    h.assert_no_audio_left();
}

#[tokio::test]
async fn test_concurrent_analyses_use_distinct_audio_files() {
    let h = Harness::replying(GOOD_REPLY);

    let (a, b) = tokio::join!(
        h.pipeline.analyze("https://youtu.be/a"),
        h.pipeline.analyze("https://youtu.be/b")
    );
    assert!(a.is_ok() && b.is_ok());

    let outputs = h.transcoder.outputs.lock().unwrap();
    assert_eq!(outputs.len(), 2);
    assert_ne!(outputs[0], outputs[1]);
    drop(outputs);
    h.assert_no_audio_left();
}
