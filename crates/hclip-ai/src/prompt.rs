//! Prompt used for highlight reasoning.

/// System message sent with every highlight request.
pub const SYSTEM_PROMPT: &str =
    "You are an expert video editor who finds the most engaging moments for short-form clips.";

/// Build the highlight instruction around a timestamped transcript.
pub fn build_highlight_prompt(timestamped_transcript: &str) -> String {
    format!(
        r#"Analyze this video transcript and find the 3-5 best moments for short clips.

Transcript:
{timestamped_transcript}

Respond ONLY with a JSON array in this format:
[{{"start": 0, "end": 30, "title": "Short title", "reason": "Why this moment is interesting", "score": 85}}]

Rules:
- Clips must be between 15 and 60 seconds long
- score ranges from 1 to 100
- Return only the JSON array, no other text"#
    )
}
