//! Highlight (clip suggestion) models.
//!
//! Highlights come straight from a language model, so every field is
//! advisory: the model is asked for 15-60 second clips with a 1-100 score,
//! but nothing here enforces that. A highlight keeps the element exactly as
//! the model wrote it, whatever its shape, and only the accessors interpret
//! it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A proposed sub-interval of the source video, kept verbatim.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Highlight(Value);

impl Highlight {
    /// The element as the model produced it.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Start offset in seconds, when the model gave a number or numeric string.
    pub fn start(&self) -> Option<f64> {
        self.number("start")
    }

    /// End offset in seconds, when the model gave a number or numeric string.
    pub fn end(&self) -> Option<f64> {
        self.number("end")
    }

    pub fn title(&self) -> Option<&str> {
        self.0.get("title").and_then(Value::as_str)
    }

    /// Score as reported, without range checks.
    pub fn score(&self) -> Option<f64> {
        self.number("score")
    }

    /// Whether both offsets are readable and `end > start`.
    pub fn is_well_formed(&self) -> bool {
        matches!((self.start(), self.end()), (Some(start), Some(end)) if end > start)
    }

    fn number(&self, key: &str) -> Option<f64> {
        match self.0.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl From<Value> for Highlight {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Outcome of a highlight analysis.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HighlightAnalysis {
    /// Full transcript text of the analyzed audio
    pub full_transcript: String,

    /// Proposed highlights in the order the model returned them
    pub highlights: Vec<Highlight>,
}
