//! Clients for the hosted AI services.
//!
//! This crate provides:
//! - The `Transcriber` capability: audio file in, time-aligned segments out
//! - The `HighlightReasoner` capability: timestamped transcript in, raw model text out
//! - `OpenAiClient`, which implements both against an OpenAI-compatible API
//!
//! The reasoning client deliberately does not validate what the model
//! returns; interpreting the text is the caller's job.

pub mod client;
pub mod error;
pub mod prompt;
pub mod traits;
pub mod types;

pub use client::{AiClientConfig, OpenAiClient};
pub use error::{AiError, AiResult};
pub use prompt::{build_highlight_prompt, SYSTEM_PROMPT};
pub use traits::{HighlightReasoner, Transcriber};
