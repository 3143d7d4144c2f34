//! yt-dlp and FFmpeg CLI adapters.
//!
//! This crate provides:
//! - The `MediaTool` capability (probe metadata, stream media bytes) backed by yt-dlp
//! - The `Transcoder` capability (trim and re-encode a stream into a file) backed by FFmpeg
//! - Type-safe FFmpeg command building
//!
//! Both capabilities are object-safe traits so callers can swap in fakes.

pub mod command;
pub mod error;
pub mod stream;
pub mod transcode;
pub mod ytdlp;

pub use command::{check_ffmpeg, check_ytdlp, FfmpegCommand};
pub use error::{MediaError, MediaResult};
pub use stream::{MediaStream, ProcessStream};
pub use transcode::{EncodeProfile, Ffmpeg, FfmpegConfig, Transcoder, TrimSpec};
pub use ytdlp::{MediaTool, StreamFormat, YtDlp, YtDlpConfig};
