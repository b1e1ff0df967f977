//! Error types for media operations.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur while reading video or writing clips.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Unreadable video {path}: {reason}")]
    Unreadable { path: PathBuf, reason: String },

    #[error("Cannot read frame {frame_index} (t={timestamp:.3}s)")]
    Seek { timestamp: f64, frame_index: u64 },

    #[error("Video source is closed")]
    SourceClosed,

    #[error("Invalid sampling stride: {0} (must be at least 1)")]
    InvalidStride(usize),

    #[error("No encoder available for {path}: {message}")]
    EncoderUnavailable { path: PathBuf, message: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl MediaError {
    /// Create an unreadable-container error.
    pub fn unreadable(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        Self::Unreadable {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Create a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Create an encoder error.
    pub fn encoder_unavailable(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::EncoderUnavailable {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }
}
