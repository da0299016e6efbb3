//! Error types for tg-media-dl
//!
//! This module provides the error handling for the library:
//! - A single top-level [`Error`] enum with contextual variants
//! - An [`UploadError`] sub-enum for the upload orchestration steps
//! - A crate-wide [`Result`] alias

use thiserror::Error;

/// Result type alias for tg-media-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for tg-media-dl
///
/// This is the primary error type used throughout the library. Each variant includes
/// contextual information to help diagnose issues.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "download_dir")
        key: Option<String>,
    },

    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// External tool execution failed (yt-dlp, N_m3u8DL-RE, ffmpeg, ffprobe)
    #[error("external tool error: {0}")]
    ExternalTool(String),

    /// Upload-related error
    #[error("upload error: {0}")]
    Upload(#[from] UploadError),

    /// Operation not supported (missing binary, not implemented, etc.)
    #[error("not supported: {0}")]
    NotSupported(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Upload orchestration errors
///
/// These track which step of the upload sequence failed. The video send step
/// never surfaces here directly: a video-send failure triggers the one-shot
/// document fallback, and only a failure of that fallback is reported.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Sending the transient status message failed
    #[error("failed to send status message: {0}")]
    StatusMessage(String),

    /// Both the video send and the document fallback failed
    #[error("document fallback failed after video send error ({video_error}): {document_error}")]
    SendExhausted {
        /// Error reported by the initial video send attempt
        video_error: String,
        /// Error reported by the document fallback attempt
        document_error: String,
    },

    /// A sink operation outside the send fallback failed, such as the
    /// status-message cleanup after a successful send
    #[error("sink error: {0}")]
    Sink(String),
}
