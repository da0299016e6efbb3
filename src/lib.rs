//! # tg-media-dl
//!
//! Helper library for Telegram media-downloading bots.
//!
//! ## Design Philosophy
//!
//! tg-media-dl is designed to be:
//! - **Library-first** - No CLI or UI, purely a Rust crate for embedding
//! - **Tool-orchestrating** - The heavy lifting (download, decryption,
//!   transcoding) happens in external binaries; this crate wires them up
//!   and resolves what they actually produced
//! - **Best-effort by policy** - Failed probes, missing thumbnails, and
//!   cosmetic tool failures degrade instead of aborting a user's download
//!
//! ## Quick Start
//!
//! ```no_run
//! use tg_media_dl::{Config, DownloadRequest, MediaDownloader};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let downloader = MediaDownloader::new(Config::default())?;
//!
//!     // Ask the API whether this content is DRM-protected
//!     let info = downloader
//!         .manifest_and_keys("https://api.example.com/content/42")
//!         .await;
//!
//!     let request = DownloadRequest::new("https://example.com/v/42", "lecture.mp4")
//!         .with_resolution_hint("720");
//!     let result = match info.mpd {
//!         Some(mpd) => downloader.download_drm(&mpd, &info.keys, &request).await?,
//!         None => downloader.download_video(&request, &[]).await?,
//!     };
//!
//!     if !result.found {
//!         eprintln!("output is a best-effort guess: {}", result.resolved_path.display());
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Remote API client (manifest/key fetch, direct file downloads)
pub mod api;
/// Configuration types
pub mod config;
/// Top-level facade
pub mod downloader;
/// Encrypted DASH downloads via N_m3u8DL-RE
pub mod drm;
/// Error types
pub mod error;
/// Media duration probing via ffprobe
pub mod probe;
/// Output-file resolution after an external tool has run
pub mod resolver;
/// Filename sanitization
pub mod sanitize;
/// Thumbnail frame extraction via ffmpeg
pub mod thumbnail;
/// Core types
pub mod types;
/// Upload orchestration and the messaging sink trait
pub mod upload;
/// Video downloads via yt-dlp
pub mod video;

mod process;

// Re-export commonly used types
pub use api::ApiClient;
pub use config::{ApiConfig, Config, DownloadConfig, ToolsConfig, UploadConfig};
pub use downloader::MediaDownloader;
pub use drm::DrmDownloader;
pub use error::{Error, Result, UploadError};
pub use probe::MediaProber;
pub use resolver::resolve;
pub use sanitize::sanitize_filename;
pub use thumbnail::{Thumbnailer, thumbnail_path};
pub use types::{
    ChatId, DownloadRequest, DownloadResult, ManifestInfo, MessageRef, ProgressCallback,
    ThumbnailMode, UploadMode, UploadOutcome, noop_progress,
};
pub use upload::{MediaSink, ThumbnailSource, UploadRequest, Uploader, VideoMeta};
pub use video::VideoDownloader;
