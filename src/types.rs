//! Core types for tg-media-dl

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// Chat identifier for the messaging sink
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(pub i64);

impl ChatId {
    /// Create a new ChatId
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the inner i64 value
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl From<i64> for ChatId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ChatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference to a message previously sent through the sink
///
/// Used for editing and deleting transient status messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageRef(pub i64);

impl MessageRef {
    /// Create a new MessageRef
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the inner i64 value
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for MessageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single user-initiated download request
///
/// Immutable once issued: created per user command, consumed once by the
/// download step, and discarded. Name collision handling is the caller's
/// responsibility — two concurrent requests must use distinct names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadRequest {
    /// Source URL (page URL for yt-dlp, manifest URL for the DRM tool)
    pub source_url: String,
    /// Requested output name, possibly including an extension
    pub requested_name: String,
    /// Directory to download into (current directory if absent)
    pub target_dir: Option<PathBuf>,
    /// Desired vertical pixel count used to select a video rendition
    pub resolution_hint: Option<String>,
}

impl DownloadRequest {
    /// Create a request for `source_url` producing `requested_name`
    pub fn new(source_url: impl Into<String>, requested_name: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            requested_name: requested_name.into(),
            target_dir: None,
            resolution_hint: None,
        }
    }

    /// Set the target directory
    #[must_use]
    pub fn with_target_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.target_dir = Some(dir.into());
        self
    }

    /// Set the resolution hint (vertical pixels, e.g. "720")
    #[must_use]
    pub fn with_resolution_hint(mut self, resolution: impl Into<String>) -> Self {
        self.resolution_hint = Some(resolution.into());
        self
    }
}

/// Result of resolving the actual output file after an external tool ran
///
/// When `found` is false, `resolved_path` is a best-effort guess that did not
/// exist on disk at resolution time; callers proceed optimistically but must
/// branch on `found` rather than treating the guess as verified.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadResult {
    /// The file the external tool is believed to have produced
    pub resolved_path: PathBuf,
    /// Whether `resolved_path` existed on disk at the moment of resolution
    pub found: bool,
}

/// Which send path delivered the media
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadMode {
    /// Sent as a streaming video with thumbnail and duration
    Video,
    /// Sent as a generic document (fallback path)
    Document,
}

/// Outcome of an upload attempt
///
/// Video is attempted first; document is a one-shot fallback. A failure of
/// the fallback propagates as an error instead of producing an outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UploadOutcome {
    /// The send path that completed
    pub mode: UploadMode,
    /// Whether the send succeeded (always true for a returned outcome)
    pub succeeded: bool,
}

/// Manifest URL and decryption keys fetched from the remote API
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestInfo {
    /// DASH manifest URL, if the API returned one
    pub mpd: Option<String>,
    /// Decryption keys consumed verbatim by the DRM download tool
    pub keys: Vec<String>,
}

impl ManifestInfo {
    /// The degraded "no manifest available" result
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Thumbnail selection, decided once at the call boundary
///
/// Replaces the stringly-typed `"no"` / `"/d"` / URL / absent convention with
/// an explicit variant that is never re-inspected downstream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ThumbnailMode {
    /// Use the frame extracted from the media itself
    GeneratedFrame,
    /// Use a remote image at this URL
    RemoteUrl(String),
    /// No thumbnail
    None,
}

impl ThumbnailMode {
    /// Map raw user input to a thumbnail mode
    ///
    /// `"no"` and `"/d"` both mean "use the generated frame"; an `http(s)`
    /// URL means "use that remote image"; anything else (including absence
    /// and unparseable URLs) means no thumbnail.
    pub fn from_user_input(input: Option<&str>) -> Self {
        match input {
            Some("no") | Some("/d") => ThumbnailMode::GeneratedFrame,
            Some(s) if s.starts_with("http://") || s.starts_with("https://") => {
                match url::Url::parse(s) {
                    Ok(_) => ThumbnailMode::RemoteUrl(s.to_string()),
                    Err(e) => {
                        tracing::warn!(input = s, error = %e, "ignoring unparseable thumbnail URL");
                        ThumbnailMode::None
                    }
                }
            }
            _ => ThumbnailMode::None,
        }
    }
}

/// Progress callback invoked by the sink during a send
///
/// Arguments are `(transferred_bytes, total_bytes)`. The callback is shared
/// and may be invoked many times across both send paths.
pub type ProgressCallback = Arc<dyn Fn(u64, u64) -> BoxFuture<'static, ()> + Send + Sync>;

/// A progress callback that does nothing
///
/// Convenient for callers that do not surface transfer progress.
pub fn noop_progress() -> ProgressCallback {
    Arc::new(|_, _| -> BoxFuture<'static, ()> { Box::pin(async {}) })
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_id_display_and_get() {
        let id = ChatId::new(-100123456);
        assert_eq!(id.get(), -100123456);
        assert_eq!(id.to_string(), "-100123456");
    }

    #[test]
    fn test_download_request_builder() {
        let req = DownloadRequest::new("https://example.com/v", "Lecture 01.mp4")
            .with_target_dir("/tmp/dl")
            .with_resolution_hint("720");
        assert_eq!(req.source_url, "https://example.com/v");
        assert_eq!(req.requested_name, "Lecture 01.mp4");
        assert_eq!(req.target_dir, Some(PathBuf::from("/tmp/dl")));
        assert_eq!(req.resolution_hint.as_deref(), Some("720"));
    }

    #[test]
    fn test_thumbnail_mode_generated_frame_sentinels() {
        assert_eq!(
            ThumbnailMode::from_user_input(Some("no")),
            ThumbnailMode::GeneratedFrame
        );
        assert_eq!(
            ThumbnailMode::from_user_input(Some("/d")),
            ThumbnailMode::GeneratedFrame
        );
    }

    #[test]
    fn test_thumbnail_mode_remote_url() {
        assert_eq!(
            ThumbnailMode::from_user_input(Some("https://example.com/thumb.jpg")),
            ThumbnailMode::RemoteUrl("https://example.com/thumb.jpg".to_string())
        );
        assert_eq!(
            ThumbnailMode::from_user_input(Some("http://example.com/t.png")),
            ThumbnailMode::RemoteUrl("http://example.com/t.png".to_string())
        );
    }

    #[test]
    fn test_thumbnail_mode_none_cases() {
        assert_eq!(ThumbnailMode::from_user_input(None), ThumbnailMode::None);
        assert_eq!(
            ThumbnailMode::from_user_input(Some("yes")),
            ThumbnailMode::None
        );
        // Bare "ftp://" and non-URL strings are not thumbnails
        assert_eq!(
            ThumbnailMode::from_user_input(Some("ftp://example.com/t.jpg")),
            ThumbnailMode::None
        );
    }

    #[test]
    fn test_manifest_info_empty() {
        let info = ManifestInfo::empty();
        assert!(info.mpd.is_none());
        assert!(info.keys.is_empty());
    }

    #[test]
    fn test_upload_mode_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&UploadMode::Video).unwrap(),
            "\"video\""
        );
        assert_eq!(
            serde_json::to_string(&UploadMode::Document).unwrap(),
            "\"document\""
        );
    }
}
