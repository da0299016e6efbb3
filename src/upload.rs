//! Upload orchestration: thumbnail, status message, video send with
//! document fallback, and cleanup
//!
//! The messaging platform itself is behind the [`MediaSink`] trait — the
//! embedding bot supplies the actual Telegram (or other) client.

use crate::config::UploadConfig;
use crate::error::{Result, UploadError};
use crate::probe::MediaProber;
use crate::thumbnail::{Thumbnailer, thumbnail_path};
use crate::types::{ChatId, MessageRef, ProgressCallback, ThumbnailMode, UploadMode, UploadOutcome};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Concrete thumbnail source handed to the sink
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ThumbnailSource {
    /// A local image file, verified to exist at send time
    File(PathBuf),
    /// A remote image URL passed through to the platform
    Url(String),
}

/// Presentation metadata for a video send
#[derive(Clone, Debug)]
pub struct VideoMeta {
    /// Message caption
    pub caption: String,
    /// Display width in pixels
    pub width: u32,
    /// Display height in pixels
    pub height: u32,
    /// Duration in whole seconds; `0` means unknown
    pub duration_secs: i64,
    /// Whether the platform should offer streaming playback
    pub supports_streaming: bool,
    /// Optional thumbnail
    pub thumbnail: Option<ThumbnailSource>,
}

/// Messaging/upload capabilities the embedding bot must provide
///
/// All methods map one-to-one onto operations of the underlying platform
/// client; implementations should not add retry logic — the orchestrator's
/// single video→document fallback is the only recovery performed.
#[async_trait]
pub trait MediaSink: Send + Sync {
    /// Send a text status message, returning a reference for later deletion
    async fn send_status(&self, chat: ChatId, text: &str) -> Result<MessageRef>;

    /// Delete a previously sent message
    async fn delete_message(&self, chat: ChatId, message: MessageRef) -> Result<()>;

    /// Send a video with presentation metadata and a progress callback
    async fn send_video(
        &self,
        chat: ChatId,
        file: &Path,
        meta: &VideoMeta,
        progress: ProgressCallback,
    ) -> Result<()>;

    /// Send a generic document with a caption and a progress callback
    async fn send_document(
        &self,
        chat: ChatId,
        file: &Path,
        caption: &str,
        progress: ProgressCallback,
    ) -> Result<()>;
}

/// One upload to perform
pub struct UploadRequest {
    /// Destination chat
    pub chat: ChatId,
    /// Local media file to upload (deleted after the attempt)
    pub media_path: PathBuf,
    /// Caption for the media message
    pub caption: String,
    /// Short name shown in the transient status message
    pub display_name: String,
    /// Thumbnail selection, already parsed from user input
    pub thumbnail: ThumbnailMode,
    /// A prior progress message to delete before uploading, if any
    pub prior_status: Option<MessageRef>,
    /// Progress callback forwarded to the sink
    pub progress: ProgressCallback,
}

/// Orchestrates the upload sequence against a [`MediaSink`]
///
/// Sequence (order is fixed): extract a thumbnail frame, drop the caller's
/// prior progress message, post an "uploading" status, probe duration, send
/// as streaming video, fall back once to a document send on any video-send
/// failure, then clean up the local media file, the generated thumbnail,
/// and the status message. Errors propagate only after a best-effort
/// status-message cleanup.
#[derive(Clone, Debug)]
pub struct Uploader {
    config: UploadConfig,
    thumbnailer: Thumbnailer,
    prober: MediaProber,
}

impl Uploader {
    /// Create an uploader from its collaborators
    pub fn new(config: UploadConfig, thumbnailer: Thumbnailer, prober: MediaProber) -> Self {
        Self {
            config,
            thumbnailer,
            prober,
        }
    }

    /// Run the full upload sequence
    ///
    /// On success the returned outcome records which send path delivered the
    /// media. A failure of both send paths — or of any other step — is
    /// returned as an error after the temp files and (best-effort) the
    /// status message have been cleaned up. The status message may survive
    /// if its deletion itself fails.
    pub async fn upload(
        &self,
        sink: &dyn MediaSink,
        request: UploadRequest,
    ) -> Result<UploadOutcome> {
        // Frame extraction failure is invisible here: the mode resolution
        // below checks the disk, not the tool's exit status
        self.thumbnailer
            .extract_frame(&request.media_path, self.config.thumbnail_offset_secs)
            .await;

        if let Some(prior) = request.prior_status
            && let Err(e) = sink.delete_message(request.chat, prior).await
        {
            warn!(message = %prior, error = %e, "could not delete prior progress message");
        }

        let status = sink
            .send_status(
                request.chat,
                &format!("**⥣ Uploading ...** » `{}`", request.display_name),
            )
            .await
            .map_err(|e| UploadError::StatusMessage(e.to_string()))?;

        let meta = VideoMeta {
            caption: request.caption.clone(),
            width: self.config.video_width,
            height: self.config.video_height,
            duration_secs: self.prober.duration(&request.media_path).await as i64,
            supports_streaming: self.config.supports_streaming,
            thumbnail: self.resolve_thumbnail(&request),
        };

        let send_result = self.send_with_fallback(sink, &request, &meta).await;

        // Temp files go away after either path completes, success or
        // exhausted fallback alike
        remove_temp_file(&request.media_path).await;
        remove_temp_file(&thumbnail_path(&request.media_path)).await;

        match send_result {
            Ok(mode) => {
                sink.delete_message(request.chat, status)
                    .await
                    .map_err(|e| {
                        UploadError::Sink(format!("could not delete status message: {e}"))
                    })?;
                Ok(UploadOutcome {
                    mode,
                    succeeded: true,
                })
            }
            Err(send_err) => {
                if let Err(e) = sink.delete_message(request.chat, status).await {
                    warn!(message = %status, error = %e, "could not delete status message");
                }
                Err(send_err.into())
            }
        }
    }

    /// Map the parsed thumbnail mode to a concrete source
    ///
    /// The generated frame is used only if the file actually exists on disk;
    /// the mode is never re-inspected after this point.
    fn resolve_thumbnail(&self, request: &UploadRequest) -> Option<ThumbnailSource> {
        match &request.thumbnail {
            ThumbnailMode::GeneratedFrame => {
                let frame = thumbnail_path(&request.media_path);
                if frame.is_file() {
                    Some(ThumbnailSource::File(frame))
                } else {
                    None
                }
            }
            ThumbnailMode::RemoteUrl(url) => Some(ThumbnailSource::Url(url.clone())),
            ThumbnailMode::None => None,
        }
    }

    async fn send_with_fallback(
        &self,
        sink: &dyn MediaSink,
        request: &UploadRequest,
        meta: &VideoMeta,
    ) -> std::result::Result<UploadMode, UploadError> {
        match sink
            .send_video(
                request.chat,
                &request.media_path,
                meta,
                request.progress.clone(),
            )
            .await
        {
            Ok(()) => Ok(UploadMode::Video),
            Err(video_err) => {
                warn!(
                    file = %request.media_path.display(),
                    error = %video_err,
                    "video send failed, falling back to document"
                );
                match sink
                    .send_document(
                        request.chat,
                        &request.media_path,
                        &request.caption,
                        request.progress.clone(),
                    )
                    .await
                {
                    Ok(()) => Ok(UploadMode::Document),
                    Err(doc_err) => Err(UploadError::SendExhausted {
                        video_error: video_err.to_string(),
                        document_error: doc_err.to_string(),
                    }),
                }
            }
        }
    }
}

/// Delete a temp artifact, logging anything other than "already gone"
async fn remove_temp_file(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => debug!(file = %path.display(), "removed temp file"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(file = %path.display(), error = %e, "failed to remove temp file"),
    }
}
