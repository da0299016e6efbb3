//! Top-level facade wiring the API client, downloaders, prober, and uploader

use crate::api::ApiClient;
use crate::config::Config;
use crate::drm::DrmDownloader;
use crate::error::Result;
use crate::probe::MediaProber;
use crate::thumbnail::Thumbnailer;
use crate::types::{
    DownloadRequest, DownloadResult, ManifestInfo, UploadOutcome,
};
use crate::upload::{MediaSink, UploadRequest, Uploader};
use crate::video::VideoDownloader;
use std::path::{Path, PathBuf};
use tracing::info;

/// The main entry point for embedding applications
///
/// Wires every collaborator from a single [`Config`]: the HTTP API client,
/// the yt-dlp and N_m3u8DL-RE wrappers, the ffprobe prober, the ffmpeg
/// thumbnailer, and the upload orchestrator. External binaries are resolved
/// at construction (explicit configured path first, then PATH), so a missing
/// tool surfaces immediately rather than mid-download.
///
/// Each user command maps to one request flowing strictly through
/// fetch → download → probe → upload → cleanup; requests are self-contained
/// and share no mutable state, so a `MediaDownloader` can be cloned and used
/// from concurrent tasks as long as output names are distinct.
///
/// # Examples
///
/// ```no_run
/// use tg_media_dl::{Config, DownloadRequest, MediaDownloader};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let downloader = MediaDownloader::new(Config::default())?;
///
/// let info = downloader
///     .manifest_and_keys("https://api.example.com/content/42")
///     .await;
///
/// let request = DownloadRequest::new("https://example.com/v/42", "lecture.mp4")
///     .with_resolution_hint("720");
/// let result = match info.mpd {
///     Some(mpd) => {
///         downloader
///             .download_drm(&mpd, &info.keys, &request)
///             .await?
///     }
///     None => downloader.download_video(&request, &[]).await?,
/// };
/// println!("got {}", result.resolved_path.display());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct MediaDownloader {
    config: Config,
    api: ApiClient,
    video: VideoDownloader,
    drm: DrmDownloader,
    prober: MediaProber,
    uploader: Uploader,
}

impl MediaDownloader {
    /// Create a downloader, resolving all external binaries
    ///
    /// Fails if the configuration is invalid or any of yt-dlp, N_m3u8DL-RE,
    /// ffmpeg, or ffprobe cannot be located.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let api = ApiClient::new(&config.api)?;
        let ytdlp = config
            .tools
            .resolve_binary(&config.tools.ytdlp_path, "yt-dlp")?;
        let drm_tool = config
            .tools
            .resolve_binary(&config.tools.drm_downloader_path, "N_m3u8DL-RE")?;
        let ffmpeg = config
            .tools
            .resolve_binary(&config.tools.ffmpeg_path, "ffmpeg")?;
        let ffprobe = config
            .tools
            .resolve_binary(&config.tools.ffprobe_path, "ffprobe")?;
        info!(
            ytdlp = %ytdlp.display(),
            drm_tool = %drm_tool.display(),
            ffmpeg = %ffmpeg.display(),
            ffprobe = %ffprobe.display(),
            "external tools resolved"
        );

        let video = VideoDownloader::new(ytdlp, config.download.clone());
        let drm = DrmDownloader::new(drm_tool);
        let prober = MediaProber::new(ffprobe);
        let thumbnailer = Thumbnailer::new(ffmpeg);
        let uploader = Uploader::new(config.upload.clone(), thumbnailer, prober.clone());

        Ok(Self {
            config,
            api,
            video,
            drm,
            prober,
            uploader,
        })
    }

    /// Fetch the manifest URL and decryption keys for a piece of content
    ///
    /// Never fails: degraded to [`ManifestInfo::empty()`] on any error.
    pub async fn manifest_and_keys(&self, url: &str) -> ManifestInfo {
        self.api.manifest_and_keys(url).await
    }

    /// Download a file over plain HTTP into `dest`
    pub async fn download_file(&self, url: &str, dest: &Path) -> Result<PathBuf> {
        self.api.download_file(url, dest).await
    }

    /// Download a PDF, writing it to `<name>.pdf`
    pub async fn download_pdf(&self, url: &str, name: &str) -> Result<PathBuf> {
        self.api.download_pdf(url, name).await
    }

    /// Download a video with yt-dlp and resolve the produced file
    pub async fn download_video(
        &self,
        request: &DownloadRequest,
        extra_args: &[String],
    ) -> Result<DownloadResult> {
        self.video.download(request, extra_args).await
    }

    /// Download DRM-signaled media without local decryption (known gap)
    ///
    /// Delegates to the plain video path; see
    /// [`VideoDownloader::download_encrypted`].
    pub async fn download_encrypted(
        &self,
        request: &DownloadRequest,
        extra_args: &[String],
        keys: &[String],
    ) -> Result<DownloadResult> {
        self.video.download_encrypted(request, extra_args, keys).await
    }

    /// Download and decrypt an encrypted manifest via N_m3u8DL-RE
    ///
    /// The save directory and rendition come from the request (download_dir
    /// config default; 720p default rendition).
    pub async fn download_drm(
        &self,
        mpd_url: &str,
        keys: &[String],
        request: &DownloadRequest,
    ) -> Result<DownloadResult> {
        let save_dir = request
            .target_dir
            .clone()
            .unwrap_or_else(|| self.config.download.download_dir.clone());
        self.drm
            .download(
                mpd_url,
                keys,
                &save_dir,
                &request.requested_name,
                request.resolution_hint.as_deref(),
            )
            .await
    }

    /// Probe the duration of a media file in seconds (`0.0` if unknown)
    pub async fn probe_duration(&self, file: &Path) -> f64 {
        self.prober.duration(file).await
    }

    /// Upload a downloaded file through the supplied sink
    ///
    /// See [`Uploader::upload`] for the exact sequence.
    pub async fn upload(
        &self,
        sink: &dyn MediaSink,
        request: UploadRequest,
    ) -> Result<UploadOutcome> {
        self.uploader.upload(sink, request).await
    }
}
