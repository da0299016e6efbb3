//! Video downloads via an external yt-dlp binary accelerated by aria2c

use crate::config::DownloadConfig;
use crate::error::Result;
use crate::process::{excerpt, run_tool};
use crate::resolver;
use crate::types::{DownloadRequest, DownloadResult};
use std::ffi::OsString;
use std::path::PathBuf;
use tracing::{debug, error, warn};

/// Downloads videos by shelling out to yt-dlp with aria2c as the external
/// accelerator
///
/// The tool's exit code is advisory only: yt-dlp exits non-zero on partial
/// or cosmetic failures yet still produces usable output, so resolution of
/// the actual output file always runs, regardless of how the process exited.
///
/// # Examples
///
/// ```no_run
/// use tg_media_dl::{DownloadConfig, DownloadRequest, VideoDownloader};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let downloader = VideoDownloader::from_path(DownloadConfig::default())
///     .expect("yt-dlp not found in PATH");
///
/// let request = DownloadRequest::new("https://example.com/v/123", "lecture.mp4")
///     .with_resolution_hint("720");
/// let result = downloader.download(&request, &[]).await?;
/// println!("downloaded to {}", result.resolved_path.display());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct VideoDownloader {
    binary_path: PathBuf,
    config: DownloadConfig,
}

impl VideoDownloader {
    /// Create a downloader with an explicit binary path
    pub fn new(binary_path: PathBuf, config: DownloadConfig) -> Self {
        Self {
            binary_path,
            config,
        }
    }

    /// Attempt to find yt-dlp in PATH
    ///
    /// Returns `None` if the binary is not found.
    pub fn from_path(config: DownloadConfig) -> Option<Self> {
        which::which("yt-dlp").ok().map(|p| Self::new(p, config))
    }

    /// Download the requested media and resolve the produced file
    ///
    /// `extra_args` is passed through to yt-dlp verbatim before the managed
    /// arguments (format selectors, cookies, etc. belong there). A non-zero
    /// exit is logged with truncated output but does not abort: the output
    /// resolver runs either way and reports what actually landed on disk.
    ///
    /// Only a failure to start the process at all is an error.
    pub async fn download(
        &self,
        request: &DownloadRequest,
        extra_args: &[String],
    ) -> Result<DownloadResult> {
        let output_name = output_name(request);
        let args = self.build_args(request, extra_args, &output_name);
        debug!(
            url = request.source_url,
            output = %output_name,
            "invoking video downloader"
        );

        let output = run_tool(&self.binary_path, &args).await?;
        if !output.status.success() {
            error!(
                code = output.status.code(),
                stdout = %excerpt(&output.stdout),
                stderr = %excerpt(&output.stderr),
                "video downloader exited non-zero"
            );
        }

        Ok(resolver::resolve(&output_name))
    }

    /// Download media that carries DRM signaling without decrypting it
    ///
    /// Placeholder path: delegates to the plain download and the supplied
    /// keys are NOT used — no local decryption is performed. Encrypted
    /// manifests belong on [`DrmDownloader`](crate::DrmDownloader), where
    /// the external tool consumes the keys itself.
    pub async fn download_encrypted(
        &self,
        request: &DownloadRequest,
        extra_args: &[String],
        keys: &[String],
    ) -> Result<DownloadResult> {
        warn!(
            key_count = keys.len(),
            "download_encrypted performs no local decryption; delegating to plain download"
        );
        self.download(request, extra_args).await
    }

    fn build_args(
        &self,
        request: &DownloadRequest,
        extra_args: &[String],
        output_name: &str,
    ) -> Vec<OsString> {
        let mut args: Vec<OsString> = extra_args.iter().map(OsString::from).collect();

        if let Some(resolution) = &request.resolution_hint {
            args.push("-S".into());
            args.push(format!("res:{resolution}").into());
        }

        args.push("-R".into());
        args.push(self.config.fragment_retries.to_string().into());
        args.push("--external-downloader".into());
        args.push("aria2c".into());
        args.push("--downloader-args".into());
        args.push(self.config.aria2c_args().into());
        args.push("-o".into());
        args.push(output_name.into());
        args.push(request.source_url.clone().into());
        args
    }
}

/// The full output name handed to the tool: target dir joined with the
/// requested name, or the bare requested name when no dir was given
fn output_name(request: &DownloadRequest) -> String {
    match &request.target_dir {
        Some(dir) => dir.join(&request.requested_name).display().to_string(),
        None => request.requested_name.clone(),
    }
}
