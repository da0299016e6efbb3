//! Encrypted DASH downloads via an external N_m3u8DL-RE binary
//!
//! The external tool performs segment download, decryption with the supplied
//! keys, and muxing in one pass. This crate never decrypts anything itself.

use crate::error::Result;
use crate::process::{excerpt, run_tool};
use crate::types::DownloadResult;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Default rendition selected when the request carries no resolution hint
const DEFAULT_RESOLUTION: &str = "720";

/// Downloads DRM-protected DASH content by shelling out to N_m3u8DL-RE
///
/// # Examples
///
/// ```no_run
/// use tg_media_dl::DrmDownloader;
/// use std::path::Path;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let downloader = DrmDownloader::from_path().expect("N_m3u8DL-RE not found in PATH");
/// let keys = vec!["kid:key".to_string()];
/// let result = downloader
///     .download("https://cdn.example.com/42.mpd", &keys, Path::new("./downloads"), "lecture", Some("720"))
///     .await?;
/// println!("saved to {}", result.resolved_path.display());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct DrmDownloader {
    binary_path: PathBuf,
}

impl DrmDownloader {
    /// Create a downloader with an explicit binary path
    pub fn new(binary_path: PathBuf) -> Self {
        Self { binary_path }
    }

    /// Attempt to find N_m3u8DL-RE in PATH
    ///
    /// Returns `None` if the binary is not found.
    pub fn from_path() -> Option<Self> {
        which::which("N_m3u8DL-RE").ok().map(Self::new)
    }

    /// Download and decrypt an encrypted manifest into `<save_dir>/<name>.mp4`
    ///
    /// Each key is handed to the tool via `--key`; the tool decrypts, this
    /// library does not. The save directory is created if missing. After the
    /// tool exits the expected output is probed with the decrypt path's own
    /// fallback chain (`<save_dir>/<name>.mp4`, then `<name>.mkv` and
    /// `<name>.mp4` relative to the working directory); if none exists the
    /// expected path is returned with `found = false`.
    ///
    /// A non-zero exit is logged with truncated output but is not fatal.
    pub async fn download(
        &self,
        mpd_url: &str,
        keys: &[String],
        save_dir: &Path,
        name: &str,
        resolution: Option<&str>,
    ) -> Result<DownloadResult> {
        if !save_dir.as_os_str().is_empty() {
            tokio::fs::create_dir_all(save_dir).await?;
        }

        let args = build_args(mpd_url, keys, save_dir, name, resolution);
        debug!(mpd_url, name, save_dir = %save_dir.display(), "invoking DRM downloader");

        let output = run_tool(&self.binary_path, &args).await?;
        if !output.status.success() {
            error!(
                code = output.status.code(),
                stdout = %excerpt(&output.stdout),
                stderr = %excerpt(&output.stderr),
                "DRM downloader exited non-zero"
            );
        }

        let expected = save_dir.join(format!("{name}.mp4"));
        for candidate in [
            expected.clone(),
            PathBuf::from(format!("{name}.mkv")),
            PathBuf::from(format!("{name}.mp4")),
        ] {
            if candidate.is_file() {
                return Ok(DownloadResult {
                    resolved_path: candidate,
                    found: true,
                });
            }
        }

        Ok(DownloadResult {
            resolved_path: expected,
            found: false,
        })
    }
}

fn build_args(
    mpd_url: &str,
    keys: &[String],
    save_dir: &Path,
    name: &str,
    resolution: Option<&str>,
) -> Vec<OsString> {
    let resolution = resolution.unwrap_or(DEFAULT_RESOLUTION);
    let mut args: Vec<OsString> = vec![mpd_url.into()];
    for key in keys {
        args.push("--key".into());
        args.push(key.into());
    }
    args.push("--save-name".into());
    args.push(name.into());
    args.push("--select-video".into());
    args.push(format!("res={resolution}p").into());
    args.push("--save-dir".into());
    if save_dir.as_os_str().is_empty() {
        args.push(".".into());
    } else {
        args.push(save_dir.into());
    }
    args
}
