//! Media duration probing via an external ffprobe binary

use crate::error::{Error, Result};
use crate::process::run_tool;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Probes media files by shelling out to ffprobe
///
/// The only field requested is the container duration, in a bare numeric
/// text format. Probing is strictly best-effort: any failure yields the
/// `0.0` "unknown duration" sentinel that the uploader accepts.
#[derive(Clone, Debug)]
pub struct MediaProber {
    binary_path: PathBuf,
}

impl MediaProber {
    /// Create a prober with an explicit binary path
    pub fn new(binary_path: PathBuf) -> Self {
        Self { binary_path }
    }

    /// Attempt to find ffprobe in PATH
    ///
    /// Returns `None` if the binary is not found.
    pub fn from_path() -> Option<Self> {
        which::which("ffprobe").ok().map(Self::new)
    }

    /// Probe the duration of a media file in seconds
    ///
    /// Returns `0.0` on ANY failure — missing binary, non-zero exit, or
    /// non-numeric output — never an error. Zero is a valid "unknown
    /// duration" sentinel for the upload path.
    pub async fn duration(&self, file: &Path) -> f64 {
        match self.probe(file).await {
            Ok(seconds) => seconds,
            Err(e) => {
                debug!(file = %file.display(), error = %e, "duration probe failed, using 0");
                0.0
            }
        }
    }

    async fn probe(&self, file: &Path) -> Result<f64> {
        let output = run_tool(
            &self.binary_path,
            [
                OsStr::new("-v"),
                OsStr::new("error"),
                OsStr::new("-show_entries"),
                OsStr::new("format=duration"),
                OsStr::new("-of"),
                OsStr::new("default=noprint_wrappers=1:nokey=1"),
                file.as_os_str(),
            ],
        )
        .await?;

        if !output.status.success() {
            return Err(Error::ExternalTool(format!(
                "ffprobe exited with code {:?}",
                output.status.code()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout);
        text.trim()
            .parse::<f64>()
            .map_err(|e| Error::Other(format!("non-numeric duration output {:?}: {e}", text.trim())))
    }
}
