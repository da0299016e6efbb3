//! Thumbnail frame extraction via an external ffmpeg binary

use crate::process::{excerpt, run_tool};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extracts single thumbnail frames by shelling out to ffmpeg
///
/// Extraction is strictly best-effort: media shorter than the requested
/// offset makes ffmpeg fail, which is ignored — the upload simply proceeds
/// without a generated thumbnail.
#[derive(Clone, Debug)]
pub struct Thumbnailer {
    binary_path: PathBuf,
}

impl Thumbnailer {
    /// Create a thumbnailer with an explicit binary path
    pub fn new(binary_path: PathBuf) -> Self {
        Self { binary_path }
    }

    /// Attempt to find ffmpeg in PATH
    ///
    /// Returns `None` if the binary is not found.
    pub fn from_path() -> Option<Self> {
        which::which("ffmpeg").ok().map(Self::new)
    }

    /// Grab one frame at `offset_secs` into the media, writing `<media>.jpg`
    ///
    /// Returns the thumbnail path if a file materialized, `None` otherwise.
    /// Tool failures are logged at debug level and otherwise ignored.
    pub async fn extract_frame(&self, media: &Path, offset_secs: u32) -> Option<PathBuf> {
        let dest = thumbnail_path(media);
        let timestamp = format_timestamp(offset_secs);

        let result = run_tool(
            &self.binary_path,
            [
                OsStr::new("-y"),
                OsStr::new("-i"),
                media.as_os_str(),
                OsStr::new("-ss"),
                OsStr::new(&timestamp),
                OsStr::new("-vframes"),
                OsStr::new("1"),
                dest.as_os_str(),
            ],
        )
        .await;

        match result {
            Ok(output) if !output.status.success() => {
                debug!(
                    media = %media.display(),
                    code = output.status.code(),
                    stderr = %excerpt(&output.stderr),
                    "thumbnail extraction failed, continuing without one"
                );
            }
            Err(e) => {
                debug!(media = %media.display(), error = %e, "could not run ffmpeg for thumbnail");
            }
            Ok(_) => {}
        }

        // The file on disk is the source of truth, not the exit code
        dest.is_file().then_some(dest)
    }
}

/// The thumbnail path for a media file: the full name with `.jpg` appended
/// (`clip.mp4` → `clip.mp4.jpg`)
pub fn thumbnail_path(media: &Path) -> PathBuf {
    let mut name = OsString::from(media.as_os_str());
    name.push(".jpg");
    PathBuf::from(name)
}

/// Render a seconds offset as ffmpeg's `HH:MM:SS` timestamp
fn format_timestamp(offset_secs: u32) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        offset_secs / 3600,
        (offset_secs % 3600) / 60,
        offset_secs % 60
    )
}
