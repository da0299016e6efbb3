//! Configuration types for tg-media-dl

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Download behavior configuration (directories, downloader tuning)
///
/// Groups settings related to how media is fetched and stored.
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Download directory (default: "./downloads")
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,

    /// Number of fragment retries passed to yt-dlp via `-R` (default: 25)
    #[serde(default = "default_fragment_retries")]
    pub fragment_retries: u32,

    /// aria2c connections per server, `-x` (default: 32)
    #[serde(default = "default_aria2c_connections")]
    pub aria2c_connections_per_server: u32,

    /// aria2c maximum concurrent downloads, `-j` (default: 64)
    #[serde(default = "default_aria2c_concurrent")]
    pub aria2c_max_concurrent: u32,

    /// aria2c split count per download, `-s` (default: 32)
    #[serde(default = "default_aria2c_splits")]
    pub aria2c_splits: u32,

    /// aria2c minimum split size, `-k` (default: "2M")
    #[serde(default = "default_aria2c_min_split_size")]
    pub aria2c_min_split_size: String,

    /// Pass `--optimize-concurrent-downloads` to aria2c (default: true)
    #[serde(default = "default_true")]
    pub aria2c_optimize_concurrent: bool,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            download_dir: default_download_dir(),
            fragment_retries: default_fragment_retries(),
            aria2c_connections_per_server: default_aria2c_connections(),
            aria2c_max_concurrent: default_aria2c_concurrent(),
            aria2c_splits: default_aria2c_splits(),
            aria2c_min_split_size: default_aria2c_min_split_size(),
            aria2c_optimize_concurrent: true,
        }
    }
}

impl DownloadConfig {
    /// Render the `--downloader-args` value handed to yt-dlp for aria2c
    pub fn aria2c_args(&self) -> String {
        let mut args = format!(
            "aria2c: -x {} -j {} -s {} -k {}",
            self.aria2c_connections_per_server,
            self.aria2c_max_concurrent,
            self.aria2c_splits,
            self.aria2c_min_split_size,
        );
        if self.aria2c_optimize_concurrent {
            args.push_str(" --optimize-concurrent-downloads");
        }
        args
    }
}

/// External tool paths (yt-dlp, N_m3u8DL-RE, ffmpeg, ffprobe)
///
/// Groups settings for the external binaries the library shells out to.
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Path to the yt-dlp executable (auto-detected if None)
    #[serde(default)]
    pub ytdlp_path: Option<PathBuf>,

    /// Path to the N_m3u8DL-RE executable (auto-detected if None)
    #[serde(default)]
    pub drm_downloader_path: Option<PathBuf>,

    /// Path to the ffmpeg executable (auto-detected if None)
    #[serde(default)]
    pub ffmpeg_path: Option<PathBuf>,

    /// Path to the ffprobe executable (auto-detected if None)
    #[serde(default)]
    pub ffprobe_path: Option<PathBuf>,

    /// Whether to search PATH for external binaries if explicit paths not set (default: true)
    #[serde(default = "default_true")]
    pub search_path: bool,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ytdlp_path: None,
            drm_downloader_path: None,
            ffmpeg_path: None,
            ffprobe_path: None,
            search_path: true,
        }
    }
}

impl ToolsConfig {
    /// Resolve the path of a named external binary
    ///
    /// An explicit configured path wins; otherwise PATH is searched via the
    /// `which` crate when `search_path` is enabled.
    ///
    /// # Arguments
    ///
    /// * `explicit` - The configured path for this tool, if any
    /// * `binary_name` - The binary name to search for in PATH
    pub fn resolve_binary(&self, explicit: &Option<PathBuf>, binary_name: &str) -> Result<PathBuf> {
        if let Some(path) = explicit {
            return Ok(path.clone());
        }
        if self.search_path
            && let Ok(path) = which::which(binary_name)
        {
            return Ok(path);
        }
        Err(Error::NotSupported(format!(
            "{} binary not found (set an explicit path or install it in PATH)",
            binary_name
        )))
    }
}

/// Remote API configuration (manifest and key endpoint)
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiConfig {
    /// HTTP request timeout in seconds (default: 30)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Upload presentation configuration (dimensions, streaming, thumbnail offset)
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Display width sent with video messages (default: 1280)
    #[serde(default = "default_video_width")]
    pub video_width: u32,

    /// Display height sent with video messages (default: 720)
    #[serde(default = "default_video_height")]
    pub video_height: u32,

    /// Request streaming support on video messages (default: true)
    #[serde(default = "default_true")]
    pub supports_streaming: bool,

    /// Offset into the media where the thumbnail frame is grabbed, in
    /// seconds (default: 60). Media shorter than the offset simply yields no
    /// generated thumbnail.
    #[serde(default = "default_thumbnail_offset")]
    pub thumbnail_offset_secs: u32,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            video_width: default_video_width(),
            video_height: default_video_height(),
            supports_streaming: true,
            thumbnail_offset_secs: default_thumbnail_offset(),
        }
    }
}

/// Main configuration for [`MediaDownloader`](crate::MediaDownloader)
///
/// Fields are organized into logical sub-configs:
/// - [`download`](DownloadConfig) — directories, downloader tuning
/// - [`tools`](ToolsConfig) — external binary paths
/// - [`api`](ApiConfig) — remote manifest/key endpoint behavior
/// - [`upload`](UploadConfig) — send presentation
///
/// All sub-config fields are flattened for serialization, so the JSON/TOML
/// format has no nesting and every field gets a sensible default.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Download behavior settings
    #[serde(flatten)]
    pub download: DownloadConfig,

    /// External tool settings
    #[serde(flatten)]
    pub tools: ToolsConfig,

    /// Remote API settings
    #[serde(flatten)]
    pub api: ApiConfig,

    /// Upload presentation settings
    #[serde(flatten)]
    pub upload: UploadConfig,
}

impl Config {
    /// Validate configuration values
    ///
    /// Checks the handful of fields where a zero or empty value would produce
    /// broken external-tool invocations rather than merely odd behavior.
    pub fn validate(&self) -> Result<()> {
        if self.upload.video_width == 0 || self.upload.video_height == 0 {
            return Err(Error::Config {
                message: "video dimensions must be non-zero".to_string(),
                key: Some("video_width/video_height".to_string()),
            });
        }
        if self.download.aria2c_min_split_size.is_empty() {
            return Err(Error::Config {
                message: "aria2c minimum split size must not be empty".to_string(),
                key: Some("aria2c_min_split_size".to_string()),
            });
        }
        if self.api.request_timeout_secs == 0 {
            return Err(Error::Config {
                message: "request timeout must be at least 1 second".to_string(),
                key: Some("request_timeout_secs".to_string()),
            });
        }
        Ok(())
    }
}

fn default_download_dir() -> PathBuf {
    PathBuf::from("./downloads")
}

fn default_fragment_retries() -> u32 {
    25
}

fn default_aria2c_connections() -> u32 {
    32
}

fn default_aria2c_concurrent() -> u32 {
    64
}

fn default_aria2c_splits() -> u32 {
    32
}

fn default_aria2c_min_split_size() -> String {
    "2M".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_video_width() -> u32 {
    1280
}

fn default_video_height() -> u32 {
    720
}

fn default_thumbnail_offset() -> u32 {
    60
}

fn default_true() -> bool {
    true
}
