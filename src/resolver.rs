//! Output-file resolution after an external download tool has run
//!
//! Downloader tools frequently normalize, change, or append to the requested
//! output name: yt-dlp remuxes into `.mkv` when codecs do not fit the asked
//! container, appends `.webm` for some formats, and occasionally produces the
//! doubled `.mp4.webm` suffix. This module encodes those observed quirks as a
//! fixed candidate list checked in priority order.
//!
//! The ordering encodes observed tool behavior and must not be reordered.

use crate::types::DownloadResult;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Determine which file an external download tool actually produced
///
/// Probes a fixed list of candidates derived from `requested_name`, first
/// existing file wins:
///
/// 1. `requested_name` itself, unmodified
/// 2. `requested_name + ".webm"`
/// 3. `base_name + ".mkv"`
/// 4. `base_name + ".mp4"`
/// 5. `base_name + ".mp4.webm"`
///
/// where `base_name` is `requested_name` truncated at the first `.` of its
/// file name (directories are never truncated).
///
/// If no candidate exists, the files sharing the base-name prefix are logged
/// for diagnostics (never auto-selected) and the requested name is returned
/// unmodified with `found = false` — callers proceed optimistically. If that
/// diagnostic enumeration itself hits a missing directory, the fallback is
/// the requested name with its last extension replaced by `.mp4`.
///
/// This is a pure function of filesystem state: calling it twice with
/// identical on-disk state yields identical results.
#[must_use]
pub fn resolve(requested_name: &str) -> DownloadResult {
    let base_name = base_name(requested_name);

    let candidates = [
        requested_name.to_string(),
        format!("{requested_name}.webm"),
        format!("{base_name}.mkv"),
        format!("{base_name}.mp4"),
        format!("{base_name}.mp4.webm"),
    ];

    for candidate in &candidates {
        if Path::new(candidate).is_file() {
            debug!(requested = requested_name, resolved = %candidate, "output file resolved");
            return DownloadResult {
                resolved_path: PathBuf::from(candidate),
                found: true,
            };
        }
    }

    // Nothing matched: surface what actually exists next to the expected
    // output, then hand back the requested name as a best-effort guess.
    match sibling_files(&base_name) {
        Ok(existing) => {
            debug!(
                expected = requested_name,
                found_files = ?existing,
                "no output candidate exists"
            );
            DownloadResult {
                resolved_path: PathBuf::from(requested_name),
                found: false,
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            // The output directory itself is gone (e.g. a concurrent
            // cleanup); assume the conventional container.
            DownloadResult {
                resolved_path: Path::new(requested_name).with_extension("mp4"),
                found: false,
            }
        }
        Err(e) => {
            warn!(requested = requested_name, error = %e, "could not enumerate output directory");
            DownloadResult {
                resolved_path: PathBuf::from(requested_name),
                found: false,
            }
        }
    }
}

/// Truncate the file-name component of `requested_name` at its first `.`
///
/// `"clips/intro.mp4.webm"` becomes `"clips/intro"`. The directory portion
/// is preserved verbatim, dots and all.
fn base_name(requested_name: &str) -> String {
    let split_at = match requested_name.rfind(std::path::MAIN_SEPARATOR) {
        Some(sep) => sep + 1,
        None => 0,
    };
    let (dir, file) = requested_name.split_at(split_at);
    let stem = file.split('.').next().unwrap_or(file);
    format!("{dir}{stem}")
}

/// List on-disk files whose name starts with the base name
///
/// Diagnostic only — the result is logged, never auto-selected.
fn sibling_files(base_name: &str) -> std::io::Result<Vec<PathBuf>> {
    let base_path = Path::new(base_name);
    let dir = match base_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let prefix = base_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(base_name);

    let mut matches = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if let Some(name) = entry.file_name().to_str()
            && name.starts_with(prefix)
        {
            matches.push(entry.path());
        }
    }
    matches.sort();
    Ok(matches)
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Build a requested name inside a dedicated dot-free subdirectory, since
    /// the resolver candidates are exercised with full path strings.
    fn workspace() -> (TempDir, PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("out");
        fs::create_dir(&dir).unwrap();
        (temp_dir, dir)
    }

    fn touch(path: &Path) {
        fs::write(path, b"media").unwrap();
    }

    #[test]
    fn test_requested_name_wins_when_present() {
        let (_guard, dir) = workspace();
        let requested = dir.join("clip.mp4");
        touch(&requested);
        // A lower-priority candidate also exists
        touch(&dir.join("clip.mkv"));

        let result = resolve(requested.to_str().unwrap());
        assert!(result.found);
        assert_eq!(result.resolved_path, requested);
    }

    #[test]
    fn test_webm_suffix_beats_base_candidates() {
        let (_guard, dir) = workspace();
        let requested = dir.join("clip.mp4");
        touch(&dir.join("clip.mp4.webm"));
        touch(&dir.join("clip.mkv"));

        let result = resolve(requested.to_str().unwrap());
        assert!(result.found);
        // `requested + ".webm"` is priority 2, `base + ".mkv"` only 3
        assert_eq!(result.resolved_path, dir.join("clip.mp4.webm"));
    }

    #[test]
    fn test_mkv_beats_mp4() {
        let (_guard, dir) = workspace();
        let requested = dir.join("clip.webm");
        touch(&dir.join("clip.mkv"));
        touch(&dir.join("clip.mp4"));

        let result = resolve(requested.to_str().unwrap());
        assert!(result.found);
        assert_eq!(result.resolved_path, dir.join("clip.mkv"));
    }

    #[test]
    fn test_base_name_truncates_at_first_dot_of_file_name() {
        let (_guard, dir) = workspace();
        // requested "clip.part1.mp4" — base is "clip", not "clip.part1"
        let requested = dir.join("clip.part1.mp4");
        touch(&dir.join("clip.mkv"));

        let result = resolve(requested.to_str().unwrap());
        assert!(result.found);
        assert_eq!(result.resolved_path, dir.join("clip.mkv"));
    }

    #[test]
    fn test_doubled_suffix_is_last_resort() {
        let (_guard, dir) = workspace();
        let requested = dir.join("clip.webm");
        touch(&dir.join("clip.mp4.webm"));

        let result = resolve(requested.to_str().unwrap());
        assert!(result.found);
        assert_eq!(result.resolved_path, dir.join("clip.mp4.webm"));
    }

    #[test]
    fn test_no_candidate_returns_requested_name_unmodified() {
        let (_guard, dir) = workspace();
        let requested = dir.join("clip.mp4");
        // Only an unrelated sibling sharing the prefix exists
        touch(&dir.join("clip.part"));

        let result = resolve(requested.to_str().unwrap());
        assert!(!result.found);
        // No extension substitution on the optimistic path
        assert_eq!(result.resolved_path, requested);
    }

    #[test]
    fn test_missing_directory_falls_back_to_mp4() {
        let (_guard, dir) = workspace();
        let requested = dir.join("gone").join("clip.mp4.webm");

        let result = resolve(requested.to_str().unwrap());
        assert!(!result.found);
        // Last extension replaced, mirroring splitext-style fallback
        assert_eq!(result.resolved_path, dir.join("gone").join("clip.mp4.mp4"));
    }

    #[test]
    fn test_idempotent_for_fixed_disk_state() {
        let (_guard, dir) = workspace();
        let requested = dir.join("clip.webm");
        touch(&dir.join("clip.mp4"));

        let first = resolve(requested.to_str().unwrap());
        let second = resolve(requested.to_str().unwrap());
        assert_eq!(first, second);
        assert!(first.found);
        assert_eq!(first.resolved_path, dir.join("clip.mp4"));
    }

    #[test]
    fn test_directory_entry_is_not_a_candidate() {
        let (_guard, dir) = workspace();
        let requested = dir.join("clip");
        // A directory named exactly like the requested output must not match
        fs::create_dir(&requested).unwrap();

        let result = resolve(requested.to_str().unwrap());
        assert!(!result.found);
        assert_eq!(result.resolved_path, requested);
    }

    #[test]
    fn test_sibling_files_enumeration() {
        let (_guard, dir) = workspace();
        touch(&dir.join("clip.f137.mp4.part"));
        touch(&dir.join("clip.f140.m4a.part"));
        touch(&dir.join("other.mp4"));

        let base = dir.join("clip");
        let siblings = sibling_files(base.to_str().unwrap()).unwrap();
        assert_eq!(siblings.len(), 2);
        assert!(siblings.iter().all(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("clip"))
        }));
    }
}
