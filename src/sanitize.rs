//! Filename sanitization
//!
//! User-supplied media titles routinely contain characters that are invalid
//! in filenames or that confuse the external downloader tools. This module
//! normalizes them before they are used as output names.

use regex::Regex;
use std::sync::LazyLock;

/// Maximum length of a sanitized filename
const MAX_FILENAME_LENGTH: usize = 200;

/// Characters that are invalid in filenames on at least one supported platform
#[allow(clippy::expect_used)]
static INVALID_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[<>:"/\\|?*]"#).expect("hardcoded pattern is valid"));

/// ASCII control characters (0x00-0x1f and 0x7f)
#[allow(clippy::expect_used)]
static CONTROL_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\x00-\x1f\x7f]").expect("hardcoded pattern is valid"));

/// Remove or replace characters that are invalid in filenames
///
/// Strips filesystem-reserved characters and control characters, trims
/// surrounding whitespace, and caps the result at 200 characters. A name
/// that sanitizes to nothing becomes `"unnamed"`.
///
/// # Examples
///
/// ```
/// use tg_media_dl::sanitize::sanitize_filename;
///
/// assert_eq!(sanitize_filename("Lecture 3: Ownership?"), "Lecture 3 Ownership");
/// assert_eq!(sanitize_filename("  <*>  "), "unnamed");
/// ```
#[must_use]
pub fn sanitize_filename(filename: &str) -> String {
    let without_invalid = INVALID_CHARS.replace_all(filename, "");
    let without_control = CONTROL_CHARS.replace_all(&without_invalid, "");
    let trimmed = without_control.trim();

    let capped: String = if trimmed.chars().count() > MAX_FILENAME_LENGTH {
        trimmed.chars().take(MAX_FILENAME_LENGTH).collect()
    } else {
        trimmed.to_string()
    };

    if capped.is_empty() {
        "unnamed".to_string()
    } else {
        capped
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_reserved_characters() {
        assert_eq!(sanitize_filename(r#"a<b>c:d"e/f\g|h?i*j"#), "abcdefghij");
    }

    #[test]
    fn test_strips_control_characters() {
        assert_eq!(sanitize_filename("clip\x00name\x1f.mp4\x7f"), "clipname.mp4");
    }

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(sanitize_filename("  episode 01  "), "episode 01");
    }

    #[test]
    fn test_empty_becomes_unnamed() {
        assert_eq!(sanitize_filename(""), "unnamed");
        assert_eq!(sanitize_filename("   "), "unnamed");
        assert_eq!(sanitize_filename("<>:?*"), "unnamed");
    }

    #[test]
    fn test_caps_length_at_200() {
        let long = "x".repeat(500);
        let sanitized = sanitize_filename(&long);
        assert_eq!(sanitized.chars().count(), 200);
    }

    #[test]
    fn test_normal_name_unchanged() {
        assert_eq!(
            sanitize_filename("Physics.Chapter.12.720p.mp4"),
            "Physics.Chapter.12.720p.mp4"
        );
    }

    #[test]
    fn test_unicode_preserved() {
        assert_eq!(sanitize_filename("Видео урок 5.mp4"), "Видео урок 5.mp4");
    }
}
