//! Shared subprocess plumbing for the external tool wrappers

use crate::error::{Error, Result};
use std::ffi::OsStr;
use std::path::Path;
use std::process::Output;
use tokio::process::Command;

/// Stdout/stderr excerpts in logs are capped at this many bytes
pub(crate) const OUTPUT_EXCERPT_BYTES: usize = 500;

/// Run an external tool to completion, capturing its output
///
/// Only a failure to execute the binary at all is an error here; a non-zero
/// exit is returned to the caller inside [`Output`], since several of the
/// tools exit non-zero on partial or cosmetic failures yet still produce
/// usable files.
pub(crate) async fn run_tool<I, S>(binary_path: &Path, args: I) -> Result<Output>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    Command::new(binary_path)
        .args(args)
        .output()
        .await
        .map_err(|e| {
            Error::ExternalTool(format!(
                "failed to execute {}: {}",
                binary_path.display(),
                e
            ))
        })
}

/// Lossy-decode the first [`OUTPUT_EXCERPT_BYTES`] of a captured stream
pub(crate) fn excerpt(stream: &[u8]) -> String {
    let end = stream.len().min(OUTPUT_EXCERPT_BYTES);
    String::from_utf8_lossy(&stream[..end]).into_owned()
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_excerpt_caps_length() {
        let long = vec![b'a'; 2000];
        assert_eq!(excerpt(&long).len(), OUTPUT_EXCERPT_BYTES);
    }

    #[test]
    fn test_excerpt_short_stream() {
        assert_eq!(excerpt(b"done"), "done");
    }

    #[test]
    fn test_excerpt_lossy_on_invalid_utf8() {
        let bytes = [b'o', b'k', 0xff, 0xfe];
        let text = excerpt(&bytes);
        assert!(text.starts_with("ok"));
    }

    #[tokio::test]
    async fn test_run_tool_missing_binary() {
        let result = run_tool(
            &PathBuf::from("/nonexistent/path/to/tool"),
            ["--version"],
        )
        .await;
        assert!(matches!(result, Err(Error::ExternalTool(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_tool_captures_output_and_exit_code() {
        let output = run_tool(&PathBuf::from("/bin/sh"), ["-c", "echo out; echo err >&2; exit 3"])
            .await
            .unwrap();
        assert_eq!(output.status.code(), Some(3));
        assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "out");
        assert_eq!(String::from_utf8_lossy(&output.stderr).trim(), "err");
    }
}
