//! Remote API client for manifest/key lookup and direct file downloads

use crate::config::ApiConfig;
use crate::error::Result;
use crate::types::ManifestInfo;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Wire shape of the manifest/key endpoint: `{ "data": { "mpd": ..., "keys": [...] } }`
#[derive(Debug, Default, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    data: ApiData,
}

#[derive(Debug, Default, Deserialize)]
struct ApiData {
    #[serde(default)]
    mpd: String,
    #[serde(default)]
    keys: Vec<String>,
}

/// HTTP client for the remote media API
///
/// Wraps a [`reqwest::Client`] with the configured request timeout. One
/// instance is shared across requests; `reqwest` pools connections
/// internally.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
}

impl ApiClient {
    /// Create a client with the configured request timeout
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self { http })
    }

    /// Fetch the DASH manifest URL and decryption keys for a piece of content
    ///
    /// Degrades rather than fails: a non-2xx status, network error, or
    /// malformed body is logged and yields [`ManifestInfo::empty()`], which
    /// callers interpret as "no manifest available". Errors never escape
    /// this boundary.
    pub async fn manifest_and_keys(&self, url: &str) -> ManifestInfo {
        match self.fetch_manifest(url).await {
            Ok(info) => info,
            Err(e) => {
                warn!(url, error = %e, "manifest/key fetch failed, returning empty result");
                ManifestInfo::empty()
            }
        }
    }

    async fn fetch_manifest(&self, url: &str) -> Result<ManifestInfo> {
        let response = self.http.get(url).send().await?.error_for_status()?;
        let text = response.text().await?;
        let body: ApiResponse = serde_json::from_str(&text)?;

        // An absent or empty mpd field both mean "no manifest"
        let mpd = if body.data.mpd.is_empty() {
            None
        } else {
            Some(body.data.mpd)
        };
        debug!(url, has_mpd = mpd.is_some(), key_count = body.data.keys.len(), "manifest fetched");
        Ok(ManifestInfo {
            mpd,
            keys: body.data.keys,
        })
    }

    /// Download a file over plain HTTP into `dest`
    ///
    /// Unlike [`manifest_and_keys`](Self::manifest_and_keys) this surfaces
    /// failures: a non-2xx status or write error is returned to the caller.
    pub async fn download_file(&self, url: &str, dest: &Path) -> Result<PathBuf> {
        let response = self.http.get(url).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;
        tokio::fs::write(dest, &bytes).await?;
        debug!(url, dest = %dest.display(), size = bytes.len(), "file downloaded");
        Ok(dest.to_path_buf())
    }

    /// Download a PDF, writing it to `<name>.pdf`
    pub async fn download_pdf(&self, url: &str, name: &str) -> Result<PathBuf> {
        let dest = PathBuf::from(format!("{name}.pdf"));
        self.download_file(url, &dest).await
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client() -> ApiClient {
        ApiClient::new(&ApiConfig::default()).unwrap()
    }

    async fn mock_get(path_str: &str, template: ResponseTemplate) -> (MockServer, String) {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(path_str))
            .respond_with(template)
            .mount(&server)
            .await;
        let url = format!("{}{}", server.uri(), path_str);
        (server, url)
    }

    #[tokio::test]
    async fn manifest_and_keys_parses_well_formed_body() {
        let (_server, url) = mock_get(
            "/api/content/42",
            ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {
                    "mpd": "https://cdn.example.com/42.mpd",
                    "keys": ["kid1:key1", "kid2:key2"]
                }
            })),
        )
        .await;

        let info = client().manifest_and_keys(&url).await;

        assert_eq!(info.mpd.as_deref(), Some("https://cdn.example.com/42.mpd"));
        assert_eq!(info.keys, vec!["kid1:key1", "kid2:key2"]);
    }

    #[tokio::test]
    async fn manifest_and_keys_malformed_body_degrades_to_empty() {
        let (_server, url) = mock_get(
            "/api/content/7",
            ResponseTemplate::new(200).set_body_string("not json at all"),
        )
        .await;

        let info = client().manifest_and_keys(&url).await;

        assert_eq!(info, ManifestInfo::empty());
    }

    #[tokio::test]
    async fn manifest_and_keys_server_error_degrades_to_empty() {
        let (_server, url) = mock_get("/api/content/8", ResponseTemplate::new(500)).await;

        let info = client().manifest_and_keys(&url).await;

        assert_eq!(info, ManifestInfo::empty());
    }

    #[tokio::test]
    async fn manifest_and_keys_empty_mpd_string_maps_to_none() {
        let (_server, url) = mock_get(
            "/api/content/9",
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "data": { "mpd": "", "keys": [] } })),
        )
        .await;

        let info = client().manifest_and_keys(&url).await;

        assert!(info.mpd.is_none());
        assert!(info.keys.is_empty());
    }

    #[tokio::test]
    async fn manifest_and_keys_missing_data_object_degrades_gracefully() {
        let (_server, url) = mock_get(
            "/api/content/10",
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "status": "ok" })),
        )
        .await;

        let info = client().manifest_and_keys(&url).await;

        assert_eq!(info, ManifestInfo::empty());
    }

    #[tokio::test]
    async fn download_file_writes_body_to_dest() {
        let (_server, url) = mock_get(
            "/files/notes.pdf",
            ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.7 fake".to_vec()),
        )
        .await;

        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("notes.pdf");
        let written = client().download_file(&url, &dest).await.unwrap();

        assert_eq!(written, dest);
        assert_eq!(std::fs::read(&dest).unwrap(), b"%PDF-1.7 fake");
    }

    #[tokio::test]
    async fn download_file_propagates_http_error() {
        let (_server, url) = mock_get("/files/missing.pdf", ResponseTemplate::new(404)).await;

        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("missing.pdf");
        let result = client().download_file(&url, &dest).await;

        assert!(result.is_err());
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn download_pdf_appends_extension() {
        let (_server, url) = mock_get(
            "/files/worksheet",
            ResponseTemplate::new(200).set_body_bytes(b"%PDF".to_vec()),
        )
        .await;

        let temp_dir = TempDir::new().unwrap();
        let name = temp_dir.path().join("worksheet");
        let written = client()
            .download_pdf(&url, name.to_str().unwrap())
            .await
            .unwrap();

        assert_eq!(
            written.file_name().and_then(|n| n.to_str()),
            Some("worksheet.pdf")
        );
        assert!(written.exists());
    }
}
