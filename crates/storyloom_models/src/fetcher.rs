//! Resolves result locators back into bytes.

use async_trait::async_trait;
use std::path::Path;
use storyloom_core::MediaPayload;
use storyloom_error::{
    GatewayError, GatewayErrorKind, StorageError, StorageErrorKind, StoryloomResult,
};
use storyloom_interface::ReferenceFetcher;
use tracing::{debug, instrument};

/// Fetches `data:` URLs, `http(s)://` URLs and local file paths.
#[derive(Debug, Clone, Default)]
pub struct HttpReferenceFetcher {
    client: reqwest::Client,
}

impl HttpReferenceFetcher {
    /// Creates a fetcher with a default HTTP client.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReferenceFetcher for HttpReferenceFetcher {
    #[instrument(skip(self, locator), fields(scheme = locator.split(':').next().unwrap_or("")))]
    async fn fetch(&self, locator: &str) -> StoryloomResult<MediaPayload> {
        if locator.starts_with("data:") {
            return MediaPayload::from_data_url(locator).ok_or_else(|| {
                GatewayError::new(GatewayErrorKind::Base64Decode(
                    "Malformed data URL".to_string(),
                ))
                .into()
            });
        }

        if locator.starts_with("http://") || locator.starts_with("https://") {
            let response = self
                .client
                .get(locator)
                .send()
                .await
                .map_err(|e| GatewayError::new(GatewayErrorKind::Transport(e.to_string())))?;

            if !response.status().is_success() {
                let status_code = response.status().as_u16();
                let message = response
                    .status()
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string();
                return Err(GatewayError::new(GatewayErrorKind::HttpStatus {
                    status_code,
                    message,
                })
                .into());
            }

            let mime = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("image/png")
                .to_string();
            let bytes = response
                .bytes()
                .await
                .map_err(|e| GatewayError::new(GatewayErrorKind::Transport(e.to_string())))?;
            debug!(size = bytes.len(), mime = %mime, "Fetched remote reference");
            return Ok(MediaPayload::new(mime, bytes.to_vec()));
        }

        let path = Path::new(locator.strip_prefix("file://").unwrap_or(locator));
        let data = tokio::fs::read(path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: {}",
                path.display(),
                e
            )))
        })?;
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("png");
        debug!(size = data.len(), path = %path.display(), "Read local reference");
        Ok(MediaPayload::new(MediaPayload::mime_for_extension(ext), data))
    }
}
