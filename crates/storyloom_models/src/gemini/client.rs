//! Gemini image and Veo video REST client.

use super::conversion;
use super::dto::{GenerateContentResponse, Operation};
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::future::Future;
use storyloom_core::{ImageRequest, MediaPayload, OperationHandle, OperationStatus, VideoRequest};
use storyloom_error::{GatewayError, GatewayErrorKind, StoryloomResult};
use storyloom_interface::{ImageGateway, VideoGateway};
use tracing::{debug, info, instrument, warn};

/// Default REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default image model.
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";

/// Gemini REST client implementing both image and video gateways.
///
/// Transient HTTP failures (408, 429, 5xx, connection errors) are retried
/// with exponential backoff and jitter. This is transport-level retry only;
/// scenes and jobs are never retried automatically.
#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    image_model: String,
    no_retry: bool,
    max_retries: Option<usize>,
    retry_backoff_ms: Option<u64>,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("image_model", &self.image_model)
            .field("no_retry", &self.no_retry)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Creates a client reading the API key from `api_key_env`.
    ///
    /// # Errors
    ///
    /// Returns an error if the variable is unset or the HTTP client cannot
    /// be initialized.
    #[instrument(skip_all, fields(api_key_env = %api_key_env))]
    pub fn from_env(api_key_env: &str) -> StoryloomResult<Self> {
        let api_key = std::env::var(api_key_env).map_err(|_| {
            GatewayError::new(GatewayErrorKind::MissingApiKey(api_key_env.to_string()))
        })?;
        Self::with_api_key(api_key)
    }

    /// Creates a client with an explicit API key.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn with_api_key(api_key: impl Into<String>) -> StoryloomResult<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| GatewayError::new(GatewayErrorKind::ClientCreation(e.to_string())))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            no_retry: false,
            max_retries: None,
            retry_backoff_ms: None,
        })
    }

    /// Overrides the REST endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Overrides the default image model.
    pub fn with_image_model(mut self, model: impl Into<String>) -> Self {
        self.image_model = model.into();
        self
    }

    /// Configures transport retry.
    ///
    /// `max_retries = Some(0)` disables retry entirely.
    pub fn with_retry(mut self, max_retries: Option<usize>, retry_backoff_ms: Option<u64>) -> Self {
        self.no_retry = max_retries == Some(0);
        self.max_retries = max_retries;
        self.retry_backoff_ms = retry_backoff_ms;
        self
    }

    /// Base URL in use.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Runs `attempt` once, then retries transient failures with backoff.
    async fn with_backoff<T, F, Fut>(&self, operation: &str, attempt: F) -> Result<T, GatewayError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, GatewayError>>,
    {
        use tokio_retry2::{Retry, RetryError, strategy::ExponentialBackoff, strategy::jitter};

        let first = attempt().await;
        let err = match first {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        if self.no_retry || !err.kind.is_retryable() {
            warn!(operation, error = %err, "Gateway call failed, not retrying");
            return Err(err);
        }

        let (mut initial_ms, mut max_retries, max_delay_secs) = err.kind.retry_strategy_params();
        if let Some(backoff) = self.retry_backoff_ms {
            initial_ms = backoff;
        }
        if let Some(retries) = self.max_retries {
            max_retries = retries;
        }

        info!(
            operation,
            error = %err,
            initial_backoff_ms = initial_ms,
            max_retries,
            max_delay_secs,
            "Gateway call failed, will retry with configured strategy"
        );

        let strategy = ExponentialBackoff::from_millis(initial_ms)
            .factor(2)
            .max_delay(std::time::Duration::from_secs(max_delay_secs))
            .map(jitter)
            .take(max_retries);

        let attempt = &attempt;
        Retry::spawn(strategy, move || async move {
            match attempt().await {
                Ok(value) => Ok(value),
                Err(e) if e.kind.is_retryable() => {
                    warn!(operation, error = %e, "Transient gateway error, will retry");
                    Err(RetryError::Transient {
                        err: e,
                        retry_after: None,
                    })
                }
                Err(e) => {
                    warn!(operation, error = %e, "Permanent gateway error, failing immediately");
                    Err(RetryError::Permanent(e))
                }
            }
        })
        .await
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, GatewayError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status_code = response.status().as_u16();
        let message = response.text().await.unwrap_or_default();
        Err(GatewayError::new(GatewayErrorKind::HttpStatus {
            status_code,
            message,
        }))
    }

    async fn post_json<B, R>(&self, url: &str, body: &B) -> Result<R, GatewayError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        debug!(url = %url, "Sending Gemini API request");
        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| GatewayError::new(GatewayErrorKind::Transport(e.to_string())))?;

        Self::check_status(response)
            .await?
            .json::<R>()
            .await
            .map_err(|e| GatewayError::new(GatewayErrorKind::InvalidResponse(e.to_string())))
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, GatewayError> {
        debug!(url = %url, "Sending Gemini API GET");
        let response = self
            .client
            .get(url)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| GatewayError::new(GatewayErrorKind::Transport(e.to_string())))?;
        Self::check_status(response).await
    }
}

#[async_trait]
impl ImageGateway for GeminiClient {
    #[instrument(skip(self, req), fields(parts = req.parts.len(), images = req.image_count()))]
    async fn generate_image(&self, req: &ImageRequest) -> StoryloomResult<Option<MediaPayload>> {
        let model = req.model.as_deref().unwrap_or(&self.image_model);
        let url = format!("{}/models/{}:generateContent", self.base_url, model);
        let body = conversion::to_generate_content_request(req);
        let (url, body) = (url.as_str(), &body);

        let response: GenerateContentResponse = self
            .with_backoff("generate_image", move || self.post_json(url, body))
            .await?;

        let image = conversion::first_inline_image(&response)?;
        if image.is_none() {
            warn!(model, "Gemini returned no inline image");
        }
        Ok(image)
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    fn model_name(&self) -> &str {
        &self.image_model
    }
}

#[async_trait]
impl VideoGateway for GeminiClient {
    #[instrument(skip(self, req), fields(model = %req.model(), aspect_ratio = %req.aspect_ratio()))]
    async fn start_video(&self, req: &VideoRequest) -> StoryloomResult<OperationHandle> {
        let url = format!("{}/models/{}:predictLongRunning", self.base_url, req.model());
        let body = conversion::to_predict_request(req)?;
        let (url, body) = (url.as_str(), &body);

        let operation: Operation = self
            .with_backoff("start_video", move || self.post_json(url, body))
            .await?;

        if operation.name().is_empty() {
            return Err(GatewayError::new(GatewayErrorKind::InvalidResponse(
                "Operation name missing from predictLongRunning response".to_string(),
            ))
            .into());
        }

        info!(operation = %operation.name(), "Video generation started");
        Ok(OperationHandle {
            name: operation.name().clone(),
        })
    }

    #[instrument(skip(self), fields(operation = %handle))]
    async fn poll_operation(&self, handle: &OperationHandle) -> StoryloomResult<OperationStatus> {
        let url = format!("{}/{}", self.base_url, handle.name);
        let url = url.as_str();
        let operation: Operation = self
            .with_backoff("poll_operation", move || async move {
                self.get(url)
                    .await?
                    .json::<Operation>()
                    .await
                    .map_err(|e| {
                        GatewayError::new(GatewayErrorKind::InvalidResponse(e.to_string()))
                    })
            })
            .await?;

        let status = conversion::operation_status(&operation);
        debug!(done = status.done, has_locator = status.locator.is_some(), "Polled operation");
        Ok(status)
    }

    #[instrument(skip(self, locator))]
    async fn download_video(&self, locator: &str) -> StoryloomResult<MediaPayload> {
        let bytes = self
            .with_backoff("download_video", move || async move {
                self.get(locator)
                    .await?
                    .bytes()
                    .await
                    .map_err(|e| GatewayError::new(GatewayErrorKind::Transport(e.to_string())))
            })
            .await?;

        info!(size = bytes.len(), "Downloaded video");
        Ok(MediaPayload::new("video/mp4", bytes.to_vec()))
    }
}
