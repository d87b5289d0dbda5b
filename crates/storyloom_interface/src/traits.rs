//! Gateway capability traits.

use async_trait::async_trait;
use storyloom_core::{ImageRequest, MediaPayload, OperationHandle, OperationStatus, VideoRequest};
use storyloom_error::StoryloomResult;

/// Image generation from an ordered bundle of parts.
#[async_trait]
pub trait ImageGateway: Send + Sync {
    /// Generate one image.
    ///
    /// Returns `Ok(None)` when the model answered without producing an image.
    async fn generate_image(&self, req: &ImageRequest) -> StoryloomResult<Option<MediaPayload>>;

    /// Provider name (e.g., "gemini").
    fn provider_name(&self) -> &'static str;

    /// Default image model identifier.
    fn model_name(&self) -> &str;
}

/// Long-running video generation.
#[async_trait]
pub trait VideoGateway: Send + Sync {
    /// Start a generation and return its operation handle.
    async fn start_video(&self, req: &VideoRequest) -> StoryloomResult<OperationHandle>;

    /// Fetch the current state of an operation.
    async fn poll_operation(&self, handle: &OperationHandle) -> StoryloomResult<OperationStatus>;

    /// Download the bytes behind a result locator.
    async fn download_video(&self, locator: &str) -> StoryloomResult<MediaPayload>;
}

/// Resolves a previously produced result locator back into bytes.
#[async_trait]
pub trait ReferenceFetcher: Send + Sync {
    /// Fetch the media behind `locator`.
    async fn fetch(&self, locator: &str) -> StoryloomResult<MediaPayload>;
}
