//! Start, poll, download and save one video.

use crate::{JobRunner, ProgressFn};
use std::path::PathBuf;
use std::time::Duration;
use storyloom_core::{InputType, Job, VideoRequest};
use storyloom_error::{BuilderError, GatewayError, GatewayErrorKind, StoryloomResult};
use storyloom_interface::VideoGateway;
use storyloom_storage::ResultExporter;

/// Default delay between operation polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Progress message sent before anything else.
pub const PROGRESS_INITIALIZING: &str = "Initializing generation...";
/// Progress message sent right before the start request.
pub const PROGRESS_REQUESTING: &str = "Requesting video generation...";
/// Progress message sent after every poll.
pub const PROGRESS_POLLING: &str = "Processing video generation (polling status)...";

/// Drives one video job through a [`VideoGateway`] and saves the result.
pub struct VideoPipeline<V: VideoGateway, E: ResultExporter> {
    gateway: V,
    exporter: E,
    poll_interval: Duration,
    resolution: String,
}

impl<V: VideoGateway, E: ResultExporter> VideoPipeline<V, E> {
    /// Create a pipeline with the default poll interval and 720p output.
    pub fn new(gateway: V, exporter: E) -> Self {
        Self {
            gateway,
            exporter,
            poll_interval: DEFAULT_POLL_INTERVAL,
            resolution: "720p".to_string(),
        }
    }

    /// Override the delay between polls.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Override the requested resolution.
    pub fn with_resolution(mut self, resolution: impl Into<String>) -> Self {
        self.resolution = resolution.into();
        self
    }

    /// Get a reference to the underlying gateway.
    pub fn gateway(&self) -> &V {
        &self.gateway
    }

    /// Gateway request for `job`.
    ///
    /// The seed image is attached only for image input.
    pub fn request_for(&self, job: &Job) -> StoryloomResult<VideoRequest> {
        let seed_image = match job.input_type() {
            InputType::Image => job.seed_image().clone(),
            InputType::Text => None,
        };
        let request = VideoRequest::builder()
            .prompt(job.prompt().clone())
            .model(*job.model())
            .aspect_ratio(*job.aspect_ratio())
            .resolution(self.resolution.clone())
            .sample_count(1u32)
            .seed_image(seed_image)
            .build()
            .map_err(|e| BuilderError::from(format!("Failed to build video request: {}", e)))?;
        Ok(request)
    }

    /// Generate the video for `job` and save it as `video_<short id>.mp4`.
    ///
    /// Returns the saved path.
    ///
    /// # Errors
    ///
    /// Gateway failures, an operation that reports an error, an operation
    /// that finishes without a download link, or a failed save.
    #[tracing::instrument(skip(self, job, progress), fields(job = %job.short_id()))]
    pub async fn run(&self, job: &Job, progress: ProgressFn<'_>) -> StoryloomResult<PathBuf> {
        progress(PROGRESS_INITIALIZING);
        let request = self.request_for(job)?;

        progress(PROGRESS_REQUESTING);
        let handle = self.gateway.start_video(&request).await?;
        tracing::debug!(operation = %handle, "Video operation started");

        let mut polls = 0u32;
        let status = loop {
            tokio::time::sleep(self.poll_interval).await;
            let status = self.gateway.poll_operation(&handle).await?;
            polls += 1;
            progress(PROGRESS_POLLING);
            if status.done {
                break status;
            }
        };
        tracing::debug!(polls, "Video operation finished");

        if let Some(message) = status.error {
            return Err(GatewayError::new(GatewayErrorKind::OperationFailed(message)).into());
        }
        let locator = status.locator.ok_or_else(|| {
            GatewayError::new(GatewayErrorKind::EmptyResult(
                "No download link returned from operation".to_string(),
            ))
        })?;

        let video = self.gateway.download_video(&locator).await?;
        let filename = format!("video_{}.mp4", job.short_id());
        let path = self.exporter.save_result(&filename, &video).await?;
        tracing::info!(path = %path.display(), size = video.data.len(), "Video saved");
        Ok(path)
    }
}

#[async_trait::async_trait]
impl<V, E> JobRunner for VideoPipeline<V, E>
where
    V: VideoGateway + 'static,
    E: ResultExporter + 'static,
{
    async fn execute(&self, job: &Job, progress: ProgressFn<'_>) -> StoryloomResult<String> {
        let path = self.run(job, progress).await?;
        Ok(path.display().to_string())
    }
}
