//! Video gateway request and operation types.

use crate::{AspectRatio, MediaPayload, VideoModel};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Request to start a long-running video generation.
///
/// # Examples
///
/// ```
/// use storyloom_core::{AspectRatio, VideoModel, VideoRequest};
///
/// let request = VideoRequest::builder()
///     .prompt("A paper boat drifting down a gutter")
///     .model(VideoModel::VeoFast)
///     .aspect_ratio(AspectRatio::Portrait)
///     .build()
///     .unwrap();
///
/// assert_eq!(request.resolution(), "720p");
/// assert_eq!(*request.sample_count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize, derive_builder::Builder)]
#[builder(setter(into))]
pub struct VideoRequest {
    /// Prompt text
    prompt: String,
    /// Video model
    #[builder(default)]
    model: VideoModel,
    /// Output aspect ratio
    #[builder(default)]
    aspect_ratio: AspectRatio,
    /// Output resolution
    #[builder(default = "\"720p\".to_string()")]
    resolution: String,
    /// Number of videos requested
    #[builder(default = "1")]
    sample_count: u32,
    /// Optional starting frame
    #[builder(default)]
    seed_image: Option<MediaPayload>,
}

impl VideoRequest {
    /// Creates a new request builder.
    pub fn builder() -> VideoRequestBuilder {
        VideoRequestBuilder::default()
    }
}

/// Opaque handle to a long-running gateway operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[display("{}", name)]
pub struct OperationHandle {
    /// Operation resource name
    pub name: String,
}

/// Snapshot of a long-running operation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OperationStatus {
    /// Whether the operation has finished
    pub done: bool,
    /// Download locator of the first produced video, once done
    pub locator: Option<String>,
    /// Error reported by the operation, once done
    pub error: Option<String>,
}
