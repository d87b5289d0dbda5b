//! Gemini REST API data transfer objects.

use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Inline binary content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    /// MIME type
    mime_type: String,
    /// Base64-encoded bytes
    data: String,
}

impl InlineData {
    /// Creates inline data from a MIME type and base64 text.
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }
}

/// One part of a content block: either inline data or text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    /// Inline image data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
    /// Text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[getter(skip)]
    text: Option<String>,
}

impl Part {
    /// Text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            inline_data: None,
            text: Some(text.into()),
        }
    }

    /// Inline data part.
    pub fn inline(data: InlineData) -> Self {
        Self {
            inline_data: Some(data),
            text: None,
        }
    }
}

/// Ordered list of parts.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Getters)]
pub struct Content {
    /// Parts in order
    #[serde(default)]
    parts: Vec<Part>,
}

impl Content {
    /// Wraps parts into a content block.
    pub fn new(parts: Vec<Part>) -> Self {
        Self { parts }
    }
}

/// `generateContent` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct GenerateContentRequest {
    /// Conversation contents (a single user turn for image generation)
    contents: Vec<Content>,
}

impl GenerateContentRequest {
    /// Single-turn request.
    pub fn new(content: Content) -> Self {
        Self {
            contents: vec![content],
        }
    }
}

/// One response candidate.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Generated content
    #[serde(default)]
    content: Option<Content>,
    /// Why generation stopped
    #[serde(default)]
    finish_reason: Option<String>,
}

/// `generateContent` response body.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Getters)]
pub struct GenerateContentResponse {
    /// Candidates; only the first is used
    #[serde(default)]
    candidates: Vec<Candidate>,
}

/// Seed image for video generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct VideoImage {
    /// Base64-encoded bytes
    bytes_base64_encoded: String,
    /// MIME type
    mime_type: String,
}

impl VideoImage {
    /// Creates a seed image.
    pub fn new(bytes_base64_encoded: String, mime_type: String) -> Self {
        Self {
            bytes_base64_encoded,
            mime_type,
        }
    }
}

/// One `predictLongRunning` instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into))]
pub struct VideoInstance {
    /// Prompt text
    prompt: String,
    /// Optional starting frame
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image: Option<VideoImage>,
}

impl VideoInstance {
    /// Creates a new builder for `VideoInstance`.
    pub fn builder() -> VideoInstanceBuilder {
        VideoInstanceBuilder::default()
    }
}

/// Video generation parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder, Getters)]
#[serde(rename_all = "camelCase")]
#[builder(setter(into))]
pub struct VideoParameters {
    /// Aspect ratio, e.g. "16:9"
    aspect_ratio: String,
    /// Resolution, e.g. "720p"
    resolution: String,
    /// Number of videos
    #[builder(default = "1")]
    sample_count: u32,
}

impl VideoParameters {
    /// Creates a new builder for `VideoParameters`.
    pub fn builder() -> VideoParametersBuilder {
        VideoParametersBuilder::default()
    }
}

/// `predictLongRunning` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct PredictRequest {
    /// Instances (one per request here)
    instances: Vec<VideoInstance>,
    /// Generation parameters
    parameters: VideoParameters,
}

impl PredictRequest {
    /// Creates a request body.
    pub fn new(instances: Vec<VideoInstance>, parameters: VideoParameters) -> Self {
        Self {
            instances,
            parameters,
        }
    }
}

/// Error payload of a finished operation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Getters)]
pub struct OperationError {
    /// Status code
    #[serde(default)]
    code: i32,
    /// Message
    #[serde(default)]
    message: String,
}

/// Long-running operation resource.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Getters)]
pub struct Operation {
    /// Resource name, used for polling
    #[serde(default)]
    name: String,
    /// Whether the operation has finished
    #[serde(default)]
    done: bool,
    /// Result payload once done
    #[serde(default)]
    response: Option<serde_json::Value>,
    /// Error once done
    #[serde(default)]
    error: Option<OperationError>,
}
