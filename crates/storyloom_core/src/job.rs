//! Bulk video generation jobs.

use crate::{GenerationStatus, MediaPayload};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Where a video job takes its visual starting point from.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
pub enum InputType {
    /// Prompt only
    #[default]
    Text,
    /// Prompt plus a seed image
    Image,
}

/// Supported video models.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
pub enum VideoModel {
    /// Fast preview model
    #[default]
    #[strum(serialize = "veo-3.1-fast-generate-preview")]
    #[serde(rename = "veo-3.1-fast-generate-preview")]
    VeoFast,
    /// High-quality preview model
    #[strum(serialize = "veo-3.1-generate-preview")]
    #[serde(rename = "veo-3.1-generate-preview")]
    VeoQuality,
}

/// Supported video aspect ratios.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
pub enum AspectRatio {
    /// Landscape
    #[default]
    #[strum(serialize = "16:9")]
    #[serde(rename = "16:9")]
    Landscape,
    /// Portrait
    #[strum(serialize = "9:16")]
    #[serde(rename = "9:16")]
    Portrait,
    /// Square
    #[strum(serialize = "1:1")]
    #[serde(rename = "1:1")]
    Square,
    /// Standard
    #[strum(serialize = "4:3")]
    #[serde(rename = "4:3")]
    Standard,
    /// Vertical
    #[strum(serialize = "3:4")]
    #[serde(rename = "3:4")]
    Vertical,
}

/// One independent video generation task.
///
/// The prompt is fully expanded at creation time and never changes. Runtime
/// fields move only through [`Job::apply`].
///
/// # Examples
///
/// ```
/// use storyloom_core::{GenerationStatus, Job, JobPatch};
///
/// let mut job = Job::builder().prompt("A lighthouse at dusk").build().unwrap();
/// assert_eq!(*job.status(), GenerationStatus::Pending);
///
/// job.apply(JobPatch::progress("Requesting video generation..."));
/// assert_eq!(job.progress_message().as_deref(), Some("Requesting video generation..."));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize, derive_builder::Builder)]
#[builder(setter(into))]
pub struct Job {
    /// Job identifier
    #[builder(default = "crate::new_id()")]
    id: String,
    /// Lifecycle status
    #[builder(default)]
    status: GenerationStatus,
    /// Final prompt sent to the model
    prompt: String,
    /// Text or image input
    #[builder(default)]
    input_type: InputType,
    /// Video model
    #[builder(default)]
    model: VideoModel,
    /// Output aspect ratio
    #[builder(default)]
    aspect_ratio: AspectRatio,
    /// Number of outputs requested
    #[builder(default = "1")]
    output_count: u32,
    /// Seed image for image-to-video
    #[builder(default)]
    seed_image: Option<MediaPayload>,
    /// Names of characters whose context was folded into the prompt
    #[builder(default)]
    reference_character_names: Vec<String>,
    /// Latest progress message
    #[builder(default)]
    progress_message: Option<String>,
    /// Locator of the produced video
    #[builder(default)]
    result_url: Option<String>,
    /// Human-readable failure
    #[builder(default)]
    error: Option<String>,
}

impl Job {
    /// Creates a new job builder.
    pub fn builder() -> JobBuilder {
        JobBuilder::default()
    }

    /// Short id prefix used in output file names.
    pub fn short_id(&self) -> &str {
        let end = self
            .id
            .char_indices()
            .nth(6)
            .map(|(i, _)| i)
            .unwrap_or(self.id.len());
        &self.id[..end]
    }

    /// Applies a merge patch. Returns true if anything changed.
    ///
    /// The patch is applied as-is; transition legality is checked by the
    /// queue that owns the job.
    pub fn apply(&mut self, patch: JobPatch) -> bool {
        let mut changed = false;
        if let Some(status) = patch.status {
            changed |= self.status != status;
            self.status = status;
        }
        if let Some(message) = patch.progress_message {
            changed |= self.progress_message != message;
            self.progress_message = message;
        }
        if let Some(result_url) = patch.result_url {
            changed |= self.result_url != result_url;
            self.result_url = result_url;
        }
        if let Some(error) = patch.error {
            changed |= self.error != error;
            self.error = error;
        }
        changed
    }
}

/// Partial update for a [`Job`]. `Some(None)` clears a field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobPatch {
    /// New status
    pub status: Option<GenerationStatus>,
    /// New progress message
    pub progress_message: Option<Option<String>>,
    /// New result locator
    pub result_url: Option<Option<String>>,
    /// New error
    pub error: Option<Option<String>>,
}

impl JobPatch {
    /// True when the patch carries no fields.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Progress-only update.
    pub fn progress(message: impl Into<String>) -> Self {
        Self {
            progress_message: Some(Some(message.into())),
            ..Self::default()
        }
    }

    /// Promotion to Running.
    pub fn running() -> Self {
        Self {
            status: Some(GenerationStatus::Running),
            ..Self::default()
        }
    }

    /// Successful completion.
    pub fn succeeded(result_url: impl Into<String>) -> Self {
        Self {
            status: Some(GenerationStatus::Success),
            result_url: Some(Some(result_url.into())),
            error: Some(None),
            ..Self::default()
        }
    }

    /// Failed completion.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            status: Some(GenerationStatus::Failed),
            error: Some(Some(error.into())),
            ..Self::default()
        }
    }

    /// Explicit retry: back to Pending with the error and progress cleared.
    pub fn retry() -> Self {
        Self {
            status: Some(GenerationStatus::Pending),
            progress_message: Some(None),
            error: Some(None),
            ..Self::default()
        }
    }
}
