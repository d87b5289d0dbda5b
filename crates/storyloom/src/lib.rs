//! Storyloom - storyboard and bulk video generation.
//!
//! Storyloom drives two independent workflows against Google's generative
//! media models:
//!
//! - **Studio**: a storyboard of scenes rendered one image at a time, with
//!   character reference images and a style anchor keeping every panel
//!   visually consistent.
//! - **Jobs**: independent text- or image-to-video jobs, run at most four at
//!   a time.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use storyloom::{GeminiClient, HttpReferenceFetcher, ProjectFile, SceneGenerator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let project = ProjectFile::from_file("story.toml").await?;
//!     let mut store = project.load_store(std::path::Path::new(".")).await?;
//!
//!     let generator = SceneGenerator::new(
//!         GeminiClient::from_env("GEMINI_API_KEY")?,
//!         HttpReferenceFetcher::new(),
//!     );
//!     let report = generator.generate_all(&mut store).await?;
//!     println!("{} scenes generated", report.succeeded());
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `storyloom_core` - Characters, scenes, jobs and media payloads
//! - `storyloom_interface` - Gateway and fetcher traits
//! - `storyloom_error` - Error types
//! - `storyloom_models` - Gemini / Veo REST gateway
//! - `storyloom_studio` - Reference store, style bootstrap, request builder
//! - `storyloom_jobs` - Bounded job scheduler and video pipeline
//! - `storyloom_storage` - Result saving and zip export
//!
//! This crate re-exports everything for convenience.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod observability;

pub use self::config::{ExportConfig, GatewayConfig, JobsConfig, StoryloomConfig};
pub use observability::{ObservabilityConfig, init_observability};

pub use storyloom_core::*;
pub use storyloom_error::*;
pub use storyloom_interface::*;
pub use storyloom_jobs::{
    JobForm, JobQueue, JobRunner, JobScheduler, SchedulerSnapshot, VideoPipeline,
    character_context, csv_prompts,
};
pub use storyloom_storage::{ExportItem, FileSystemExporter, ResultExporter};
pub use storyloom_studio::{
    BatchReport, ProjectFile, ReferenceStore, Refinement, SceneGenerator, SceneOutcome,
    build_scene_request, traversal_order,
};

#[cfg(feature = "gemini")]
pub use storyloom_models::{GeminiClient, HttpReferenceFetcher};

/// Gemini client configured from the `[gateway]` section.
///
/// # Errors
///
/// Fails when the API key variable is unset.
#[cfg(feature = "gemini")]
pub fn gemini_client(config: &GatewayConfig) -> StoryloomResult<GeminiClient> {
    Ok(GeminiClient::from_env(&config.api_key_env)?
        .with_base_url(&config.base_url)
        .with_image_model(&config.image_model)
        .with_retry(Some(config.max_retries), Some(config.retry_backoff_ms)))
}
