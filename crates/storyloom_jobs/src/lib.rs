//! Bulk video generation for Storyloom.
//!
//! Jobs are created from a [`JobForm`] (one typed prompt, or one per row of a
//! CSV column), queued in a [`JobScheduler`] and run at most
//! [`DEFAULT_MAX_CONCURRENT`] at a time by a [`JobRunner`], normally a
//! [`VideoPipeline`] over a Veo gateway.
//!
//! # Example
//!
//! ```rust,ignore
//! use storyloom_jobs::{JobForm, JobScheduler, VideoPipeline};
//! use storyloom_models::GeminiClient;
//! use storyloom_storage::FileSystemExporter;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = VideoPipeline::new(
//!     GeminiClient::from_env("GEMINI_API_KEY")?,
//!     FileSystemExporter::new("output")?,
//! );
//! let scheduler = JobScheduler::spawn(pipeline, 4);
//!
//! let job = JobForm::default().manual_job(&[], "A neon hologram of a cat driving at top speed")?;
//! scheduler.enqueue(job).await?;
//! let done = scheduler.wait_idle().await?;
//! println!("{} jobs finished", done.jobs().len());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod batch;
mod pipeline;
mod queue;
mod scheduler;

pub use batch::{JobForm, character_context, csv_prompts};
pub use pipeline::{
    DEFAULT_POLL_INTERVAL, PROGRESS_INITIALIZING, PROGRESS_POLLING, PROGRESS_REQUESTING,
    VideoPipeline,
};
pub use queue::JobQueue;
pub use scheduler::{
    DEFAULT_MAX_CONCURRENT, JobRunner, JobScheduler, ProgressFn, SchedulerSnapshot,
};
