//! Result export for Storyloom.
//!
//! Generated images and videos leave the orchestrator through a
//! [`ResultExporter`]: either one file at a time (`save_result`) or as a
//! project archive (`export_archive`) containing one `<index>.png` entry per
//! generated scene inside a folder named after the project.
//!
//! # Example
//!
//! ```rust
//! use storyloom_core::MediaPayload;
//! use storyloom_storage::{ExportItem, FileSystemExporter, ResultExporter};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let exporter = FileSystemExporter::new("/tmp/storyloom")?;
//! let items = vec![ExportItem::new(1, MediaPayload::new("image/png", vec![0u8; 16]))];
//! let archive = exporter.export_archive("My Story", &items).await?;
//! assert!(archive.ends_with("My_Story.zip"));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::path::PathBuf;
use storyloom_core::MediaPayload;
use storyloom_error::StoryloomResult;

mod archive;
mod filesystem;

pub use archive::{build_archive, sanitize_project_name};
pub use filesystem::FileSystemExporter;

/// Export collaborator for generated results.
#[async_trait::async_trait]
pub trait ResultExporter: Send + Sync {
    /// Write one result under `filename` and return where it landed.
    async fn save_result(&self, filename: &str, payload: &MediaPayload) -> StoryloomResult<PathBuf>;

    /// Package `items` into `<sanitized project name>.zip`.
    ///
    /// # Errors
    ///
    /// Fails when the project name is blank or there is nothing to export.
    async fn export_archive(
        &self,
        project_name: &str,
        items: &[ExportItem],
    ) -> StoryloomResult<PathBuf>;
}

/// One generated image destined for an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportItem {
    /// 1-based storyboard position; becomes `<index>.png`
    pub index: usize,
    /// Image bytes
    pub payload: MediaPayload,
}

impl ExportItem {
    /// Creates an export item.
    pub fn new(index: usize, payload: MediaPayload) -> Self {
        Self { index, payload }
    }
}
