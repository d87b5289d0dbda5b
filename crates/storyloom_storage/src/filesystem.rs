//! Filesystem export backend.

use crate::{ExportItem, ResultExporter, build_archive, sanitize_project_name};
use std::path::{Path, PathBuf};
use storyloom_core::MediaPayload;
use storyloom_error::{StorageError, StorageErrorKind, StoryloomResult};

/// Writes results and archives into one output directory.
#[derive(Debug, Clone)]
pub struct FileSystemExporter {
    output_dir: PathBuf,
}

impl FileSystemExporter {
    /// Create an exporter rooted at `output_dir`.
    ///
    /// Creates the directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created.
    #[tracing::instrument(skip(output_dir))]
    pub fn new(output_dir: impl Into<PathBuf>) -> StoryloomResult<Self> {
        let output_dir = output_dir.into();

        std::fs::create_dir_all(&output_dir).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                output_dir.display(),
                e
            )))
        })?;

        tracing::info!(path = %output_dir.display(), "Created filesystem exporter");
        Ok(Self { output_dir })
    }

    /// Directory results are written into.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    async fn write(&self, path: &Path, data: &[u8]) -> StoryloomResult<()> {
        tokio::fs::write(path, data).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                path.display(),
                e
            )))
        })?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl ResultExporter for FileSystemExporter {
    #[tracing::instrument(skip(self, payload), fields(size = payload.data.len(), mime = %payload.mime))]
    async fn save_result(&self, filename: &str, payload: &MediaPayload) -> StoryloomResult<PathBuf> {
        let name = Path::new(filename);
        let is_plain = name.components().count() == 1
            && name.file_name().is_some_and(|n| n == name.as_os_str());
        if filename.trim().is_empty() || !is_plain {
            return Err(StorageError::new(StorageErrorKind::InvalidPath(filename.to_string())).into());
        }

        let path = self.output_dir.join(filename);
        self.write(&path, &payload.data).await?;
        tracing::info!(path = %path.display(), "Saved result");
        Ok(path)
    }

    #[tracing::instrument(skip(self, items), fields(items = items.len()))]
    async fn export_archive(
        &self,
        project_name: &str,
        items: &[ExportItem],
    ) -> StoryloomResult<PathBuf> {
        let bytes = build_archive(project_name, items)?;
        let path = self
            .output_dir
            .join(format!("{}.zip", sanitize_project_name(project_name)));
        self.write(&path, &bytes).await?;
        tracing::info!(path = %path.display(), size = bytes.len(), "Exported archive");
        Ok(path)
    }
}
