//! Zip packaging for storyboard exports.

use crate::ExportItem;
use std::io::{Cursor, Write};
use storyloom_error::{StorageError, StorageErrorKind, StoryloomResult};
use zip::write::SimpleFileOptions;

/// Replaces every character outside `[A-Za-z0-9]` with `_`.
///
/// # Examples
///
/// ```
/// use storyloom_storage::sanitize_project_name;
///
/// assert_eq!(sanitize_project_name("Night Run #2"), "Night_Run__2");
/// ```
pub fn sanitize_project_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Builds the archive bytes: folder `<project_name>/` holding `<index>.png`.
///
/// # Errors
///
/// `EmptyProjectName` for a blank name, `InvalidPath` for a name that would
/// not stay a single top-level folder, `NothingToExport` for no items.
pub fn build_archive(project_name: &str, items: &[ExportItem]) -> StoryloomResult<Vec<u8>> {
    if project_name.trim().is_empty() {
        return Err(StorageError::new(StorageErrorKind::EmptyProjectName).into());
    }
    if project_name.contains(['/', '\\']) || matches!(project_name.trim(), "." | "..") {
        return Err(
            StorageError::new(StorageErrorKind::InvalidPath(project_name.to_string())).into(),
        );
    }
    if items.is_empty() {
        return Err(StorageError::new(StorageErrorKind::NothingToExport).into());
    }

    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));

    let folder = format!("{}/", project_name);
    writer
        .add_directory(folder.as_str(), options)
        .map_err(|e| archive_err(e))?;

    for item in items {
        writer
            .start_file(format!("{}{}.png", folder, item.index), options)
            .map_err(|e| archive_err(e))?;
        writer
            .write_all(&item.payload.data)
            .map_err(|e| archive_err(e))?;
    }

    let cursor = writer.finish().map_err(|e| archive_err(e))?;
    Ok(cursor.into_inner())
}

#[track_caller]
fn archive_err(e: impl std::fmt::Display) -> StorageError {
    StorageError::new(StorageErrorKind::Archive(e.to_string()))
}
