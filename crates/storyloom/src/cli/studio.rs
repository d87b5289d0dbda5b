//! Storyboard rendering command handler.

use super::StudioArgs;
use std::path::{Path, PathBuf};
use storyloom::{
    ExportItem, FileSystemExporter, GenerationStatus, HttpReferenceFetcher, MediaPayload,
    ProjectFile, ReferenceFetcher, ReferenceStore, ResultExporter, SceneGenerator, SceneOutcome,
    StorageError, StorageErrorKind, StoryloomConfig, StoryloomResult, StudioError,
    StudioErrorKind, gemini_client,
};

/// Render a project, write results back into it and optionally export a zip.
#[tracing::instrument(skip_all, fields(project = %args.project.display()))]
pub async fn run_studio(config: &StoryloomConfig, args: StudioArgs) -> StoryloomResult<()> {
    let mut project = ProjectFile::from_file(&args.project).await?;
    let base_dir = args.project.parent().unwrap_or(Path::new("."));
    let mut store = project.load_store(base_dir).await?;

    let output_dir = args
        .output
        .clone()
        .unwrap_or_else(|| config.export.output_dir.clone());
    let exporter = FileSystemExporter::new(absolute(&output_dir)?)?;
    let fetcher = HttpReferenceFetcher::new();
    let generator = SceneGenerator::new(gemini_client(&config.gateway)?, fetcher.clone());

    match args.scene {
        Some(position) => {
            let scene_id = store
                .scenes()
                .get(position.saturating_sub(1))
                .map(|s| s.id.clone())
                .ok_or_else(|| {
                    StudioError::new(StudioErrorKind::SceneNotFound(position.to_string()))
                })?;

            let result = match &args.refine {
                Some(text) => {
                    let base_image = current_image(&store, &scene_id, &fetcher).await?;
                    generator.refine_scene(&mut store, &scene_id, text, base_image).await
                }
                None => generator.generate_scene(&mut store, &scene_id, None).await,
            };
            match result {
                Ok(()) => println!("Scene {} generated", position),
                Err(e) => println!("Scene {} failed: {}", position, e.user_message()),
            }
        }
        None => {
            let report = generator.generate_all(&mut store).await?;
            for outcome in report.outcomes() {
                match outcome {
                    SceneOutcome::Generated { index, .. } => {
                        println!("Scene {} generated", index)
                    }
                    SceneOutcome::Failed { index, error, .. } => {
                        println!("Scene {} failed: {}", index, error)
                    }
                }
            }
            println!("{} generated, {} failed", report.succeeded(), report.failed());
        }
    }

    let items = generated_items(&store);
    let mut saved = Vec::with_capacity(items.len());
    for item in &items {
        let path = exporter
            .save_result(&format!("{}.png", item.index), &item.payload)
            .await?;
        saved.push((item.index, path));
    }
    project.record_results(&store, &saved);
    project.save(&args.project).await?;
    tracing::info!(saved = saved.len(), "Project updated");

    if args.export {
        let name = if project.project.name.trim().is_empty() {
            config.export.project_name.clone()
        } else {
            project.project.name.clone()
        };
        let archive = exporter.export_archive(&name, &items).await?;
        println!("Exported {}", archive.display());
    }

    Ok(())
}

/// Scenes holding an image, as export items in storyboard order.
fn generated_items(store: &ReferenceStore) -> Vec<ExportItem> {
    store
        .scenes()
        .iter()
        .filter(|s| s.status == GenerationStatus::Success)
        .filter_map(|s| {
            let payload = MediaPayload::from_data_url(s.result_url.as_deref()?)?;
            Some(ExportItem::new(s.index, payload))
        })
        .collect()
}

async fn current_image(
    store: &ReferenceStore,
    scene_id: &str,
    fetcher: &HttpReferenceFetcher,
) -> StoryloomResult<Option<MediaPayload>> {
    match store.scene(scene_id).and_then(|s| s.result_url.as_deref()) {
        Some(locator) => Ok(Some(fetcher.fetch(locator).await?)),
        None => Ok(None),
    }
}

fn absolute(dir: &Path) -> StoryloomResult<PathBuf> {
    std::path::absolute(dir).map_err(|e| {
        StorageError::new(StorageErrorKind::InvalidPath(format!("{}: {}", dir.display(), e))).into()
    })
}
