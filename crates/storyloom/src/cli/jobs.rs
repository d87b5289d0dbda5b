//! Bulk video command handler.

use super::JobsArgs;
use std::collections::HashMap;
use std::path::Path;
use storyloom::{
    Character, FileSystemExporter, GenerationStatus, InputType, JobError, JobErrorKind, JobForm,
    JobScheduler, MediaPayload, ProjectFile, SchedulerSnapshot, StorageError, StorageErrorKind,
    StoryloomConfig, StoryloomResult, StudioError, StudioErrorKind, VideoPipeline, gemini_client,
};

/// Build jobs from a prompt or CSV, run them and print each outcome.
#[tracing::instrument(skip_all)]
pub async fn run_jobs(config: &StoryloomConfig, args: JobsArgs) -> StoryloomResult<()> {
    let characters = match &args.project {
        Some(path) => {
            let base_dir = path.parent().unwrap_or(Path::new("."));
            let project = ProjectFile::from_file(path).await?;
            project.load_store(base_dir).await?.characters().to_vec()
        }
        None => Vec::new(),
    };

    let form = job_form(&args, &characters).await?;
    let jobs = match (&args.prompt, &args.csv) {
        (Some(prompt), _) => vec![form.manual_job(&characters, prompt)?],
        (None, Some(csv)) => {
            let text = tokio::fs::read_to_string(csv).await.map_err(|e| {
                StorageError::new(StorageErrorKind::FileRead(format!("{}: {}", csv.display(), e)))
            })?;
            form.csv_jobs(&characters, &text, &args.column)?
        }
        (None, None) => return Err(JobError::new(JobErrorKind::EmptyPrompt).into()),
    };

    let output_dir = args
        .output
        .clone()
        .unwrap_or_else(|| config.export.output_dir.clone());
    let pipeline = VideoPipeline::new(
        gemini_client(&config.gateway)?,
        FileSystemExporter::new(output_dir)?,
    )
    .with_poll_interval(config.jobs.poll_interval())
    .with_resolution(&config.gateway.resolution);

    let scheduler = JobScheduler::spawn(pipeline, config.jobs.max_concurrent);
    scheduler.enqueue_many(jobs).await?;

    let mut updates = scheduler.subscribe();
    let mut seen = HashMap::new();
    loop {
        let snapshot = updates.borrow_and_update().clone();
        print_changes(&snapshot, &mut seen);
        if !*snapshot.active() {
            break;
        }
        if updates.changed().await.is_err() {
            break;
        }
    }

    let done = scheduler.snapshot();
    for job in done.jobs() {
        match job.status() {
            GenerationStatus::Success => println!(
                "[{}] done: {}",
                job.short_id(),
                job.result_url().as_deref().unwrap_or_default()
            ),
            GenerationStatus::Failed => println!(
                "[{}] failed: {}",
                job.short_id(),
                job.error().as_deref().unwrap_or_default()
            ),
            other => println!("[{}] {}", job.short_id(), other),
        }
    }
    println!(
        "{} succeeded, {} failed",
        done.count(GenerationStatus::Success),
        done.count(GenerationStatus::Failed)
    );

    scheduler.shutdown().await;
    Ok(())
}

async fn job_form(args: &JobsArgs, characters: &[Character]) -> StoryloomResult<JobForm> {
    let seed_image = match &args.image {
        Some(path) => {
            let data = tokio::fs::read(path).await.map_err(|e| {
                StorageError::new(StorageErrorKind::FileRead(format!("{}: {}", path.display(), e)))
            })?;
            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("png");
            Some(MediaPayload::new(MediaPayload::mime_for_extension(ext), data))
        }
        None => None,
    };

    let selected_character_id = match &args.character {
        Some(name) => Some(
            characters
                .iter()
                .find(|c| &c.name == name)
                .map(|c| c.id.clone())
                .ok_or_else(|| StudioError::new(StudioErrorKind::CharacterNotFound(name.clone())))?,
        ),
        None => None,
    };

    let input_type = if seed_image.is_some() || selected_character_id.is_some() {
        InputType::Image
    } else {
        InputType::Text
    };

    Ok(JobForm {
        input_type,
        model: args.model,
        aspect_ratio: args.aspect_ratio,
        context_prompt: args.context.clone().unwrap_or_default(),
        creative_context: args.creative,
        selected_character_id,
        seed_image,
        ..JobForm::default()
    })
}

/// Print status and progress changes since the last snapshot.
fn print_changes(
    snapshot: &SchedulerSnapshot,
    seen: &mut HashMap<String, (GenerationStatus, Option<String>)>,
) {
    for job in snapshot.jobs() {
        let current = (*job.status(), job.progress_message().clone());
        if seen.get(job.id()) == Some(&current) {
            continue;
        }
        if *job.status() == GenerationStatus::Running {
            println!(
                "[{}] {}",
                job.short_id(),
                job.progress_message().as_deref().unwrap_or("running")
            );
        }
        seen.insert(job.id().clone(), current);
    }
}
