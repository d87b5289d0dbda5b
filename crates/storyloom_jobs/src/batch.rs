//! Turning form input and CSV files into jobs.

use storyloom_core::{AspectRatio, Character, InputType, Job, MediaPayload, VideoModel};
use storyloom_error::{BuilderError, JobError, JobErrorKind, StoryloomResult};

const CREATIVE_NOTE: &str = " (AI should use this context image as inspiration to create new contexts from different perspectives, suitable for the prompt).";

/// `"name: style"` (or just `name`) for every named character with images,
/// joined by `"; "`.
pub fn character_context(characters: &[Character]) -> String {
    characters
        .iter()
        .filter(|c| c.has_images() && !c.name.is_empty())
        .map(Character::context_label)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Extract the non-empty cells of `column` from a CSV text.
///
/// Rows are split on line breaks and cells on commas, with quotes stripped.
/// Quoted commas are not supported.
///
/// # Errors
///
/// `CsvColumnMissing`, `CsvTooShort`, `CsvColumnNotFound` or `CsvNoPrompts`.
pub fn csv_prompts(csv: &str, column: &str) -> StoryloomResult<Vec<String>> {
    let column = column.trim();
    if column.is_empty() {
        return Err(JobError::new(JobErrorKind::CsvColumnMissing).into());
    }

    let rows: Vec<&str> = csv
        .split('\n')
        .map(|row| row.strip_suffix('\r').unwrap_or(row))
        .filter(|row| !row.trim().is_empty())
        .collect();
    if rows.len() < 2 {
        return Err(JobError::new(JobErrorKind::CsvTooShort).into());
    }

    let header = split_row(rows[0]);
    let Some(prompt_index) = header.iter().position(|h| h == column) else {
        return Err(JobError::new(JobErrorKind::CsvColumnNotFound {
            column: column.to_string(),
            found: header.join(", "),
        })
        .into());
    };

    let prompts: Vec<String> = rows[1..]
        .iter()
        .filter_map(|row| split_row(row).into_iter().nth(prompt_index))
        .filter(|cell| !cell.is_empty())
        .collect();
    if prompts.is_empty() {
        return Err(JobError::new(JobErrorKind::CsvNoPrompts).into());
    }
    Ok(prompts)
}

fn split_row(row: &str) -> Vec<String> {
    row.split(',')
        .map(|cell| cell.trim().replace('"', "").trim().to_string())
        .collect()
}

/// Settings shared by every job created from one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobForm {
    /// Text or image input
    pub input_type: InputType,
    /// Video model
    pub model: VideoModel,
    /// Output aspect ratio
    pub aspect_ratio: AspectRatio,
    /// Outputs per job
    pub output_count: u32,
    /// Free-form scene context folded into every prompt
    pub context_prompt: String,
    /// Ask the model to reinterpret the scene context creatively
    pub creative_context: bool,
    /// Character whose first image seeds image-to-video jobs
    pub selected_character_id: Option<String>,
    /// Explicit seed image; wins over the selected character
    pub seed_image: Option<MediaPayload>,
}

impl Default for JobForm {
    fn default() -> Self {
        Self {
            input_type: InputType::default(),
            model: VideoModel::default(),
            aspect_ratio: AspectRatio::default(),
            output_count: 1,
            context_prompt: String::new(),
            creative_context: false,
            selected_character_id: None,
            seed_image: None,
        }
    }
}

impl JobForm {
    /// Prefix `base` with the character and scene context, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyloom_jobs::JobForm;
    ///
    /// let form = JobForm {
    ///     context_prompt: "rainy harbour".to_string(),
    ///     ..JobForm::default()
    /// };
    /// assert_eq!(
    ///     form.build_final_prompt(&[], "A gull lands"),
    ///     "Scene context: [rainy harbour]. \n\nA gull lands"
    /// );
    /// assert_eq!(JobForm::default().build_final_prompt(&[], "A gull lands"), "A gull lands");
    /// ```
    pub fn build_final_prompt(&self, characters: &[Character], base: &str) -> String {
        let mut parts = Vec::new();

        let characters = character_context(characters);
        if !characters.is_empty() {
            parts.push(format!("Reference characters: [{}]", characters));
        }

        let context = self.context_prompt.trim();
        if !context.is_empty() {
            let mut description = format!("Scene context: [{}]", context);
            if self.creative_context {
                description.push_str(CREATIVE_NOTE);
            }
            parts.push(description);
        }

        if parts.is_empty() {
            base.to_string()
        } else {
            format!("{}. \n\n{}", parts.join(". "), base)
        }
    }

    /// Build one job from a typed prompt.
    ///
    /// # Errors
    ///
    /// `EmptyPrompt`, or `MissingSeedImage` for image input without a seed
    /// image or a selected character image.
    pub fn manual_job(&self, characters: &[Character], prompt: &str) -> StoryloomResult<Job> {
        if prompt.trim().is_empty() {
            return Err(JobError::new(JobErrorKind::EmptyPrompt).into());
        }
        let seed_image = self.resolve_seed(characters)?;
        self.job(characters, prompt, seed_image)
    }

    /// Build one job per non-empty cell of `column`.
    ///
    /// Every job shares the form settings and the same seed image.
    pub fn csv_jobs(
        &self,
        characters: &[Character],
        csv: &str,
        column: &str,
    ) -> StoryloomResult<Vec<Job>> {
        if column.trim().is_empty() {
            return Err(JobError::new(JobErrorKind::CsvColumnMissing).into());
        }
        let seed_image = self.resolve_seed(characters)?;
        let jobs = csv_prompts(csv, column)?
            .iter()
            .map(|prompt| self.job(characters, prompt, seed_image.clone()))
            .collect::<StoryloomResult<Vec<_>>>()?;
        tracing::info!(count = jobs.len(), column, "Expanded CSV into jobs");
        Ok(jobs)
    }

    fn resolve_seed(&self, characters: &[Character]) -> StoryloomResult<Option<MediaPayload>> {
        if self.input_type != InputType::Image {
            return Ok(None);
        }
        if let Some(seed) = &self.seed_image {
            return Ok(Some(seed.clone()));
        }
        self.selected_character_id
            .as_deref()
            .and_then(|id| characters.iter().find(|c| c.id == id))
            .and_then(|c| c.images.first())
            .map(|image| Some(image.payload.clone()))
            .ok_or_else(|| JobError::new(JobErrorKind::MissingSeedImage).into())
    }

    fn job(
        &self,
        characters: &[Character],
        prompt: &str,
        seed_image: Option<MediaPayload>,
    ) -> StoryloomResult<Job> {
        let reference_character_names: Vec<String> = characters
            .iter()
            .filter(|c| c.has_images())
            .map(|c| c.name.clone())
            .collect();

        let job = Job::builder()
            .prompt(self.build_final_prompt(characters, prompt))
            .input_type(self.input_type)
            .model(self.model)
            .aspect_ratio(self.aspect_ratio)
            .output_count(self.output_count.max(1))
            .seed_image(seed_image)
            .reference_character_names(reference_character_names)
            .build()
            .map_err(|e| BuilderError::from(format!("Failed to build job: {}", e)))?;
        Ok(job)
    }
}
