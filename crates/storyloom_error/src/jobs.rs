//! Bulk job error types.

/// Specific error conditions for the bulk video queue.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum JobErrorKind {
    /// Job id not present in the queue
    #[display("Job '{}' not found", _0)]
    NotFound(String),
    /// Requested status change is not allowed by the job state machine
    #[display("Job '{}' cannot move from {} to {}", job, from, to)]
    InvalidTransition {
        /// Job id
        job: String,
        /// Current status
        from: String,
        /// Requested status
        to: String,
    },
    /// Prompt text is empty
    #[display("Prompt cannot be empty")]
    EmptyPrompt,
    /// Image-to-video requested without a selected character image
    #[display("Image-to-video requires a selected reference character with an uploaded image")]
    MissingSeedImage,
    /// CSV has no header or no data rows
    #[display("CSV file must have a header and at least one data row")]
    CsvTooShort,
    /// CSV header does not contain the requested column
    #[display("Column '{}' not found in CSV header. Found: {}", column, found)]
    CsvColumnNotFound {
        /// Requested column
        column: String,
        /// Comma-separated list of header names
        found: String,
    },
    /// CSV prompt column name is blank
    #[display("Prompt column name must not be empty")]
    CsvColumnMissing,
    /// Every row had an empty prompt cell
    #[display("No valid jobs with non-empty prompts found in the specified column")]
    CsvNoPrompts,
    /// The scheduler control loop has shut down
    #[display("Job scheduler is no longer running")]
    SchedulerStopped,
}

/// Error type for job operations.
///
/// # Examples
///
/// ```
/// use storyloom_error::{JobError, JobErrorKind};
///
/// let err = JobError::new(JobErrorKind::EmptyPrompt);
/// assert!(format!("{}", err).contains("empty"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Job Error: {} at line {} in {}", kind, line, file)]
pub struct JobError {
    /// The specific error condition
    pub kind: JobErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl JobError {
    /// Create a new JobError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: JobErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
