//! Reference studio error types.

/// Specific error conditions for the scene/character studio.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StudioErrorKind {
    /// "Generate all" was requested but no scene has characters to anchor the style
    #[display("Select a character for at least one scene to establish the art style")]
    NoStyleAnchor,
    /// The prior-result image used as style reference could not be fetched
    #[display("Failed to fetch style reference image: {}", _0)]
    ReferenceFetchFailed(String),
    /// Scene id not present in the store
    #[display("Scene '{}' not found", _0)]
    SceneNotFound(String),
    /// Character id not present in the store
    #[display("Character '{}' not found", _0)]
    CharacterNotFound(String),
    /// Character image id not present on the character
    #[display("Reference image '{}' not found", _0)]
    ImageNotFound(String),
    /// Character already holds the maximum number of reference images
    #[display("Character '{}' already has the maximum of {} reference images", character, max)]
    TooManyImages {
        /// Character id
        character: String,
        /// Image limit
        max: usize,
    },
    /// Project file could not be read or interpreted
    #[display("Project file error: {}", _0)]
    ProjectFile(String),
}

/// Error type for studio operations.
///
/// # Examples
///
/// ```
/// use storyloom_error::{StudioError, StudioErrorKind};
///
/// let err = StudioError::new(StudioErrorKind::NoStyleAnchor);
/// assert!(format!("{}", err).contains("art style"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Studio Error: {} at line {} in {}", kind, line, file)]
pub struct StudioError {
    /// The specific error condition
    pub kind: StudioErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl StudioError {
    /// Create a new StudioError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StudioErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
