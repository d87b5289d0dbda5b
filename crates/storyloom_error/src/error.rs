//! Top-level error wrapper types.

use crate::{BuilderError, ConfigError, GatewayError, JobError, StorageError, StudioError};

/// Every error condition a Storyloom operation can surface.
///
/// # Examples
///
/// ```
/// use storyloom_error::{JobError, JobErrorKind, StoryloomError};
///
/// let err: StoryloomError = JobError::new(JobErrorKind::EmptyPrompt).into();
/// assert!(format!("{}", err).contains("Job Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum StoryloomErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Builder error
    #[from(BuilderError)]
    Builder(BuilderError),
    /// Export/storage error
    #[from(StorageError)]
    Storage(StorageError),
    /// Generation gateway error
    #[from(GatewayError)]
    Gateway(GatewayError),
    /// Reference studio error
    #[from(StudioError)]
    Studio(StudioError),
    /// Bulk job error
    #[from(JobError)]
    Job(JobError),
}

/// Storyloom error with kind discrimination.
///
/// # Examples
///
/// ```
/// use storyloom_error::{ConfigError, StoryloomResult};
///
/// fn might_fail() -> StoryloomResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Storyloom Error: {}", _0)]
pub struct StoryloomError(Box<StoryloomErrorKind>);

impl StoryloomError {
    /// Create a new error from a kind.
    pub fn new(kind: StoryloomErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &StoryloomErrorKind {
        &self.0
    }

    /// Message suitable for showing inline next to the failed scene or job.
    ///
    /// Strips the wrapper prefixes and source locations so that only the
    /// underlying condition remains.
    pub fn user_message(&self) -> String {
        match self.kind() {
            StoryloomErrorKind::Config(e) => e.message.clone(),
            StoryloomErrorKind::Builder(e) => e.kind().to_string(),
            StoryloomErrorKind::Storage(e) => e.kind.to_string(),
            StoryloomErrorKind::Gateway(e) => e.kind.to_string(),
            StoryloomErrorKind::Studio(e) => e.kind.to_string(),
            StoryloomErrorKind::Job(e) => e.kind.to_string(),
        }
    }
}

impl<T> From<T> for StoryloomError
where
    T: Into<StoryloomErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Storyloom operations.
pub type StoryloomResult<T> = std::result::Result<T, StoryloomError>;
