//! Error types for Storyloom.
//!
//! This crate provides the foundation error types used throughout the Storyloom workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use storyloom_error::{GatewayError, GatewayErrorKind, StoryloomResult};
//!
//! fn fetch_reference() -> StoryloomResult<Vec<u8>> {
//!     Err(GatewayError::new(GatewayErrorKind::Transport(
//!         "Connection refused".to_string(),
//!     )))?
//! }
//!
//! assert!(fetch_reference().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod config;
mod error;
mod gateway;
mod jobs;
mod storage;
mod studio;

pub use builder::{BuilderError, BuilderErrorKind};
pub use config::ConfigError;
pub use error::{StoryloomError, StoryloomErrorKind, StoryloomResult};
pub use gateway::{GatewayError, GatewayErrorKind, RetryableError};
pub use jobs::{JobError, JobErrorKind};
pub use storage::{StorageError, StorageErrorKind};
pub use studio::{StudioError, StudioErrorKind};
