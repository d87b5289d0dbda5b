//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the storyloom binary.

mod commands;
mod jobs;
mod studio;

pub use commands::{Cli, Commands, JobsArgs, StudioArgs};
pub use jobs::run_jobs;
pub use studio::run_studio;
