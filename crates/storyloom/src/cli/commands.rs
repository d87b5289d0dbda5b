//! CLI command definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use storyloom::{AspectRatio, VideoModel};

/// Storyloom - consistent storyboards and bulk video generation
#[derive(Parser, Debug)]
#[command(name = "storyloom")]
#[command(about = "Consistent storyboards and bulk video generation with Gemini and Veo", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Configuration file to use instead of the default search path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render a storyboard project
    Studio(StudioArgs),

    /// Run bulk video generation jobs
    Jobs(JobsArgs),

    /// Print the effective configuration
    Config,
}

/// Arguments for `storyloom studio`
#[derive(Args, Debug)]
pub struct StudioArgs {
    /// Path to the project TOML file
    #[arg(long)]
    pub project: PathBuf,

    /// Render only this 1-based scene instead of the whole storyboard
    #[arg(long)]
    pub scene: Option<usize>,

    /// Edit instruction applied to the scene's current image
    #[arg(long, requires = "scene")]
    pub refine: Option<String>,

    /// Package generated scenes into a zip archive
    #[arg(long)]
    pub export: bool,

    /// Output directory (defaults to `[export] output_dir`)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

/// Arguments for `storyloom jobs`
#[derive(Args, Debug)]
pub struct JobsArgs {
    /// Prompt for a single job
    #[arg(long, conflicts_with = "csv", required_unless_present = "csv")]
    pub prompt: Option<String>,

    /// CSV file with one prompt per row
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// CSV column holding the prompts
    #[arg(long, default_value = "prompt")]
    pub column: String,

    /// Video model
    #[arg(long, default_value_t = VideoModel::default())]
    pub model: VideoModel,

    /// Output aspect ratio
    #[arg(long, default_value_t = AspectRatio::default())]
    pub aspect_ratio: AspectRatio,

    /// Seed image for image-to-video
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Project whose characters are folded into every prompt
    #[arg(long)]
    pub project: Option<PathBuf>,

    /// Project character whose first image seeds image-to-video
    #[arg(long, requires = "project")]
    pub character: Option<String>,

    /// Scene context added to every prompt
    #[arg(long)]
    pub context: Option<String>,

    /// Let the model reinterpret the scene context
    #[arg(long, requires = "context")]
    pub creative: bool,

    /// Output directory (defaults to `[export] output_dir`)
    #[arg(long)]
    pub output: Option<PathBuf>,
}
