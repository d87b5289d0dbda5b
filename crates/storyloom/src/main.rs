//! Storyloom CLI binary.
//!
//! This binary provides command-line access to Storyloom's functionality:
//! - Render storyboard projects scene by scene
//! - Run bulk video generation jobs from a prompt or a CSV file
//! - Inspect the effective configuration

use clap::Parser;
use storyloom::{ObservabilityConfig, StoryloomConfig, init_observability};

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, run_jobs, run_studio};

    // Load .env before anything reads the environment
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    init_observability(
        &ObservabilityConfig::new()
            .with_verbose(cli.verbose)
            .with_json_logs(cli.json_logs),
    )?;

    let config = match &cli.config {
        Some(path) => StoryloomConfig::from_file(path)?,
        None => StoryloomConfig::load()?,
    };
    tracing::debug!(?config, "Configuration loaded");

    match cli.command {
        Commands::Studio(args) => run_studio(&config, args).await?,
        Commands::Jobs(args) => run_jobs(&config, args).await?,
        Commands::Config => print!("{}", config.to_toml()?),
    }

    Ok(())
}
