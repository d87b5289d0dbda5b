//! Layered configuration.
//!
//! Sources, later ones winning:
//! - Bundled defaults (include_str! from storyloom.toml)
//! - `~/.config/storyloom/storyloom.toml`
//! - `./storyloom.toml`
//! - `STORYLOOM_<SECTION>__<KEY>` environment variables

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use storyloom_error::{ConfigError, StoryloomError, StoryloomResult};
use tracing::{debug, instrument};

const DEFAULT_CONFIG: &str = include_str!("../storyloom.toml");

/// Gemini / Veo endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// REST endpoint
    pub base_url: String,
    /// Image model used for scenes
    pub image_model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Video resolution
    pub resolution: String,
    /// Transport retries for transient HTTP failures (0 disables)
    pub max_retries: usize,
    /// Initial retry backoff in milliseconds
    pub retry_backoff_ms: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            image_model: "gemini-2.5-flash-image".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            resolution: "720p".to_string(),
            max_retries: 3,
            retry_backoff_ms: 2000,
        }
    }
}

/// Bulk video queue settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct JobsConfig {
    /// Concurrency ceiling
    pub max_concurrent: usize,
    /// Seconds between operation polls
    pub poll_interval_secs: u64,
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            max_concurrent: 4,
            poll_interval_secs: 10,
        }
    }
}

impl JobsConfig {
    /// Poll interval as a duration.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

/// Where results go.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory for saved results and archives
    pub output_dir: PathBuf,
    /// Archive name used when a project does not name itself
    pub project_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            project_name: "storyboard".to_string(),
        }
    }
}

/// Top-level Storyloom configuration.
///
/// # Example
///
/// ```no_run
/// use storyloom::StoryloomConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = StoryloomConfig::load()?;
/// println!("Running up to {} video jobs at once", config.jobs.max_concurrent);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct StoryloomConfig {
    /// Gateway settings
    pub gateway: GatewayConfig,
    /// Job queue settings
    pub jobs: JobsConfig,
    /// Export settings
    pub export: ExportConfig,
}

impl StoryloomConfig {
    /// Load configuration from a single file on top of the bundled defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> StoryloomResult<Self> {
        debug!("Loading configuration from file");
        let builder = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from(path.as_ref()));
        finish(builder)
    }

    /// Load configuration from every layer.
    ///
    /// Missing user files are skipped.
    #[instrument]
    pub fn load() -> StoryloomResult<Self> {
        debug!("Loading configuration with precedence: env > current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/storyloom/storyloom.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder
            .add_source(File::with_name("storyloom").required(false))
            .add_source(
                Environment::with_prefix("STORYLOOM")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        finish(builder)
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> StoryloomResult<String> {
        toml::to_string_pretty(self).map_err(|e| {
            StoryloomError::from(ConfigError::new(format!(
                "Failed to render configuration: {}",
                e
            )))
        })
    }
}

fn finish(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> StoryloomResult<StoryloomConfig> {
    builder
        .build()
        .map_err(|e| {
            StoryloomError::from(ConfigError::new(format!(
                "Failed to build configuration: {}",
                e
            )))
        })?
        .try_deserialize()
        .map_err(|e| {
            StoryloomError::from(ConfigError::new(format!(
                "Failed to parse configuration: {}",
                e
            )))
        })
}
