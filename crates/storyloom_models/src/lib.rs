//! Generation gateway implementations for Storyloom.
//!
//! # Available Backends
//!
//! - **Gemini** (Google) - image generation via `generateContent` and Veo
//!   video generation via `predictLongRunning`. Enabled by the default
//!   `gemini` feature.
//!
//! The [`HttpReferenceFetcher`] resolves result locators (data URLs, http(s)
//! URLs and local paths) back into bytes and is always available.
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(feature = "gemini")]
//! # {
//! use storyloom_core::{ImageRequest, RequestPart};
//! use storyloom_interface::ImageGateway;
//! use storyloom_models::GeminiClient;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GeminiClient::from_env("GEMINI_API_KEY")?;
//! let request = ImageRequest {
//!     parts: vec![RequestPart::Text("A lighthouse in fog".to_string())],
//!     model: None,
//! };
//! let image = client.generate_image(&request).await?;
//! # Ok(())
//! # }
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod fetcher;

pub use fetcher::HttpReferenceFetcher;

#[cfg(feature = "gemini")]
mod gemini;

#[cfg(feature = "gemini")]
pub use gemini::{
    Candidate, Content, DEFAULT_BASE_URL, DEFAULT_IMAGE_MODEL, GeminiClient,
    GenerateContentRequest, GenerateContentResponse, InlineData, Operation, OperationError, Part,
    PredictRequest, VideoImage, VideoInstance, VideoParameters, conversion,
};
