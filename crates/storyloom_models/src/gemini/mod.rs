//! Google Gemini REST backend.

mod client;
pub mod conversion;
mod dto;

pub use client::{DEFAULT_BASE_URL, DEFAULT_IMAGE_MODEL, GeminiClient};
pub use dto::{
    Candidate, Content, GenerateContentRequest, GenerateContentResponse, InlineData, Operation,
    OperationError, Part, PredictRequest, VideoImage, VideoInstance, VideoParameters,
};
