//! Core data types for the Storyloom storyboard orchestrator.
//!
//! This crate provides the data model shared by the reference studio and the
//! bulk video queue: characters, scenes, jobs, media payloads and the request
//! shapes sent to the generation gateway.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod character;
mod job;
mod media;
mod request;
mod scene;
mod status;
mod video;

pub use character::{Character, CharacterImage, CharacterPatch, MAX_CHARACTER_IMAGES};
pub use job::{AspectRatio, InputType, Job, JobBuilder, JobPatch, VideoModel};
pub use media::MediaPayload;
pub use request::{ImageRequest, RequestPart};
pub use scene::{Scene, ScenePatch};
pub use status::GenerationStatus;
pub use video::{OperationHandle, OperationStatus, VideoRequest, VideoRequestBuilder};

/// Generates a fresh opaque identifier for characters, scenes, images and jobs.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
