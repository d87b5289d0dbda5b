//! Trait definitions for the Storyloom generation gateway.
//!
//! The external generative model is an opaque capability. These traits are
//! the contract the orchestrators program against; `storyloom_models`
//! provides the Gemini/Veo implementation and tests provide mocks.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;

pub use traits::{ImageGateway, ReferenceFetcher, VideoGateway};
