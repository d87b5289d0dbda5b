//! Consistency-preserving storyboard studio.
//!
//! The studio keeps a [`ReferenceStore`] of reusable characters and an
//! ordered list of scenes, and renders each scene into one image through an
//! [`ImageGateway`](storyloom_interface::ImageGateway).
//!
//! Visual consistency comes from two mechanisms:
//!
//! - **Request assembly** ([`build_scene_request`]): every request bundles the
//!   selected characters' reference images, the style anchor image, an
//!   optional edit base and a context block with the preceding scripts.
//! - **Style bootstrap** ([`traversal_order`]): "generate all" renders the
//!   first scene with characters first so that its image becomes the style
//!   anchor for every other scene.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod bootstrap;
mod generator;
mod project;
mod request;
mod store;

pub use bootstrap::traversal_order;
pub use generator::{BatchReport, SceneGenerator, SceneOutcome};
pub use project::{ProjectCharacter, ProjectFile, ProjectInfo, ProjectScene};
pub use request::{Refinement, STYLE_REFERENCE_DIRECTIVE, build_scene_request};
pub use store::ReferenceStore;
