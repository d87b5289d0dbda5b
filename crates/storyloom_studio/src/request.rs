//! Generation request assembly.
//!
//! A request is an ordered bundle of parts. The order is fixed:
//!
//! 1. character identity: each selected character's images, then its
//!    identity text
//! 2. style reference: the anchor image, then the style directive
//! 3. refinement base image
//! 4. one context and instruction text

use crate::ReferenceStore;
use storyloom_core::{ImageRequest, MediaPayload, RequestPart};
use storyloom_error::{StoryloomResult, StudioError, StudioErrorKind};

/// Directive appended after the style anchor image.
pub const STYLE_REFERENCE_DIRECTIVE: &str = "STYLE REFERENCE: Maintain the exact artistic style, brushwork, lighting, and color palette from this previous image.";

const EXCLUDE_CHARACTERS_DIRECTIVE: &str = "DO NOT include any of the main characters in this shot unless explicitly mentioned. Focus on the environment.";

const ENVIRONMENT_DIRECTIVE: &str = "ENVIRONMENTAL CONSISTENCY:\nIf the setting is the same as the previous scenes, maintain all architectural and environmental details.\nHowever, use a NEW camera angle and composition to keep it visually diverse.";

const RULES: &str =
    "RULES: Cinematic quality, consistent lighting/color with style reference. NO TEXT or labels.";

/// Number of preceding scripts included as story context.
const STORY_CONTEXT_DEPTH: usize = 3;

/// Edit instructions for regenerating an existing scene.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Refinement {
    /// Replaces the scene prompt when non-blank
    pub prompt: Option<String>,
    /// Existing image used as the edit base
    pub base_image: Option<MediaPayload>,
}

impl Refinement {
    /// Refinement with edit text only.
    pub fn prompt(text: impl Into<String>) -> Self {
        Self {
            prompt: Some(text.into()),
            base_image: None,
        }
    }

    /// Attaches an edit base image.
    pub fn with_base_image(mut self, image: MediaPayload) -> Self {
        self.base_image = Some(image);
        self
    }
}

/// Assembles the request for one scene.
///
/// `style_reference` is the already-fetched image of the store's style
/// anchor, if there is one.
pub fn build_scene_request(
    store: &ReferenceStore,
    scene_id: &str,
    style_reference: Option<&MediaPayload>,
    refinement: Option<&Refinement>,
) -> StoryloomResult<ImageRequest> {
    let position = store.position(scene_id).ok_or_else(|| {
        StudioError::new(StudioErrorKind::SceneNotFound(scene_id.to_string()))
    })?;
    let scenes = store.scenes();
    let scene = &scenes[position];
    let characters = store.selected_characters(scene);

    let mut parts = Vec::new();

    for character in &characters {
        parts.extend(
            character
                .images
                .iter()
                .map(|img| RequestPart::Image(img.payload.clone())),
        );
        parts.push(RequestPart::Text(format!(
            "Character {} Identity: {}",
            character.name, character.style_description
        )));
    }

    if let Some(anchor) = style_reference {
        parts.push(RequestPart::Image(anchor.clone()));
        parts.push(RequestPart::Text(STYLE_REFERENCE_DIRECTIVE.to_string()));
    }

    if let Some(base) = refinement.and_then(|r| r.base_image.as_ref()) {
        parts.push(RequestPart::Image(base.clone()));
    }

    let directive = if characters.is_empty() {
        EXCLUDE_CHARACTERS_DIRECTIVE.to_string()
    } else {
        let names: Vec<&str> = characters.iter().map(|c| c.name.as_str()).collect();
        format!(
            "Ensure {} appear exactly as the references. Integrate them naturally.",
            names.join(", ")
        )
    };

    let previous: Vec<&str> = scenes[position.saturating_sub(STORY_CONTEXT_DEPTH)..position]
        .iter()
        .map(|s| s.script.as_str())
        .collect();

    let prompt = refinement
        .and_then(|r| r.prompt.as_deref())
        .filter(|p| !p.trim().is_empty())
        .unwrap_or(&scene.prompt);

    parts.push(RequestPart::Text(format!(
        "{directive}\n\nSTORY CONTEXT:\nPrevious actions: {}\nCurrent scene: \"{}\"\n\n{ENVIRONMENT_DIRECTIVE}\n\nPROMPT: \"{prompt}\".\n{RULES}",
        previous.join(" -> "),
        scene.script,
    )));

    Ok(ImageRequest { parts, model: None })
}
