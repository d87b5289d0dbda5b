//! Reusable characters and their reference images.

use crate::{MediaPayload, new_id};
use serde::{Deserialize, Serialize};

/// Maximum number of reference images a character may hold.
pub const MAX_CHARACTER_IMAGES: usize = 5;

/// A reference image attached to a character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterImage {
    /// Image identifier
    pub id: String,
    /// Image bytes and MIME type
    pub payload: MediaPayload,
}

impl CharacterImage {
    /// Wraps a payload with a fresh identifier.
    pub fn new(payload: MediaPayload) -> Self {
        Self {
            id: new_id(),
            payload,
        }
    }
}

/// A reusable visual identity.
///
/// # Examples
///
/// ```
/// use storyloom_core::Character;
///
/// let hero = Character::placeholder(1);
/// assert_eq!(hero.name, "Character 1");
/// assert!(hero.images.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    /// Character identifier
    pub id: String,
    /// Display name, used verbatim in prompts
    pub name: String,
    /// Free-text style description
    pub style_description: String,
    /// Reference images, at most [`MAX_CHARACTER_IMAGES`]
    pub images: Vec<CharacterImage>,
    /// Whether new scenes pre-select this character
    pub is_default: bool,
}

impl Character {
    /// Creates a character with no images.
    pub fn new(name: impl Into<String>, style_description: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            style_description: style_description.into(),
            images: Vec::new(),
            is_default: false,
        }
    }

    /// Placeholder character named `Character <n>`.
    pub fn placeholder(n: usize) -> Self {
        Self::new(format!("Character {n}"), "")
    }

    /// Whether the character has at least one reference image.
    pub fn has_images(&self) -> bool {
        !self.images.is_empty()
    }

    /// `"name: style"`, or just the name when the style is blank.
    pub fn context_label(&self) -> String {
        let style = self.style_description.trim();
        if style.is_empty() {
            self.name.clone()
        } else {
            format!("{}: {}", self.name, style)
        }
    }

    /// Applies a merge patch. Returns true if anything changed.
    ///
    /// `is_default` is ignored here; default exclusivity is enforced by the
    /// store that owns all characters.
    pub fn apply(&mut self, patch: CharacterPatch) -> bool {
        let mut changed = false;
        if let Some(name) = patch.name {
            changed |= self.name != name;
            self.name = name;
        }
        if let Some(style) = patch.style_description {
            changed |= self.style_description != style;
            self.style_description = style;
        }
        changed
    }
}

/// Partial update for a [`Character`]. Absent fields are left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CharacterPatch {
    /// New name
    pub name: Option<String>,
    /// New style description
    pub style_description: Option<String>,
    /// Mark as the default (clears every other default)
    pub is_default: Option<bool>,
}

impl CharacterPatch {
    /// True when the patch carries no fields.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.style_description.is_none() && self.is_default.is_none()
    }
}
