//! Reference store: characters and scenes.

use storyloom_core::{
    Character, CharacterImage, CharacterPatch, MAX_CHARACTER_IMAGES, MediaPayload, Scene,
    ScenePatch,
};
use storyloom_error::{StoryloomResult, StudioError, StudioErrorKind};
use tracing::debug;

/// Owns the studio's characters and scenes.
///
/// Invariants held by every operation:
/// - scene indices are exactly `1..=N` in list order
/// - at most one character is the default
/// - a character holds at most [`MAX_CHARACTER_IMAGES`] images
///
/// # Examples
///
/// ```
/// use storyloom_studio::ReferenceStore;
///
/// let mut store = ReferenceStore::new();
/// assert_eq!(store.characters().len(), 3);
///
/// let first = store.add_scene();
/// let second = store.add_scene();
/// store.remove_scene(&first).unwrap();
/// assert_eq!(store.scene(&second).map(|s| s.index), Some(1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceStore {
    characters: Vec<Character>,
    scenes: Vec<Scene>,
}

impl Default for ReferenceStore {
    fn default() -> Self {
        let mut characters: Vec<Character> = (1..=3).map(Character::placeholder).collect();
        characters[0].is_default = true;
        Self {
            characters,
            scenes: Vec::new(),
        }
    }
}

impl ReferenceStore {
    /// Three placeholder characters ("Character 1" is the default), no scenes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with the given characters and no scenes.
    ///
    /// If several characters claim to be the default, only the first keeps
    /// the flag.
    pub fn with_characters(characters: Vec<Character>) -> Self {
        let mut store = Self {
            characters,
            scenes: Vec::new(),
        };
        let mut seen_default = false;
        for c in &mut store.characters {
            if c.is_default && seen_default {
                c.is_default = false;
            }
            seen_default |= c.is_default;
        }
        store
    }

    /// All characters in insertion order.
    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    /// All scenes in storyboard order.
    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    /// Character by id.
    pub fn character(&self, id: &str) -> Option<&Character> {
        self.characters.iter().find(|c| c.id == id)
    }

    /// Character by display name.
    pub fn character_by_name(&self, name: &str) -> Option<&Character> {
        self.characters.iter().find(|c| c.name == name)
    }

    /// Scene by id.
    pub fn scene(&self, id: &str) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.id == id)
    }

    /// Zero-based list position of a scene.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.scenes.iter().position(|s| s.id == id)
    }

    /// The default character, if any.
    pub fn default_character(&self) -> Option<&Character> {
        self.characters.iter().find(|c| c.is_default)
    }

    /// Characters selected by `scene`, in selection order.
    ///
    /// Ids that no longer resolve to a character are skipped.
    pub fn selected_characters(&self, scene: &Scene) -> Vec<&Character> {
        scene
            .selected_character_ids
            .iter()
            .filter_map(|id| self.character(id))
            .collect()
    }

    /// First scene, in storyboard order, with both a result and characters.
    ///
    /// Its image is the style anchor for every generation request.
    pub fn style_anchor(&self) -> Option<&Scene> {
        self.scenes
            .iter()
            .find(|s| s.has_result() && s.has_characters())
    }

    /// Appends a character. A default flag clears every other default.
    pub fn add_character(&mut self, character: Character) -> String {
        let id = character.id.clone();
        let is_default = character.is_default;
        self.characters.push(character);
        if is_default {
            self.mark_default(&id);
        }
        id
    }

    /// Appends an empty scene at the tail and returns its id.
    ///
    /// The default character, if any, is pre-selected.
    pub fn add_scene(&mut self) -> String {
        let mut scene = Scene::new(self.scenes.len() + 1);
        if let Some(default) = self.default_character() {
            scene.selected_character_ids.push(default.id.clone());
        }
        let id = scene.id.clone();
        debug!(scene_id = %id, index = scene.index, "Added scene");
        self.scenes.push(scene);
        id
    }

    /// Removes a scene and renumbers the rest densely from 1.
    pub fn remove_scene(&mut self, id: &str) -> StoryloomResult<Scene> {
        let pos = self.position(id).ok_or_else(|| scene_not_found(id))?;
        let removed = self.scenes.remove(pos);
        for (i, scene) in self.scenes.iter_mut().enumerate() {
            scene.index = i + 1;
        }
        debug!(scene_id = %id, remaining = self.scenes.len(), "Removed scene");
        Ok(removed)
    }

    /// Merge-patches a scene. Returns whether anything changed.
    pub fn update_scene(&mut self, id: &str, patch: ScenePatch) -> StoryloomResult<bool> {
        let scene = self
            .scenes
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| scene_not_found(id))?;
        if patch.is_empty() {
            return Ok(false);
        }
        Ok(scene.apply(patch))
    }

    /// Merge-patches a character. Returns whether anything changed.
    ///
    /// `is_default: Some(true)` makes the character the exclusive default;
    /// `Some(false)` clears only its own flag.
    pub fn update_character(&mut self, id: &str, patch: CharacterPatch) -> StoryloomResult<bool> {
        let is_default = patch.is_default;
        let character = self.character_mut(id)?;
        let mut changed = character.apply(patch);
        let was_default = character.is_default;

        match is_default {
            Some(true) if !was_default => {
                self.mark_default(id);
                changed = true;
            }
            Some(false) if was_default => {
                character.is_default = false;
                changed = true;
            }
            _ => {}
        }
        Ok(changed)
    }

    /// Makes `id` the only default character.
    pub fn set_default_character(&mut self, id: &str) -> StoryloomResult<()> {
        self.character_mut(id)?;
        self.mark_default(id);
        Ok(())
    }

    /// Attaches a reference image and returns its id.
    ///
    /// # Errors
    ///
    /// `TooManyImages` when the character already holds the maximum.
    pub fn add_character_image(&mut self, id: &str, payload: MediaPayload) -> StoryloomResult<String> {
        let character = self.character_mut(id)?;
        if character.images.len() >= MAX_CHARACTER_IMAGES {
            return Err(StudioError::new(StudioErrorKind::TooManyImages {
                character: character.name.clone(),
                max: MAX_CHARACTER_IMAGES,
            })
            .into());
        }
        let image = CharacterImage::new(payload);
        let image_id = image.id.clone();
        character.images.push(image);
        Ok(image_id)
    }

    /// Detaches a reference image.
    pub fn remove_character_image(&mut self, id: &str, image_id: &str) -> StoryloomResult<()> {
        let character = self.character_mut(id)?;
        let before = character.images.len();
        character.images.retain(|img| img.id != image_id);
        if character.images.len() == before {
            return Err(StudioError::new(StudioErrorKind::ImageNotFound(image_id.to_string())).into());
        }
        Ok(())
    }

    fn character_mut(&mut self, id: &str) -> StoryloomResult<&mut Character> {
        self.characters
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| {
                StudioError::new(StudioErrorKind::CharacterNotFound(id.to_string())).into()
            })
    }

    fn mark_default(&mut self, id: &str) {
        for c in &mut self.characters {
            c.is_default = c.id == id;
        }
    }
}

#[track_caller]
fn scene_not_found(id: &str) -> StudioError {
    StudioError::new(StudioErrorKind::SceneNotFound(id.to_string()))
}
