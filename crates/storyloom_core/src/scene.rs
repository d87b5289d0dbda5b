//! Storyboard scenes.

use crate::{GenerationStatus, new_id};
use serde::{Deserialize, Serialize};

/// One storyboard panel.
///
/// `index` is dense and 1-based; the owning store recomputes it on every
/// insert and removal. `result_url` is present iff `status` is Success and
/// `error` is present iff `status` is Failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    /// Scene identifier
    pub id: String,
    /// 1-based position in the storyboard
    pub index: usize,
    /// Narrative text
    pub script: String,
    /// Visual description sent to the model
    pub prompt: String,
    /// Ordered, unique character ids; empty means environment-only
    pub selected_character_ids: Vec<String>,
    /// Generation status
    pub status: GenerationStatus,
    /// Data URL of the generated image
    pub result_url: Option<String>,
    /// Human-readable failure
    pub error: Option<String>,
    /// A generation request is in flight
    #[serde(default, skip_serializing)]
    pub is_generating: bool,
}

impl Scene {
    /// Creates an empty pending scene at `index`.
    pub fn new(index: usize) -> Self {
        Self {
            id: new_id(),
            index,
            script: String::new(),
            prompt: String::new(),
            selected_character_ids: Vec::new(),
            status: GenerationStatus::Pending,
            result_url: None,
            error: None,
            is_generating: false,
        }
    }

    /// Creates a scene with the given script and prompt.
    pub fn with_text(index: usize, script: impl Into<String>, prompt: impl Into<String>) -> Self {
        let mut scene = Self::new(index);
        scene.script = script.into();
        scene.prompt = prompt.into();
        scene
    }

    /// Whether the scene has at least one selected character.
    pub fn has_characters(&self) -> bool {
        !self.selected_character_ids.is_empty()
    }

    /// Whether the scene has a generated image.
    pub fn has_result(&self) -> bool {
        self.result_url.is_some()
    }

    /// Applies a merge patch. Returns true if anything changed.
    ///
    /// Duplicate character ids in the patch are dropped, keeping the first
    /// occurrence.
    pub fn apply(&mut self, patch: ScenePatch) -> bool {
        let mut changed = false;
        if let Some(script) = patch.script {
            changed |= self.script != script;
            self.script = script;
        }
        if let Some(prompt) = patch.prompt {
            changed |= self.prompt != prompt;
            self.prompt = prompt;
        }
        if let Some(ids) = patch.selected_character_ids {
            let mut unique: Vec<String> = Vec::with_capacity(ids.len());
            for id in ids {
                if !unique.contains(&id) {
                    unique.push(id);
                }
            }
            changed |= self.selected_character_ids != unique;
            self.selected_character_ids = unique;
        }
        if let Some(status) = patch.status {
            changed |= self.status != status;
            self.status = status;
        }
        if let Some(result_url) = patch.result_url {
            changed |= self.result_url != result_url;
            self.result_url = result_url;
        }
        if let Some(error) = patch.error {
            changed |= self.error != error;
            self.error = error;
        }
        if let Some(flag) = patch.is_generating {
            changed |= self.is_generating != flag;
            self.is_generating = flag;
        }
        changed
    }
}

/// Partial update for a [`Scene`].
///
/// Clearable fields use `Option<Option<_>>`: `Some(None)` clears the value.
///
/// # Examples
///
/// ```
/// use storyloom_core::{Scene, ScenePatch};
///
/// let mut scene = Scene::new(1);
/// let before = scene.clone();
/// assert!(!scene.apply(ScenePatch::default()));
/// assert_eq!(scene, before);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScenePatch {
    /// New script
    pub script: Option<String>,
    /// New prompt
    pub prompt: Option<String>,
    /// New character selection
    pub selected_character_ids: Option<Vec<String>>,
    /// New status
    pub status: Option<GenerationStatus>,
    /// New result locator
    pub result_url: Option<Option<String>>,
    /// New error
    pub error: Option<Option<String>>,
    /// New in-flight flag
    pub is_generating: Option<bool>,
}

impl ScenePatch {
    /// True when the patch carries no fields.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Marks a scene as in flight. Any previous result is dropped.
    pub fn started() -> Self {
        Self {
            status: Some(GenerationStatus::Running),
            result_url: Some(None),
            error: Some(None),
            is_generating: Some(true),
            ..Self::default()
        }
    }

    /// Records a successful generation.
    pub fn succeeded(result_url: String) -> Self {
        Self {
            status: Some(GenerationStatus::Success),
            result_url: Some(Some(result_url)),
            error: Some(None),
            is_generating: Some(false),
            ..Self::default()
        }
    }

    /// Records a failed generation. Any previous result is dropped.
    pub fn failed(error: String) -> Self {
        Self {
            status: Some(GenerationStatus::Failed),
            result_url: Some(None),
            error: Some(Some(error)),
            is_generating: Some(false),
            ..Self::default()
        }
    }
}
