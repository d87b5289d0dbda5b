//! TOML storyboard project files.
//!
//! ```toml
//! [project]
//! name = "Night Run"
//!
//! [[character]]
//! name = "Ada"
//! style = "red scarf, watercolor"
//! images = ["refs/ada_front.png", "refs/ada_side.png"]
//! default = true
//!
//! [[scene]]
//! script = "Ada sprints across the rooftop"
//! prompt = "wide shot, rain, neon signs"
//! characters = ["Ada"]
//! ```
//!
//! Image and result paths are relative to the project file's directory.

use crate::ReferenceStore;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use storyloom_core::{Character, GenerationStatus, MediaPayload, ScenePatch};
use storyloom_error::{StoryloomResult, StudioError, StudioErrorKind};

/// `[project]` table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProjectInfo {
    /// Project name, used for archive naming
    pub name: String,
}

/// `[[character]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectCharacter {
    /// Display name
    pub name: String,
    /// Style description
    #[serde(default)]
    pub style: String,
    /// Reference image paths
    #[serde(default)]
    pub images: Vec<PathBuf>,
    /// Pre-selected on new scenes
    #[serde(default)]
    pub default: bool,
}

/// `[[scene]]` entry, in storyboard order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProjectScene {
    /// Narrative text
    #[serde(default)]
    pub script: String,
    /// Visual description
    #[serde(default)]
    pub prompt: String,
    /// Selected character names, in order; absent keeps the default
    /// character, empty means environment-only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub characters: Option<Vec<String>>,
    /// Previously generated image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<PathBuf>,
}

/// A storyboard project as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProjectFile {
    /// Project metadata
    #[serde(default)]
    pub project: ProjectInfo,
    /// Characters; the three placeholders are used when empty
    #[serde(default, rename = "character")]
    pub characters: Vec<ProjectCharacter>,
    /// Scenes in storyboard order
    #[serde(default, rename = "scene")]
    pub scenes: Vec<ProjectScene>,
}

impl ProjectFile {
    /// Parse a project from TOML text.
    pub fn from_toml(text: &str) -> StoryloomResult<Self> {
        Ok(toml::from_str(text).map_err(|e| project_err(format!("Invalid project TOML: {}", e)))?)
    }

    /// Read and parse a project file.
    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub async fn from_file(path: impl AsRef<Path>) -> StoryloomResult<Self> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| project_err(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&text)
    }

    /// Serialize to TOML text.
    pub fn to_toml(&self) -> StoryloomResult<String> {
        Ok(toml::to_string_pretty(self)
            .map_err(|e| project_err(format!("Failed to serialize project: {}", e)))?)
    }

    /// Write the project back to disk.
    pub async fn save(&self, path: impl AsRef<Path>) -> StoryloomResult<()> {
        let path = path.as_ref();
        let text = self.to_toml()?;
        tokio::fs::write(path, text)
            .await
            .map_err(|e| project_err(format!("{}: {}", path.display(), e)))?;
        Ok(())
    }

    /// Build a reference store, reading images relative to `base_dir`.
    ///
    /// Scenes with an existing `result` file start as Success so they can
    /// serve as the style anchor.
    #[tracing::instrument(skip(self), fields(project = %self.project.name))]
    pub async fn load_store(&self, base_dir: &Path) -> StoryloomResult<ReferenceStore> {
        let mut store = if self.characters.is_empty() {
            ReferenceStore::new()
        } else {
            ReferenceStore::with_characters(Vec::new())
        };

        for entry in &self.characters {
            let mut character = Character::new(&entry.name, &entry.style);
            character.is_default = entry.default;
            let id = store.add_character(character);
            for image in &entry.images {
                let payload = read_media(&base_dir.join(image)).await?;
                store.add_character_image(&id, payload)?;
            }
        }

        for entry in &self.scenes {
            let selection = match &entry.characters {
                Some(names) => {
                    let mut ids = Vec::with_capacity(names.len());
                    for name in names {
                        let character = store.character_by_name(name).ok_or_else(|| {
                            project_err(format!(
                                "Scene '{}' references unknown character '{}'",
                                entry.script, name
                            ))
                        })?;
                        ids.push(character.id.clone());
                    }
                    Some(ids)
                }
                None => None,
            };

            let scene_id = store.add_scene();
            let mut patch = ScenePatch {
                script: Some(entry.script.clone()),
                prompt: Some(entry.prompt.clone()),
                selected_character_ids: selection,
                ..ScenePatch::default()
            };

            if let Some(result) = &entry.result {
                let path = base_dir.join(result);
                if tokio::fs::try_exists(&path).await.unwrap_or(false) {
                    let payload = read_media(&path).await?;
                    patch.status = Some(GenerationStatus::Success);
                    patch.result_url = Some(Some(payload.to_data_url()));
                }
            }
            store.update_scene(&scene_id, patch)?;
        }

        tracing::info!(
            characters = store.characters().len(),
            scenes = store.scenes().len(),
            "Loaded project"
        );
        Ok(store)
    }

    /// Write the outcome of a run back into the project.
    ///
    /// `saved` maps 1-based scene indices to result files. Scenes that are
    /// Failed in `store` lose their previous result.
    pub fn record_results(&mut self, store: &ReferenceStore, saved: &[(usize, PathBuf)]) {
        for scene in store.scenes() {
            if scene.status != GenerationStatus::Failed {
                continue;
            }
            if let Some(entry) = scene.index.checked_sub(1).and_then(|i| self.scenes.get_mut(i)) {
                entry.result = None;
            }
        }
        for (index, path) in saved {
            if let Some(scene) = index.checked_sub(1).and_then(|i| self.scenes.get_mut(i)) {
                scene.result = Some(path.clone());
            }
        }
    }
}

async fn read_media(path: &Path) -> StoryloomResult<MediaPayload> {
    let data = tokio::fs::read(path)
        .await
        .map_err(|e| project_err(format!("{}: {}", path.display(), e)))?;
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("png");
    Ok(MediaPayload::new(MediaPayload::mime_for_extension(ext), data))
}

#[track_caller]
fn project_err(message: String) -> StudioError {
    StudioError::new(StudioErrorKind::ProjectFile(message))
}
