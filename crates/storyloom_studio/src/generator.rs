//! Scene orchestration: one scene at a time, or the whole storyboard.

use crate::{ReferenceStore, Refinement, build_scene_request, traversal_order};
use derive_getters::Getters;
use storyloom_core::{MediaPayload, ScenePatch};
use storyloom_error::{
    GatewayError, GatewayErrorKind, StoryloomError, StoryloomResult, StudioError, StudioErrorKind,
};
use storyloom_interface::{ImageGateway, ReferenceFetcher};

/// Result of rendering one scene during a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneOutcome {
    /// The scene now holds a generated image
    Generated {
        /// Scene id
        scene_id: String,
        /// 1-based position at generation time
        index: usize,
    },
    /// The scene was marked Failed
    Failed {
        /// Scene id
        scene_id: String,
        /// 1-based position at generation time
        index: usize,
        /// Message recorded on the scene
        error: String,
    },
}

impl SceneOutcome {
    /// Whether the scene was generated.
    pub fn is_success(&self) -> bool {
        matches!(self, SceneOutcome::Generated { .. })
    }
}

/// Per-scene outcomes of a "generate all" run, in traversal order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters)]
pub struct BatchReport {
    outcomes: Vec<SceneOutcome>,
}

impl BatchReport {
    /// Number of generated scenes.
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    /// Number of failed scenes.
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

/// Renders scenes through an image gateway and records results in the store.
///
/// Scenes are processed strictly one at a time. A failure is recorded on the
/// scene and never retried automatically.
pub struct SceneGenerator<G: ImageGateway, F: ReferenceFetcher> {
    gateway: G,
    fetcher: F,
    model: Option<String>,
}

impl<G: ImageGateway, F: ReferenceFetcher> SceneGenerator<G, F> {
    /// Create a generator over the given gateway and anchor fetcher.
    pub fn new(gateway: G, fetcher: F) -> Self {
        Self {
            gateway,
            fetcher,
            model: None,
        }
    }

    /// Override the image model for every request.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Get a reference to the underlying gateway.
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Render one scene and record the outcome on it.
    ///
    /// On success the scene holds a `data:` URL of the image and no error.
    /// On failure it is marked Failed with a readable message and the error
    /// is returned.
    ///
    /// # Errors
    ///
    /// `SceneNotFound` (nothing recorded), or whatever made the scene fail.
    #[tracing::instrument(skip(self, store, refinement), fields(refine = refinement.is_some()))]
    pub async fn generate_scene(
        &self,
        store: &mut ReferenceStore,
        scene_id: &str,
        refinement: Option<Refinement>,
    ) -> StoryloomResult<()> {
        // Read before the scene's own result is cleared.
        let anchor = store.style_anchor().and_then(|s| s.result_url.clone());
        store.update_scene(scene_id, ScenePatch::started())?;

        match self
            .render(store, scene_id, anchor, refinement.as_ref())
            .await
        {
            Ok(image) => {
                store.update_scene(scene_id, ScenePatch::succeeded(image.to_data_url()))?;
                tracing::info!(scene_id, mime = %image.mime, size = image.data.len(), "Scene generated");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(scene_id, error = %e, "Scene generation failed");
                store.update_scene(scene_id, ScenePatch::failed(e.user_message()))?;
                Err(e)
            }
        }
    }

    /// Regenerate a scene with edit text and an optional base image.
    pub async fn refine_scene(
        &self,
        store: &mut ReferenceStore,
        scene_id: &str,
        text: &str,
        base_image: Option<MediaPayload>,
    ) -> StoryloomResult<()> {
        let refinement = Refinement {
            prompt: Some(text.to_string()),
            base_image,
        };
        self.generate_scene(store, scene_id, Some(refinement)).await
    }

    /// Render every scene in style-bootstrap order.
    ///
    /// # Errors
    ///
    /// `NoStyleAnchor` when no scene has characters; no gateway call is made.
    /// Individual scene failures are reported in the [`BatchReport`].
    #[tracing::instrument(skip(self, store), fields(scenes = store.scenes().len()))]
    pub async fn generate_all(&self, store: &mut ReferenceStore) -> StoryloomResult<BatchReport> {
        let order = traversal_order(store.scenes())?;
        tracing::info!(first = %order[0], "Starting style-bootstrap traversal");

        let mut report = BatchReport::default();
        for scene_id in order {
            let index = store.scene(&scene_id).map(|s| s.index).unwrap_or_default();
            let outcome = match self.generate_scene(store, &scene_id, None).await {
                Ok(()) => SceneOutcome::Generated { scene_id, index },
                Err(e) => SceneOutcome::Failed {
                    scene_id,
                    index,
                    error: e.user_message(),
                },
            };
            report.outcomes.push(outcome);
        }

        tracing::info!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            "Traversal finished"
        );
        Ok(report)
    }

    async fn render(
        &self,
        store: &ReferenceStore,
        scene_id: &str,
        anchor: Option<String>,
        refinement: Option<&Refinement>,
    ) -> StoryloomResult<MediaPayload> {
        let style_reference = match anchor {
            Some(locator) => Some(self.fetcher.fetch(&locator).await.map_err(|e| {
                StoryloomError::from(StudioError::new(StudioErrorKind::ReferenceFetchFailed(
                    e.user_message(),
                )))
            })?),
            None => None,
        };

        let mut request =
            build_scene_request(store, scene_id, style_reference.as_ref(), refinement)?;
        request.model = self.model.clone();
        tracing::debug!(
            parts = request.parts.len(),
            images = request.image_count(),
            "Built scene request"
        );

        self.gateway.generate_image(&request).await?.ok_or_else(|| {
            GatewayError::new(GatewayErrorKind::EmptyResult(
                "API returned no image.".to_string(),
            ))
            .into()
        })
    }
}
