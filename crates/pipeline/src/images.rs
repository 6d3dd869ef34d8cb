//! Image stage: sequential per-panel prompt refinement, synthesis, and
//! artifact writes, with panel-level fault isolation.
//!
//! Panels are processed strictly in scene order, one at a time. A failed
//! panel becomes an error-marker entry and the batch continues, so
//! `panels.len()` always equals `scenes.len()` on return. Only conditions
//! outside the per-panel scope (artifact directory setup, progress
//! persistence) abort the whole stage.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use panelforge_core::prompt::panel_prompt;
use panelforge_core::story::{ImageSet, PanelResult, Scene};
use panelforge_core::types::JobId;
use panelforge_genai::error::GenAiError;
use panelforge_genai::traits::{ImageSynthesizer, TextGenerator};

use crate::reporter::ProgressReporter;
use crate::store::StoreError;

/// URL prefix under which generated artifacts are served.
pub const PUBLIC_IMAGE_PREFIX: &str = "/generated";

/// Batch-level failures that abort the whole stage.
#[derive(Debug, thiserror::Error)]
pub enum ImageBatchError {
    /// The per-job artifact directory could not be created.
    #[error("failed to prepare artifact directory: {0}")]
    Storage(#[from] std::io::Error),

    /// A progress write failed mid-batch.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// One panel's failure, rendered into its error marker.
#[derive(Debug, thiserror::Error)]
enum PanelError {
    #[error(transparent)]
    GenAi(#[from] GenAiError),

    #[error("failed to write artifact: {0}")]
    Io(#[from] std::io::Error),
}

/// Turns scenes into panel artwork under `assets_root/<job id>/`.
pub struct ImageStage {
    text: Arc<dyn TextGenerator>,
    image: Arc<dyn ImageSynthesizer>,
    assets_root: PathBuf,
    panel_delay: Duration,
}

impl ImageStage {
    /// * `panel_delay` - pause after every panel, successful or not, to
    ///   respect upstream rate limits.
    pub fn new(
        text: Arc<dyn TextGenerator>,
        image: Arc<dyn ImageSynthesizer>,
        assets_root: PathBuf,
        panel_delay: Duration,
    ) -> Self {
        Self {
            text,
            image,
            assets_root,
            panel_delay,
        }
    }

    /// Produce one [`PanelResult`] per scene, in scene order. Progress is
    /// persisted before each panel is attempted, so pollers see which
    /// panel is in flight.
    pub async fn generate(
        &self,
        job_id: JobId,
        scenes: &[Scene],
        style: &str,
        genre: &str,
        reporter: &ProgressReporter,
    ) -> Result<ImageSet, ImageBatchError> {
        let folder = self.assets_root.join(job_id.to_string());
        tokio::fs::create_dir_all(&folder).await?;

        let total = scenes.len();
        let mut panels = Vec::with_capacity(total);

        for (index, scene) in scenes.iter().enumerate() {
            reporter
                .panel_started(index, total, scene.panel_number)
                .await?;

            match self.generate_panel(scene, style, genre, job_id, &folder).await {
                Ok((file_name, image_path)) => {
                    tracing::info!(
                        job_id = %job_id,
                        panel = scene.panel_number,
                        file = %file_name,
                        "Panel generated"
                    );
                    panels.push(PanelResult {
                        panel_number: scene.panel_number,
                        file_name: Some(file_name),
                        image_path: Some(image_path),
                        dialogue: scene.dialogue.clone(),
                        action: scene.action.clone(),
                        setting: scene.setting.clone(),
                        error: None,
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        job_id = %job_id,
                        panel = scene.panel_number,
                        error = %e,
                        "Panel generation failed, continuing with next panel"
                    );
                    panels.push(PanelResult {
                        panel_number: scene.panel_number,
                        file_name: None,
                        image_path: None,
                        dialogue: scene.dialogue.clone(),
                        action: scene.action.clone(),
                        setting: None,
                        error: Some(e.to_string()),
                    });
                }
            }

            tokio::time::sleep(self.panel_delay).await;
        }

        Ok(ImageSet {
            folder: folder.to_string_lossy().into_owned(),
            panels,
        })
    }

    /// Refine the scene into an image prompt, synthesize, and write the
    /// artifact. Returns `(file_name, public_path)`.
    async fn generate_panel(
        &self,
        scene: &Scene,
        style: &str,
        genre: &str,
        job_id: JobId,
        folder: &Path,
    ) -> Result<(String, String), PanelError> {
        let refined = self
            .text
            .generate_text(&panel_prompt(scene, style, genre))
            .await?;
        let bytes = self.image.synthesize(refined.trim()).await?;

        let file_name = format!("panel_{:02}.png", scene.panel_number);
        tokio::fs::write(folder.join(&file_name), &bytes).await?;

        let image_path = format!("{PUBLIC_IMAGE_PREFIX}/{job_id}/{file_name}");
        Ok((file_name, image_path))
    }
}
