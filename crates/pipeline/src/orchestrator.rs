//! Drives one job through the stage sequence and guarantees it reaches a
//! terminal status.
//!
//! Stage soft failures (no story, batch image failure) are converted into
//! a terminal `error` status inside [`JobOrchestrator::execute`]. Anything
//! that escapes `execute` -- in practice, persistence failures -- is
//! trapped by [`JobOrchestrator::run`] and written back as a terminal
//! error too. If that final write itself fails, the job stays in its last
//! persisted non-terminal state; that gap is logged and accepted.

use std::sync::Arc;

use panelforge_core::request::GenerationRequest;
use panelforge_db::models::comic::ComicJob;

use crate::images::ImageStage;
use crate::reporter::ProgressReporter;
use crate::store::{JobStore, StoreError};
use crate::story::StoryStage;

/// Three-stage state machine for one job:
/// `generating_story -> generating_images -> {completed | error}`.
pub struct JobOrchestrator {
    store: Arc<dyn JobStore>,
    story: StoryStage,
    images: ImageStage,
}

impl JobOrchestrator {
    pub fn new(store: Arc<dyn JobStore>, story: StoryStage, images: ImageStage) -> Self {
        Self {
            store,
            story,
            images,
        }
    }

    /// Run the job to a terminal status. Never returns an error and never
    /// panics of its own accord; this is the outermost boundary of the
    /// background task.
    pub async fn run(&self, job: ComicJob) {
        let reporter = ProgressReporter::new(Arc::clone(&self.store), job.id);

        if let Err(e) = self.execute(&job, &reporter).await {
            tracing::error!(job_id = %job.id, error = %e, "Generation pipeline failed");
            if let Err(persist) = reporter.failed(&e.to_string()).await {
                tracing::error!(
                    job_id = %job.id,
                    error = %persist,
                    "Failed to record terminal error state; job left in last persisted state"
                );
            }
        }
    }

    /// The stage sequence. Returns `Err` only for persistence failures;
    /// stage failures are finalized in here.
    async fn execute(
        &self,
        job: &ComicJob,
        reporter: &ProgressReporter,
    ) -> Result<(), StoreError> {
        reporter.story_started().await?;
        tracing::info!(job_id = %job.id, topic = %job.topic, "Generating comic story");

        let request = GenerationRequest {
            topic: job.topic.clone(),
            genre: job.genre.clone(),
            style: job.style.clone(),
            panel_count: u32::try_from(job.panel_count).unwrap_or(1),
        };

        let story = match self.story.generate(&request).await {
            Ok(story) => story,
            Err(failure) => {
                tracing::warn!(job_id = %job.id, reason = %failure, "Story stage yielded no story");
                reporter
                    .failed(&format!("Failed to generate story: {failure}"))
                    .await?;
                return Ok(());
            }
        };

        reporter.story_ready(&story).await?;
        tracing::info!(job_id = %job.id, scenes = story.scenes.len(), "Generating images");

        let images = match self
            .images
            .generate(job.id, &story.scenes, &job.style, &job.genre, reporter)
            .await
        {
            Ok(images) => images,
            Err(failure) => {
                tracing::warn!(job_id = %job.id, reason = %failure, "Image stage failed at batch level");
                reporter
                    .failed(&format!("Failed to generate images: {failure}"))
                    .await?;
                return Ok(());
            }
        };

        reporter.completed(&story, &images).await?;
        tracing::info!(job_id = %job.id, panels = images.panels.len(), "Comic generation completed");
        Ok(())
    }
}
