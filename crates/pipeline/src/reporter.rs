//! Partial-update writer for one job's persisted state.
//!
//! Each method issues exactly one [`JobPatch`], so every pipeline
//! transition is a single atomic write and pollers only ever observe a
//! prefix of the transition sequence. Calls are idempotent: re-applying
//! the same fields leaves the observable record unchanged.

use std::sync::Arc;

use chrono::Utc;
use panelforge_core::progress::{
    panel_progress, panel_step, PROGRESS_COMPLETE, PROGRESS_IMAGES, PROGRESS_STORY, STEP_COMPLETE,
    STEP_IMAGES, STEP_STORY,
};
use panelforge_core::status::JobStatus;
use panelforge_core::story::{ImageSet, Story};
use panelforge_core::types::JobId;
use panelforge_db::models::comic::JobPatch;

use crate::store::{JobStore, StoreError};

/// Writes progress for a single job id.
#[derive(Clone)]
pub struct ProgressReporter {
    store: Arc<dyn JobStore>,
    job_id: JobId,
}

impl ProgressReporter {
    pub fn new(store: Arc<dyn JobStore>, job_id: JobId) -> Self {
        Self { store, job_id }
    }

    /// Job id this reporter writes to.
    pub fn job_id(&self) -> JobId {
        self.job_id
    }

    /// Story stage is underway: progress 10.
    pub async fn story_started(&self) -> Result<(), StoreError> {
        self.patch(JobPatch {
            status: Some(JobStatus::GeneratingStory),
            progress_percent: Some(PROGRESS_STORY),
            current_step: Some(STEP_STORY.to_string()),
            ..Default::default()
        })
        .await
    }

    /// Story parsed and persisted; image stage begins: progress 30.
    pub async fn story_ready(&self, story: &Story) -> Result<(), StoreError> {
        self.patch(JobPatch {
            status: Some(JobStatus::GeneratingImages),
            progress_percent: Some(PROGRESS_IMAGES),
            current_step: Some(STEP_IMAGES.to_string()),
            story: Some(serde_json::to_value(story)?),
            ..Default::default()
        })
        .await
    }

    /// About to synthesize the panel at `index` (0-based) of `total`.
    pub async fn panel_started(
        &self,
        index: usize,
        total: usize,
        panel_number: u32,
    ) -> Result<(), StoreError> {
        self.patch(JobPatch {
            progress_percent: Some(panel_progress(index, total)),
            current_step: Some(panel_step(panel_number)),
            ..Default::default()
        })
        .await
    }

    /// Terminal success: progress 100, full payload, completion timestamp.
    pub async fn completed(&self, story: &Story, images: &ImageSet) -> Result<(), StoreError> {
        self.patch(JobPatch {
            status: Some(JobStatus::Completed),
            progress_percent: Some(PROGRESS_COMPLETE),
            current_step: Some(STEP_COMPLETE.to_string()),
            story: Some(serde_json::to_value(story)?),
            images: Some(serde_json::to_value(images)?),
            completed_at: Some(Utc::now()),
            ..Default::default()
        })
        .await
    }

    /// Terminal failure. Progress is left where it was so pollers can see
    /// how far the job got.
    pub async fn failed(&self, message: &str) -> Result<(), StoreError> {
        self.patch(JobPatch {
            status: Some(JobStatus::Error),
            error_message: Some(message.to_string()),
            ..Default::default()
        })
        .await
    }

    async fn patch(&self, patch: JobPatch) -> Result<(), StoreError> {
        let updated = self.store.apply_patch(self.job_id, &patch).await?;
        if updated.is_none() {
            tracing::warn!(job_id = %self.job_id, "Progress update targeted a missing job row");
        }
        Ok(())
    }
}
