//! Public surface of the pipeline: request intake, polling queries, and
//! job lookups.
//!
//! [`GenerationEngine::submit`] validates, creates the job row, launches
//! the orchestrator through the registry, and returns without awaiting
//! generation. [`GenerationEngine::query_status`] reads whatever state is
//! currently persisted; it never blocks on the pipeline.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use panelforge_core::error::CoreError;
use panelforge_core::request::GenerationRequest;
use panelforge_core::status::JobStatus;
use panelforge_core::types::{new_job_id, DbId, JobId};
use panelforge_db::models::comic::{ComicJob, ComicListQuery, NewComicJob};
use panelforge_genai::traits::{ImageSynthesizer, TextGenerator};
use serde::Serialize;

use crate::images::ImageStage;
use crate::orchestrator::JobOrchestrator;
use crate::registry::JobRegistry;
use crate::store::{JobStore, StoreError};
use crate::story::StoryStage;

/// Default pause between panels, in milliseconds.
pub const DEFAULT_PANEL_DELAY_MS: u64 = 1000;

/// Resource path prefix used in completed-status redirects.
const RESOURCE_PREFIX: &str = "/api/v1/comics";

/// Tunables for the generation pipeline.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Directory that receives one artifact subdirectory per job.
    pub assets_root: PathBuf,
    /// Pause after every panel, successful or not.
    pub panel_delay: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            assets_root: PathBuf::from("generated"),
            panel_delay: Duration::from_millis(DEFAULT_PANEL_DELAY_MS),
        }
    }
}

/// Why a submission was rejected. Validation failures are the caller's
/// fault; store failures are ours.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Polling response for one job id. Deliberately small: terminal success
/// carries a redirect to the full resource instead of embedding the
/// story/image payload.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum StatusView {
    NotFound {
        status: String,
    },
    InProgress {
        status: String,
        progress: i16,
        current_step: String,
    },
    Error {
        status: String,
        error: String,
    },
    Completed {
        status: String,
        redirect: String,
    },
}

impl StatusView {
    /// Shape returned for ids that no row matches.
    pub fn not_found() -> Self {
        StatusView::NotFound {
            status: "not_found".to_string(),
        }
    }

    /// Project a job row into its polling shape.
    pub fn from_job(job: &ComicJob) -> Self {
        match job.status() {
            Some(JobStatus::Completed) => StatusView::Completed {
                status: job.status.clone(),
                redirect: format!("{RESOURCE_PREFIX}/{}", job.id),
            },
            Some(JobStatus::Error) => StatusView::Error {
                status: job.status.clone(),
                error: job
                    .error_message
                    .clone()
                    .unwrap_or_else(|| "Unknown error".to_string()),
            },
            _ => StatusView::InProgress {
                status: job.status.clone(),
                progress: job.progress_percent,
                current_step: job.current_step.clone(),
            },
        }
    }
}

/// Entry point wiring the store, collaborator clients, and registry into
/// a submit/poll surface.
pub struct GenerationEngine {
    store: Arc<dyn JobStore>,
    orchestrator: Arc<JobOrchestrator>,
    registry: Arc<JobRegistry>,
}

impl GenerationEngine {
    pub fn new(
        store: Arc<dyn JobStore>,
        text: Arc<dyn TextGenerator>,
        image: Arc<dyn ImageSynthesizer>,
        config: EngineConfig,
    ) -> Self {
        let story = StoryStage::new(Arc::clone(&text));
        let images = ImageStage::new(text, image, config.assets_root, config.panel_delay);
        let orchestrator = Arc::new(JobOrchestrator::new(Arc::clone(&store), story, images));

        Self {
            store,
            orchestrator,
            registry: Arc::new(JobRegistry::new()),
        }
    }

    /// Validate the request, create the job row, and launch generation
    /// detached. Returns the created row immediately.
    pub async fn submit(
        &self,
        request: GenerationRequest,
        created_by: Option<DbId>,
    ) -> Result<ComicJob, SubmitError> {
        request.validate()?;

        let input = NewComicJob {
            id: new_job_id(),
            topic: request.topic,
            genre: request.genre,
            style: request.style,
            panel_count: request.panel_count as i32,
            created_by,
        };
        let job = self.store.create(&input).await?;

        tracing::info!(job_id = %job.id, topic = %job.topic, "Generation job accepted");

        self.registry
            .launch(
                job.clone(),
                Arc::clone(&self.orchestrator),
                Arc::clone(&self.store),
            )
            .await;

        Ok(job)
    }

    /// Current polling shape for a job id. Unknown ids yield the
    /// `not_found` shape rather than an error.
    pub async fn query_status(&self, id: JobId) -> Result<StatusView, StoreError> {
        Ok(match self.store.find(id).await? {
            Some(job) => StatusView::from_job(&job),
            None => StatusView::not_found(),
        })
    }

    /// Full job row lookup.
    pub async fn find_job(&self, id: JobId) -> Result<Option<ComicJob>, StoreError> {
        self.store.find(id).await
    }

    /// Completed jobs, newest first.
    pub async fn list_completed(
        &self,
        query: &ComicListQuery,
    ) -> Result<Vec<ComicJob>, StoreError> {
        self.store.list_completed(query).await
    }

    /// Number of jobs still generating.
    pub async fn in_flight(&self) -> usize {
        self.registry.in_flight().await
    }

    /// Ids of jobs still generating.
    pub async fn active_jobs(&self) -> Vec<JobId> {
        self.registry.active_jobs().await
    }
}
