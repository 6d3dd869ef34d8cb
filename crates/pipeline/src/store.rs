//! Persistence seam for the pipeline.
//!
//! The orchestrator and stages never touch `sqlx` directly; they go
//! through [`JobStore`] so tests can substitute an in-memory store.
//! [`PgJobStore`] is the production implementation backed by
//! [`ComicRepo`].

use async_trait::async_trait;
use panelforge_core::types::JobId;
use panelforge_db::models::comic::{ComicJob, ComicListQuery, JobPatch, NewComicJob};
use panelforge_db::repositories::comic_repo::ComicRepo;
use panelforge_db::DbPool;

/// Errors surfaced by a job store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The underlying database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A pipeline value could not be serialized for storage.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The store rejected the operation for a non-database reason.
    /// Produced only by test doubles.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Job record persistence as the pipeline sees it.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Insert a fresh job row in its initial state.
    async fn create(&self, input: &NewComicJob) -> Result<ComicJob, StoreError>;

    /// Fetch a job by id.
    async fn find(&self, id: JobId) -> Result<Option<ComicJob>, StoreError>;

    /// Merge non-`None` patch fields into the row. Returns the updated
    /// row, or `None` if the id does not exist.
    async fn apply_patch(&self, id: JobId, patch: &JobPatch)
        -> Result<Option<ComicJob>, StoreError>;

    /// Completed jobs, newest first.
    async fn list_completed(&self, query: &ComicListQuery) -> Result<Vec<ComicJob>, StoreError>;
}

/// Production [`JobStore`] over a PostgreSQL pool.
pub struct PgJobStore {
    pool: DbPool,
}

impl PgJobStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn create(&self, input: &NewComicJob) -> Result<ComicJob, StoreError> {
        Ok(ComicRepo::create(&self.pool, input).await?)
    }

    async fn find(&self, id: JobId) -> Result<Option<ComicJob>, StoreError> {
        Ok(ComicRepo::find_by_id(&self.pool, id).await?)
    }

    async fn apply_patch(
        &self,
        id: JobId,
        patch: &JobPatch,
    ) -> Result<Option<ComicJob>, StoreError> {
        Ok(ComicRepo::apply_patch(&self.pool, id, patch).await?)
    }

    async fn list_completed(&self, query: &ComicListQuery) -> Result<Vec<ComicJob>, StoreError> {
        Ok(ComicRepo::list_completed(&self.pool, query).await?)
    }
}
