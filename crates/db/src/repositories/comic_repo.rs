//! Repository for the `comics` table.
//!
//! Status literals always go through [`JobStatus`]; no raw status strings
//! appear in queries.

use panelforge_core::progress::STEP_STARTING;
use panelforge_core::status::JobStatus;
use panelforge_core::types::JobId;
use sqlx::PgPool;

use crate::models::comic::{ComicJob, ComicListQuery, JobPatch, NewComicJob};

/// Column list for `comics` queries.
const COLUMNS: &str = "\
    id, status, progress_percent, current_step, \
    topic, genre, style, panel_count, \
    story, images, error_message, created_by, \
    created_at, completed_at, updated_at";

/// Maximum page size for gallery listing.
const MAX_LIMIT: i64 = 100;

/// Default page size for gallery listing.
const DEFAULT_LIMIT: i64 = 50;

/// Provides CRUD operations for comic generation jobs.
pub struct ComicRepo;

impl ComicRepo {
    /// Insert a fresh job row in its initial state: `generating_story`,
    /// progress 0, step "Starting...".
    pub async fn create(pool: &PgPool, input: &NewComicJob) -> Result<ComicJob, sqlx::Error> {
        let query = format!(
            "INSERT INTO comics \
                 (id, status, progress_percent, current_step, \
                  topic, genre, style, panel_count, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ComicJob>(&query)
            .bind(input.id)
            .bind(JobStatus::GeneratingStory.as_str())
            .bind(0i16)
            .bind(STEP_STARTING)
            .bind(&input.topic)
            .bind(&input.genre)
            .bind(&input.style)
            .bind(input.panel_count)
            .bind(input.created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a job by its ID.
    pub async fn find_by_id(pool: &PgPool, id: JobId) -> Result<Option<ComicJob>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM comics WHERE id = $1");
        sqlx::query_as::<_, ComicJob>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List completed jobs, newest first, with pagination.
    pub async fn list_completed(
        pool: &PgPool,
        params: &ComicListQuery,
    ) -> Result<Vec<ComicJob>, sqlx::Error> {
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
        let offset = params.offset.unwrap_or(0);

        let query = format!(
            "SELECT {COLUMNS} FROM comics \
             WHERE status = $1 \
             ORDER BY created_at DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, ComicJob>(&query)
            .bind(JobStatus::Completed.as_str())
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Apply a partial update, returning the updated row.
    ///
    /// Returns `None` if no row with the given `id` exists. Bind order
    /// must match the clause order from [`patch_set_clauses`].
    pub async fn apply_patch(
        pool: &PgPool,
        id: JobId,
        patch: &JobPatch,
    ) -> Result<Option<ComicJob>, sqlx::Error> {
        let sets = patch_set_clauses(patch);
        let query = format!(
            "UPDATE comics SET {} WHERE id = $1 RETURNING {COLUMNS}",
            sets.join(", ")
        );

        let mut q = sqlx::query_as::<_, ComicJob>(&query).bind(id);
        if let Some(status) = patch.status {
            q = q.bind(status.as_str());
        }
        if let Some(percent) = patch.progress_percent {
            q = q.bind(percent);
        }
        if let Some(step) = &patch.current_step {
            q = q.bind(step);
        }
        if let Some(story) = &patch.story {
            q = q.bind(story);
        }
        if let Some(images) = &patch.images {
            q = q.bind(images);
        }
        if let Some(error) = &patch.error_message {
            q = q.bind(error);
        }
        if let Some(completed_at) = patch.completed_at {
            q = q.bind(completed_at);
        }

        q.fetch_optional(pool).await
    }
}

/// Build the SET clauses for a patch, assigning bind indexes in field
/// order starting at `$2` (`$1` is the job id). `updated_at` is always
/// touched so pollers see movement.
fn patch_set_clauses(patch: &JobPatch) -> Vec<String> {
    let fields = [
        ("status", patch.status.is_some()),
        ("progress_percent", patch.progress_percent.is_some()),
        ("current_step", patch.current_step.is_some()),
        ("story", patch.story.is_some()),
        ("images", patch.images.is_some()),
        ("error_message", patch.error_message.is_some()),
        ("completed_at", patch.completed_at.is_some()),
    ];

    let mut sets: Vec<String> = Vec::new();
    let mut bind_idx: u32 = 2;
    for (column, present) in fields {
        if present {
            sets.push(format!("{column} = ${bind_idx}"));
            bind_idx += 1;
        }
    }
    sets.push("updated_at = NOW()".to_string());
    sets
}
