//! Comic job entity model and DTOs.

use panelforge_core::status::JobStatus;
use panelforge_core::types::{DbId, JobId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `comics` table.
///
/// `status` is stored as its wire string ([`JobStatus::as_str`]); `story`
/// and `images` hold the serialized pipeline outputs and stay `NULL` until
/// the corresponding stage persists them.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ComicJob {
    pub id: JobId,
    pub status: String,
    pub progress_percent: i16,
    pub current_step: String,
    pub topic: String,
    pub genre: String,
    pub style: String,
    pub panel_count: i32,
    pub story: Option<serde_json::Value>,
    pub images: Option<serde_json::Value>,
    pub error_message: Option<String>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub completed_at: Option<Timestamp>,
    pub updated_at: Timestamp,
}

impl ComicJob {
    /// Parsed status, when the stored string is one of the known values.
    pub fn status(&self) -> Option<JobStatus> {
        JobStatus::parse(&self.status)
    }
}

/// Input for creating a job row. Built by request intake, never
/// deserialized from a client directly.
#[derive(Debug, Clone)]
pub struct NewComicJob {
    pub id: JobId,
    pub topic: String,
    pub genre: String,
    pub style: String,
    pub panel_count: i32,
    pub created_by: Option<DbId>,
}

/// Partial update for a job row. Only non-`None` fields are written;
/// applying an all-`None` patch touches nothing but `updated_at`.
#[derive(Debug, Clone, Default)]
pub struct JobPatch {
    pub status: Option<JobStatus>,
    pub progress_percent: Option<i16>,
    pub current_step: Option<String>,
    pub story: Option<serde_json::Value>,
    pub images: Option<serde_json::Value>,
    pub error_message: Option<String>,
    pub completed_at: Option<Timestamp>,
}

/// Query parameters for the completed-comics gallery listing.
#[derive(Debug, Default, Deserialize)]
pub struct ComicListQuery {
    /// Maximum number of results. Defaults to 50, capped at 100.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}
