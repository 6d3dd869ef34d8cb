//! Handlers for the `/comics` resource.
//!
//! Submission is open to anonymous callers; a valid Bearer token attributes
//! the job to the logged-in user. Generation itself happens in the
//! background, so submission returns 202 immediately and clients follow up
//! via the status endpoint.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use panelforge_core::error::CoreError;
use panelforge_core::request::GenerationRequest;
use panelforge_core::types::JobId;
use panelforge_db::models::comic::ComicListQuery;
use panelforge_pipeline::engine::StatusView;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::OptionalAuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Submit
// ---------------------------------------------------------------------------

/// POST /api/v1/comics
///
/// Submit a comic generation request. Returns 202 with the created job;
/// the story and images are produced by a background task. Poll
/// `GET /comics/{id}/status` to follow progress.
pub async fn submit_comic(
    user: OptionalAuthUser,
    State(state): State<AppState>,
    Json(input): Json<GenerationRequest>,
) -> AppResult<impl IntoResponse> {
    let created_by = user.0.map(|u| u.user_id);
    let job = state.engine.submit(input, created_by).await?;

    tracing::info!(
        job_id = %job.id,
        topic = %job.topic,
        panel_count = job.panel_count,
        created_by = ?job.created_by,
        "Comic generation accepted",
    );

    Ok((StatusCode::ACCEPTED, Json(DataResponse { data: job })))
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// GET /api/v1/comics/{id}/status
///
/// Poll generation progress. Always returns 200; an unknown id yields a
/// `not_found` status body rather than a 404, so pollers can treat every
/// outcome uniformly.
pub async fn comic_status(
    State(state): State<AppState>,
    Path(id): Path<JobId>,
) -> AppResult<Json<StatusView>> {
    let view = state.engine.query_status(id).await?;
    Ok(Json(view))
}

// ---------------------------------------------------------------------------
// Get
// ---------------------------------------------------------------------------

/// GET /api/v1/comics/{id}
///
/// Fetch the full comic job row, including the story and image payloads
/// once generation has produced them.
pub async fn get_comic(
    State(state): State<AppState>,
    Path(id): Path<JobId>,
) -> AppResult<impl IntoResponse> {
    let job = state
        .engine
        .find_job(id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Comic",
            id,
        }))?;

    Ok(Json(DataResponse { data: job }))
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

/// GET /api/v1/comics
///
/// Gallery listing: completed comics only, newest first. Supports optional
/// `limit` and `offset` query parameters.
pub async fn list_comics(
    State(state): State<AppState>,
    Query(params): Query<ComicListQuery>,
) -> AppResult<impl IntoResponse> {
    let comics = state.engine.list_completed(&params).await?;
    Ok(Json(DataResponse { data: comics }))
}
