use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use panelforge_core::error::CoreError;
use panelforge_pipeline::engine::SubmitError;
use panelforge_pipeline::store::StoreError;
use serde_json::json;

/// Body text for every sanitized 500. Details are logged, never leaked.
const GENERIC_INTERNAL: &str = "An internal error occurred";

/// Error type returned by every handler.
///
/// Domain failures arrive as [`CoreError`]; pipeline and database failures
/// are converted on the way in. `IntoResponse` turns each variant into the
/// `{ "error": ..., "code": ... }` JSON body clients rely on.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Domain error bubbled up from `panelforge_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Anything that went wrong talking to PostgreSQL.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Malformed input caught at the HTTP layer itself.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Catch-all for failures the client can do nothing about.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Handler return alias.
pub type AppResult<T> = Result<T, AppError>;

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Database(e) => AppError::Database(e),
            StoreError::Serialization(e) => {
                AppError::InternalError(format!("Serialization error: {e}"))
            }
            StoreError::Unavailable(msg) => AppError::InternalError(msg),
        }
    }
}

impl From<SubmitError> for AppError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::Validation(core) => AppError::Core(core),
            SubmitError::Store(store) => store.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => domain_error_parts(core),
            AppError::Database(err) => db_error_parts(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Unhandled internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    GENERIC_INTERNAL.to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Status/code/message triple for each [`CoreError`] variant.
///
/// Validation, conflict, and unauthorized messages pass through verbatim;
/// internal details do not.
fn domain_error_parts(core: &CoreError) -> (StatusCode, &'static str, String) {
    match core {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Unrecoverable domain error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                GENERIC_INTERNAL.to_string(),
            )
        }
    }
}

/// Status/code/message triple for sqlx failures.
///
/// `RowNotFound` is a plain 404. A Postgres 23505 on one of our `uq_`
/// constraints means a duplicate insert and maps to 409. Everything else
/// gets logged and sanitized to a 500.
fn db_error_parts(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    if matches!(err, sqlx::Error::RowNotFound) {
        return (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        );
    }

    if let sqlx::Error::Database(db_err) = err {
        // 23505 is the Postgres code for unique_violation.
        if db_err.code().as_deref() == Some("23505") {
            let constraint = db_err.constraint().unwrap_or("unknown");
            if constraint.starts_with("uq_") {
                return (
                    StatusCode::CONFLICT,
                    "CONFLICT",
                    format!("Duplicate value violates unique constraint: {constraint}"),
                );
            }
        }
    }

    tracing::error!(error = %err, "Unexpected database failure");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        GENERIC_INTERNAL.to_string(),
    )
}
