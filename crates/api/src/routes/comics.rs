//! Route definitions for the `/comics` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::comics;
use crate::state::AppState;

/// Routes mounted at `/comics`.
///
/// ```text
/// GET    /                -> list_comics
/// POST   /                -> submit_comic
/// GET    /{id}            -> get_comic
/// GET    /{id}/status     -> comic_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(comics::list_comics).post(comics::submit_comic))
        .route("/{id}", get(comics::get_comic))
        .route("/{id}/status", get(comics::comic_status))
}
