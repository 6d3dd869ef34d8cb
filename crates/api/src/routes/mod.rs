//! Route tree assembly.

pub mod auth;
pub mod comics;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Everything nested under `/api/v1`.
///
/// ```text
/// /auth/signup            create an account (public)
/// /auth/login             exchange credentials for a token (public)
///
/// /comics                 GET gallery of finished comics, POST new generation
/// /comics/{id}            GET full comic with story and panel urls
/// /comics/{id}/status     GET progress poll while generating
/// ```
///
/// Panel PNGs are not in this tree; `main.rs` serves them from
/// `/generated` at the root.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/comics", comics::router())
}
