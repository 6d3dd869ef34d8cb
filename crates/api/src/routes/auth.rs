//! `/auth` routes: account creation and login.

use axum::routing::post;
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Mounted at `/auth`. Both endpoints are public by definition; a caller
/// without an account has nothing to authenticate with yet.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
}
