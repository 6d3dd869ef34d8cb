//! Root-level `/health` endpoint.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// What `/health` reports.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `"ok"`, or `"degraded"` when the database probe fails.
    pub status: &'static str,
    /// Version baked in from Cargo.toml at compile time.
    pub version: &'static str,
    /// Result of a live round-trip against the pool.
    pub db_healthy: bool,
    /// Comics currently being generated.
    pub jobs_in_flight: usize,
}

/// GET /health. Always 200; degradation shows in the body so probes and
/// humans read the same signal.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = panelforge_db::health_check(&state.pool).await.is_ok();

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        jobs_in_flight: state.engine.in_flight().await,
    })
}

/// Lives at the root rather than under `/api/v1` so infrastructure can
/// probe it without knowing the API version.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
