use std::sync::Arc;

use panelforge_pipeline::engine::GenerationEngine;

use crate::config::ServerConfig;

/// Everything handlers need, threaded through Axum as `State<AppState>`.
///
/// Cloned per request, so each field is either `Arc`-wrapped or already a
/// cheap handle (the sqlx pool clones by reference count).
#[derive(Clone)]
pub struct AppState {
    /// Postgres connection pool.
    pub pool: panelforge_db::DbPool,
    /// Server settings, including the JWT config the extractors read.
    pub config: Arc<ServerConfig>,
    /// Entry point for submitting and tracking comic generation jobs.
    pub engine: Arc<GenerationEngine>,
}
