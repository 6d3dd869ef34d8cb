use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, StatusCode};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use panelforge_genai::gemini::GeminiClient;
use panelforge_genai::stability::{ImageParams, StabilityClient};
use panelforge_pipeline::engine::GenerationEngine;
use panelforge_pipeline::images::PUBLIC_IMAGE_PREFIX;
use panelforge_pipeline::store::PgJobStore;

use panelforge_api::config::{engine_config_from_env, GenAiConfig, ServerConfig};
use panelforge_api::{routes, state};

use state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "panelforge_api=debug,panelforge_pipeline=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Configuration loaded");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = panelforge_db::create_pool(&database_url, config.db_max_connections)
        .await
        .expect("Could not connect to Postgres");
    tracing::info!("Database pool ready");

    panelforge_db::health_check(&pool)
        .await
        .expect("Database did not answer health check");

    panelforge_db::run_migrations(&pool)
        .await
        .expect("Could not apply database migrations");
    tracing::info!("Migrations up to date");

    // --- Generative service clients ---
    let genai = GenAiConfig::from_env();
    tracing::info!(
        model = %genai.gemini_model,
        engine = %genai.stability_engine,
        "Loaded generative service configuration",
    );

    let timeout = genai.request_timeout();
    let text_client = GeminiClient::new(
        genai.gemini_base_url,
        genai.gemini_api_key,
        genai.gemini_model,
        timeout,
    )
    .expect("Could not build text-generation client");

    let image_client = StabilityClient::new(
        genai.stability_base_url,
        genai.stability_api_key,
        genai.stability_engine,
        ImageParams::default(),
        timeout,
    )
    .expect("Could not build image-synthesis client");

    // --- Generation engine ---
    let engine_config = engine_config_from_env();
    let assets_root = engine_config.assets_root.clone();

    // Panels are written here; ServeDir exposes the same tree below.
    tokio::fs::create_dir_all(&assets_root)
        .await
        .expect("Could not create assets directory");

    let engine = Arc::new(GenerationEngine::new(
        Arc::new(PgJobStore::new(pool.clone())),
        Arc::new(text_client),
        Arc::new(image_client),
        engine_config,
    ));
    tracing::info!(assets_root = %assets_root.display(), "Generation engine started");

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        engine: Arc::clone(&engine),
    };

    let request_id_header = HeaderName::from_static("x-request-id");

    // --- Router ---
    // Layer order matters: axum applies them bottom-up, so the request id
    // is set before tracing records it and CORS wraps everything.
    let app = Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        // Finished panel PNGs, served straight off disk.
        .nest_service(PUBLIC_IMAGE_PREFIX, ServeDir::new(assets_root))
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(build_cors_layer(&config))
        .with_state(state);

    // --- Serve ---
    let addr = SocketAddr::new(
        config.host.parse().expect("HOST is not a valid IP address"),
        config.port,
    );
    tracing::info!(%addr, "Starting HTTP server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Could not bind listener");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Drain ---
    // The HTTP side is closed but spawned generation jobs may still be
    // mid-pipeline. Give them a bounded window to finish writing.
    tracing::info!("Server stopped accepting connections, draining generation jobs");

    let drained = tokio::time::timeout(
        Duration::from_secs(config.shutdown_timeout_secs),
        async {
            loop {
                let in_flight = engine.in_flight().await;
                if in_flight == 0 {
                    break;
                }
                tracing::info!(in_flight, "Waiting for generation jobs to finish");
                tokio::time::sleep(Duration::from_millis(500)).await;
            }
        },
    )
    .await;

    if drained.is_err() {
        let abandoned = engine.active_jobs().await;
        tracing::warn!(
            count = abandoned.len(),
            jobs = ?abandoned,
            "Shutdown timeout reached with generation jobs still running",
        );
    }

    tracing::info!("Shutdown complete");
}

/// Resolve when the process is told to stop.
///
/// Listens for SIGINT so Ctrl-C works at a terminal and, on Unix, for the
/// SIGTERM that container runtimes and service managers send.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Could not install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Could not install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("SIGINT received, shutting down");
        }
        () = terminate => {
            tracing::info!("SIGTERM received, shutting down");
        }
    }
}

/// CORS layer for the configured browser origins.
///
/// An unparseable origin panics here, at startup, rather than surfacing
/// as mystery CORS failures at request time.
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<_> = config
        .cors_origins
        .iter()
        .map(|origin| {
            origin
                .parse()
                .unwrap_or_else(|err| panic!("Invalid CORS origin '{origin}': {err}"))
        })
        .collect();

    // The comics API only ever reads and creates; no PUT/DELETE surface.
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}
