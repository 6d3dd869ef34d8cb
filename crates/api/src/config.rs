use std::path::PathBuf;
use std::time::Duration;

use panelforge_genai::{gemini, stability, DEFAULT_TIMEOUT_SECS};
use panelforge_pipeline::engine::{EngineConfig, DEFAULT_PANEL_DELAY_MS};

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long shutdown waits for in-flight generation jobs (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Maximum database pool connections (default: `5`).
    pub db_max_connections: u32,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                    |
    /// |----------------------------|----------------------------|
    /// | `HOST`                     | `0.0.0.0`                  |
    /// | `PORT`                     | `3000`                     |
    /// | `CORS_ORIGINS`             | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`    | `30`                       |
    /// | `DATABASE_MAX_CONNECTIONS` | `5`                        |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let db_max_connections: u32 = std::env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".into())
            .parse()
            .expect("DATABASE_MAX_CONNECTIONS must be a valid u32");

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            db_max_connections,
            jwt,
        }
    }
}

/// Credentials and endpoints for the generative services.
#[derive(Debug, Clone)]
pub struct GenAiConfig {
    /// API key for the text-generation service.
    pub gemini_api_key: String,
    /// Base URL for the text-generation service.
    pub gemini_base_url: String,
    /// Text model name.
    pub gemini_model: String,
    /// API key for the image-synthesis service.
    pub stability_api_key: String,
    /// Base URL for the image-synthesis service.
    pub stability_base_url: String,
    /// Diffusion engine identifier.
    pub stability_engine: String,
    /// Per-request timeout for both services, in seconds.
    pub request_timeout_secs: u64,
}

impl GenAiConfig {
    /// Load generative-service configuration from environment variables.
    ///
    /// | Env Var              | Required | Default                        |
    /// |----------------------|----------|--------------------------------|
    /// | `GEMINI_API_KEY`     | **yes**  | --                             |
    /// | `GEMINI_BASE_URL`    | no       | the public Gemini endpoint     |
    /// | `GEMINI_MODEL`       | no       | `gemini-2.5-flash`             |
    /// | `STABILITY_API_KEY`  | **yes**  | --                             |
    /// | `STABILITY_BASE_URL` | no       | the public Stability endpoint  |
    /// | `STABILITY_ENGINE`   | no       | `stable-diffusion-xl-1024-v1-0`|
    /// | `GENAI_TIMEOUT_SECS` | no       | `120`                          |
    ///
    /// # Panics
    ///
    /// Panics if either API key is not set.
    pub fn from_env() -> Self {
        let gemini_api_key =
            std::env::var("GEMINI_API_KEY").expect("GEMINI_API_KEY must be set in the environment");

        let gemini_base_url = std::env::var("GEMINI_BASE_URL")
            .unwrap_or_else(|_| gemini::DEFAULT_BASE_URL.to_string());

        let gemini_model =
            std::env::var("GEMINI_MODEL").unwrap_or_else(|_| gemini::DEFAULT_MODEL.to_string());

        let stability_api_key = std::env::var("STABILITY_API_KEY")
            .expect("STABILITY_API_KEY must be set in the environment");

        let stability_base_url = std::env::var("STABILITY_BASE_URL")
            .unwrap_or_else(|_| stability::DEFAULT_BASE_URL.to_string());

        let stability_engine = std::env::var("STABILITY_ENGINE")
            .unwrap_or_else(|_| stability::DEFAULT_ENGINE.to_string());

        let request_timeout_secs: u64 = std::env::var("GENAI_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
            .parse()
            .expect("GENAI_TIMEOUT_SECS must be a valid u64");

        Self {
            gemini_api_key,
            gemini_base_url,
            gemini_model,
            stability_api_key,
            stability_base_url,
            stability_engine,
            request_timeout_secs,
        }
    }

    /// Per-request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Build the pipeline engine configuration from environment variables.
///
/// | Env Var          | Default     |
/// |------------------|-------------|
/// | `ASSETS_ROOT`    | `generated` |
/// | `PANEL_DELAY_MS` | `1000`      |
pub fn engine_config_from_env() -> EngineConfig {
    let assets_root: PathBuf = std::env::var("ASSETS_ROOT")
        .unwrap_or_else(|_| "generated".into())
        .into();

    let panel_delay_ms: u64 = std::env::var("PANEL_DELAY_MS")
        .unwrap_or_else(|_| DEFAULT_PANEL_DELAY_MS.to_string())
        .parse()
        .expect("PANEL_DELAY_MS must be a valid u64");

    EngineConfig {
        assets_root,
        panel_delay: Duration::from_millis(panel_delay_ms),
    }
}
