//! The seams between the pipeline and the generative services.
//!
//! Both traits are object-safe; the orchestrator holds them as
//! `Arc<dyn TextGenerator>` / `Arc<dyn ImageSynthesizer>` so tests can
//! swap in scripted implementations.

use async_trait::async_trait;

use crate::error::GenAiError;

/// Produces free-form text from a prompt. Used for both story generation
/// and per-panel prompt refinement.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate_text(&self, prompt: &str) -> Result<String, GenAiError>;
}

/// Produces one image (encoded bytes, typically PNG) from a descriptive
/// prompt.
#[async_trait]
pub trait ImageSynthesizer: Send + Sync {
    async fn synthesize(&self, prompt: &str) -> Result<Vec<u8>, GenAiError>;
}
