//! REST client for a Stability-style text-to-image API.
//!
//! Wraps the `/v1/generation/{engine}/text-to-image` endpoint. The service
//! returns generated images base64-encoded inside a JSON envelope; the
//! client decodes the first artifact into raw PNG bytes.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use serde::Deserialize;

use crate::error::{parse_response, GenAiError};
use crate::traits::ImageSynthesizer;

/// Public endpoint of the hosted service.
pub const DEFAULT_BASE_URL: &str = "https://api.stability.ai";

/// Engine used when none is configured.
pub const DEFAULT_ENGINE: &str = "stable-diffusion-xl-1024-v1-0";

/// Diffusion parameters sent with every synthesis request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageParams {
    pub cfg_scale: u32,
    pub width: u32,
    pub height: u32,
    pub samples: u32,
    pub steps: u32,
}

impl Default for ImageParams {
    fn default() -> Self {
        Self {
            cfg_scale: 7,
            width: 1024,
            height: 1024,
            samples: 1,
            steps: 30,
        }
    }
}

/// HTTP client for one diffusion engine.
pub struct StabilityClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    engine: String,
    params: ImageParams,
}

/// Response returned by the `text-to-image` endpoint.
#[derive(Debug, Deserialize)]
struct TextToImageResponse {
    #[serde(default)]
    artifacts: Vec<Artifact>,
}

#[derive(Debug, Deserialize)]
struct Artifact {
    base64: Option<String>,
}

impl StabilityClient {
    /// Create a client for one engine behind one API key.
    ///
    /// * `base_url` - API origin, e.g. [`DEFAULT_BASE_URL`].
    /// * `engine`   - engine id path segment, e.g. [`DEFAULT_ENGINE`].
    /// * `timeout`  - per-request bound covering connect through body read.
    pub fn new(
        base_url: String,
        api_key: String,
        engine: String,
        params: ImageParams,
        timeout: Duration,
    ) -> Result<Self, GenAiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            api_key,
            engine,
            params,
        })
    }

    /// Engine this client targets.
    pub fn engine(&self) -> &str {
        &self.engine
    }
}

#[async_trait]
impl ImageSynthesizer for StabilityClient {
    async fn synthesize(&self, prompt: &str) -> Result<Vec<u8>, GenAiError> {
        let body = serde_json::json!({
            "text_prompts": [{ "text": prompt, "weight": 1 }],
            "cfg_scale": self.params.cfg_scale,
            "height": self.params.height,
            "width": self.params.width,
            "samples": self.params.samples,
            "steps": self.params.steps,
        });

        tracing::debug!(
            engine = %self.engine,
            prompt_chars = prompt.len(),
            "Requesting image synthesis"
        );

        let response = self
            .client
            .post(format!(
                "{}/v1/generation/{}/text-to-image",
                self.base_url, self.engine
            ))
            .header("Accept", "application/json")
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let parsed: TextToImageResponse = parse_response(response).await?;
        first_artifact(parsed)
    }
}

/// Decode the first artifact of a synthesis response into raw bytes.
fn first_artifact(response: TextToImageResponse) -> Result<Vec<u8>, GenAiError> {
    let artifact = response.artifacts.into_iter().next().ok_or_else(|| {
        GenAiError::Response("no artifacts in synthesis response".to_string())
    })?;
    let encoded = artifact.base64.ok_or_else(|| {
        GenAiError::Response("artifact carried no image payload".to_string())
    })?;
    Ok(base64::engine::general_purpose::STANDARD.decode(encoded)?)
}
