//! REST client for a Gemini-style text-generation API.
//!
//! Wraps the `models/{model}:generateContent` endpoint using [`reqwest`].
//! The response schema is tolerated loosely: every field the service might
//! omit is optional, and the client only insists on ending up with some
//! non-empty text.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{parse_response, GenAiError};
use crate::traits::TextGenerator;

/// Public endpoint of the hosted service.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// HTTP client for one text-generation model.
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

/// Response returned by the `generateContent` endpoint.
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    text: Option<String>,
}

impl GeminiClient {
    /// Create a client for one model behind one API key.
    ///
    /// * `base_url` - API origin, e.g. [`DEFAULT_BASE_URL`].
    /// * `timeout`  - per-request bound covering connect through body read.
    pub fn new(
        base_url: String,
        api_key: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, GenAiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            api_key,
            model,
        })
    }

    /// Model this client targets.
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate_text(&self, prompt: &str) -> Result<String, GenAiError> {
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });

        tracing::debug!(
            model = %self.model,
            prompt_chars = prompt.len(),
            "Requesting text generation"
        );

        let response = self
            .client
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.base_url, self.model
            ))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let parsed: GenerateContentResponse = parse_response(response).await?;
        extract_text(parsed)
    }
}

/// Pull the text out of the first candidate, concatenating its parts.
fn extract_text(response: GenerateContentResponse) -> Result<String, GenAiError> {
    let candidate = response.candidates.into_iter().next().ok_or_else(|| {
        GenAiError::Response("no candidates in generation response".to_string())
    })?;
    let parts = candidate.content.map(|c| c.parts).unwrap_or_default();
    let text: String = parts.into_iter().filter_map(|p| p.text).collect();
    if text.is_empty() {
        return Err(GenAiError::Response(
            "candidate contained no text parts".to_string(),
        ));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn extracts_text_from_a_typical_response() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{
                "candidates": [
                    {"content": {"parts": [{"text": "Once upon"}, {"text": " a time"}], "role": "model"}}
                ],
                "modelVersion": "gemini-2.5-flash"
            }"#,
        )
        .unwrap();
        assert_eq!(extract_text(response).unwrap(), "Once upon a time");
    }

    #[test]
    fn empty_candidate_list_is_a_response_error() {
        let response: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert_matches!(extract_text(response), Err(GenAiError::Response(_)));
    }

    #[test]
    fn candidate_without_text_is_a_response_error() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"inlineData": {}}]}}]}"#,
        )
        .unwrap();
        assert_matches!(extract_text(response), Err(GenAiError::Response(_)));
    }
}
