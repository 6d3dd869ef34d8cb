//! The inbound generation request and its validation rules.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

fn default_genre() -> String {
    "adventure".to_string()
}

fn default_style() -> String {
    "cartoon".to_string()
}

fn default_panel_count() -> u32 {
    3
}

/// What a caller asks for: a topic plus styling knobs. Only `topic` is
/// mandatory; the other fields fall back to sensible defaults when omitted
/// from the request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub topic: String,
    #[serde(default = "default_genre")]
    pub genre: String,
    #[serde(default = "default_style")]
    pub style: String,
    #[serde(default = "default_panel_count")]
    pub panel_count: u32,
}

impl GenerationRequest {
    /// Reject requests that cannot produce a meaningful job. Runs before
    /// any job record is created.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.topic.trim().is_empty() {
            return Err(CoreError::Validation(
                "topic is required and must not be empty".to_string(),
            ));
        }
        if self.panel_count == 0 {
            return Err(CoreError::Validation(
                "panel_count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
