//! Story stage: one text-generation call, then best-effort extraction of
//! the structured story from the free-form response.

use std::sync::Arc;

use panelforge_core::prompt::story_prompt;
use panelforge_core::request::GenerationRequest;
use panelforge_core::story::{parse_story_response, Story, StoryParseError};
use panelforge_genai::error::GenAiError;
use panelforge_genai::traits::TextGenerator;

/// Why the stage produced no story. A soft failure: the orchestrator
/// turns it into a terminal `error` status and skips the image stage.
#[derive(Debug, thiserror::Error)]
pub enum StoryFailure {
    /// The collaborator call itself failed.
    #[error("text generation failed: {0}")]
    Generation(#[from] GenAiError),

    /// The response carried no parseable story.
    #[error("{0}")]
    Parse(#[from] StoryParseError),
}

/// Generates and parses the story for a job. Invokes the collaborator
/// exactly once; no retries.
pub struct StoryStage {
    text: Arc<dyn TextGenerator>,
}

impl StoryStage {
    pub fn new(text: Arc<dyn TextGenerator>) -> Self {
        Self { text }
    }

    pub async fn generate(&self, request: &GenerationRequest) -> Result<Story, StoryFailure> {
        let prompt = story_prompt(request);
        let raw = self.text.generate_text(&prompt).await?;
        let story = parse_story_response(&raw)?;

        tracing::debug!(
            scenes = story.scenes.len(),
            title = story.title.as_deref().unwrap_or("<untitled>"),
            "Parsed story"
        );
        Ok(story)
    }
}
