//! Prompt construction for the two text-generation calls: the story
//! request and the per-panel image-prompt refinement.
//!
//! The story prompt embeds a JSON skeleton whose keys are the exact wire
//! contract [`crate::story::parse_story_response`] expects; change them
//! together or not at all.

use crate::request::GenerationRequest;
use crate::story::Scene;

/// Build the story-generation prompt for a request.
pub fn story_prompt(request: &GenerationRequest) -> String {
    format!(
        r#"
Create a {panels}-panel comic story based on the topic: "{topic}"

Requirements:
- Genre: {genre}
- Style: {style}
- Panels: {panels}

Please structure your response as a JSON object with the following format:

{{
  "title": "Comic Title",
  "summary": "Brief story summary",
  "characters": [
    {{
      "name": "Character Name",
      "description": "Character description",
      "role": "protagonist/antagonist/supporting"
    }}
  ],
  "scenes": [
    {{
      "panel_number": 1,
      "setting": "Description of the scene location",
      "action": "What's happening in this panel",
      "dialogue": "Character dialogue (if any)",
      "characters": ["Character names in this scene"],
      "mood": "Panel mood/tone"
    }}
  ]
}}

Make sure the story has:
1. A clear beginning, middle, and end
2. Engaging dialogue that fits the genre
3. Visual scenes that work well in comic format
4. Character development appropriate for the panel count
5. A satisfying conclusion
"#,
        panels = request.panel_count,
        topic = request.topic,
        genre = request.genre,
        style = request.style,
    )
}

/// Build the refinement prompt that turns one scene into a single-paragraph
/// image-synthesis prompt. Absent scene fields render as empty rather than
/// failing the panel.
pub fn panel_prompt(scene: &Scene, style: &str, genre: &str) -> String {
    let characters = if scene.characters.is_empty() {
        "None specified".to_string()
    } else {
        scene.characters.join(", ")
    };
    format!(
        r#"
Create a detailed image prompt optimized for Stability AI:

Panel {panel}:
- Setting: {setting}
- Action: {action}
- Characters: {characters}
- Mood: {mood}

Style: {style} comic book style
Genre: {genre}

Generate a single paragraph prompt with art style, character details, background, composition, lighting, and quality tags like "high quality", "detailed", "comic book art", "{style} style".
"#,
        panel = scene.panel_number,
        setting = scene.setting.as_deref().unwrap_or(""),
        action = scene.action.as_deref().unwrap_or(""),
        characters = characters,
        mood = scene.mood.as_deref().unwrap_or(""),
        style = style,
        genre = genre,
    )
}
