//! Story structures produced by the text-generation collaborator, and the
//! best-effort extraction of a structured story from its free-form output.
//!
//! The collaborator is asked for a JSON document but replies with prose
//! around it often enough (preambles, markdown fences, trailing notes) that
//! the response is scanned for the first balanced top-level JSON object
//! before parsing. Extraction failure is an expected, typed outcome — the
//! story stage converts it into a soft failure, never a crash.

use serde::{Deserialize, Serialize};

/// A parsed comic story. Only the scene list is required to be present;
/// every other field is optional because the collaborator may omit it, and
/// the pipeline renders absent fields as empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub characters: Vec<Character>,
    pub scenes: Vec<Scene>,
}

/// A character in the story. `role` is a free-text tag
/// (protagonist/antagonist/supporting), not an enforced enum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// The narrative description of one panel. `panel_number` is required —
/// it drives output ordering and artifact filenames, so a scene without
/// one makes the whole story unusable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub panel_number: u32,
    #[serde(default)]
    pub setting: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub dialogue: Option<String>,
    #[serde(default)]
    pub characters: Vec<String>,
    #[serde(default)]
    pub mood: Option<String>,
}

/// Outcome of generating one panel: either an artifact reference or an
/// error marker, plus the scene fields denormalized for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelResult {
    pub panel_number: u32,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(default)]
    pub dialogue: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub setting: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl PanelResult {
    /// Whether this panel carries an error marker instead of an artifact.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// The full image-stage output: the per-job artifact directory plus one
/// [`PanelResult`] per scene, in scene order. Failures appear as entries,
/// never as omissions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSet {
    pub folder: String,
    pub panels: Vec<PanelResult>,
}

/// Why a collaborator response could not be turned into a [`Story`].
#[derive(Debug, thiserror::Error)]
pub enum StoryParseError {
    /// The response contains no `{` at all.
    #[error("response contains no JSON object")]
    NoJsonObject,

    /// An object opens but never closes before the response ends.
    #[error("response contains an unterminated JSON object")]
    UnterminatedObject,

    /// The extracted substring is not valid JSON for a story.
    #[error("story JSON is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Extract the first balanced top-level JSON object from free-form text.
///
/// Scanning starts at the first `{` and tracks brace depth, honoring string
/// literals and backslash escapes so braces inside strings do not count.
/// Returns the object substring including both braces.
pub fn extract_json_object(raw: &str) -> Result<&str, StoryParseError> {
    let start = raw.find('{').ok_or(StoryParseError::NoJsonObject)?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in raw[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(&raw[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    Err(StoryParseError::UnterminatedObject)
}

/// Parse a text-generation response into a [`Story`].
///
/// Combines [`extract_json_object`] with JSON deserialization. Any failure
/// is reported as a typed [`StoryParseError`]; callers treat all variants
/// as the same soft "no story" outcome, differing only in the message.
pub fn parse_story_response(raw: &str) -> Result<Story, StoryParseError> {
    let object = extract_json_object(raw)?;
    Ok(serde_json::from_str(object)?)
}
