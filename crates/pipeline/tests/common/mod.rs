#![allow(dead_code)]

//! Shared test doubles: an in-memory job store and scripted collaborator
//! fakes, so the whole pipeline runs without a database or network.

use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use panelforge_core::progress::STEP_STARTING;
use panelforge_core::request::GenerationRequest;
use panelforge_core::status::JobStatus;
use panelforge_core::types::JobId;
use panelforge_db::models::comic::{ComicJob, ComicListQuery, JobPatch, NewComicJob};
use panelforge_genai::error::GenAiError;
use panelforge_genai::traits::{ImageSynthesizer, TextGenerator};
use panelforge_pipeline::engine::{EngineConfig, GenerationEngine};
use panelforge_pipeline::store::{JobStore, StoreError};

/// Stand-in for PNG bytes returned by the image fake.
pub const PNG_STUB: &[u8] = b"\x89PNG\r\n\x1a\nstub";

// ---------------------------------------------------------------------------
// In-memory job store
// ---------------------------------------------------------------------------

/// [`JobStore`] over a hash map, mirroring the merge semantics of the
/// SQL repository. Records a snapshot after every patch so tests can
/// assert on the exact sequence of observable states.
#[derive(Default)]
pub struct InMemoryJobStore {
    rows: Mutex<HashMap<JobId, ComicJob>>,
    snapshots: Mutex<HashMap<JobId, Vec<ComicJob>>>,
}

impl InMemoryJobStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Current row for a job, if any.
    pub fn get(&self, id: JobId) -> Option<ComicJob> {
        self.rows.lock().unwrap().get(&id).cloned()
    }

    /// Every state the row passed through, in patch order.
    pub fn history(&self, id: JobId) -> Vec<ComicJob> {
        self.snapshots.lock().unwrap().get(&id).cloned().unwrap_or_default()
    }

    /// Progress values in patch order.
    pub fn progress_history(&self, id: JobId) -> Vec<i16> {
        self.history(id).iter().map(|j| j.progress_percent).collect()
    }

    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn create(&self, input: &NewComicJob) -> Result<ComicJob, StoreError> {
        let now = Utc::now();
        let job = ComicJob {
            id: input.id,
            status: JobStatus::GeneratingStory.as_str().to_string(),
            progress_percent: 0,
            current_step: STEP_STARTING.to_string(),
            topic: input.topic.clone(),
            genre: input.genre.clone(),
            style: input.style.clone(),
            panel_count: input.panel_count,
            story: None,
            images: None,
            error_message: None,
            created_by: input.created_by,
            created_at: now,
            completed_at: None,
            updated_at: now,
        };
        self.rows.lock().unwrap().insert(input.id, job.clone());
        Ok(job)
    }

    async fn find(&self, id: JobId) -> Result<Option<ComicJob>, StoreError> {
        Ok(self.get(id))
    }

    async fn apply_patch(
        &self,
        id: JobId,
        patch: &JobPatch,
    ) -> Result<Option<ComicJob>, StoreError> {
        let mut rows = self.rows.lock().unwrap();
        let Some(job) = rows.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(status) = patch.status {
            job.status = status.as_str().to_string();
        }
        if let Some(percent) = patch.progress_percent {
            job.progress_percent = percent;
        }
        if let Some(step) = &patch.current_step {
            job.current_step = step.clone();
        }
        if let Some(story) = &patch.story {
            job.story = Some(story.clone());
        }
        if let Some(images) = &patch.images {
            job.images = Some(images.clone());
        }
        if let Some(error) = &patch.error_message {
            job.error_message = Some(error.clone());
        }
        if let Some(completed_at) = patch.completed_at {
            job.completed_at = Some(completed_at);
        }
        job.updated_at = Utc::now();

        let snapshot = job.clone();
        drop(rows);
        self.snapshots
            .lock()
            .unwrap()
            .entry(id)
            .or_default()
            .push(snapshot.clone());
        Ok(Some(snapshot))
    }

    async fn list_completed(&self, query: &ComicListQuery) -> Result<Vec<ComicJob>, StoreError> {
        let mut completed: Vec<ComicJob> = self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|j| j.status == JobStatus::Completed.as_str())
            .cloned()
            .collect();
        completed.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let offset = query.offset.unwrap_or(0).max(0) as usize;
        let limit = query.limit.unwrap_or(50).max(0) as usize;
        Ok(completed.into_iter().skip(offset).take(limit).collect())
    }
}

// ---------------------------------------------------------------------------
// Scripted collaborators
// ---------------------------------------------------------------------------

/// One scripted reply from the text-generation fake.
pub enum TextReply {
    Ok(String),
    Err(String),
    Panic(String),
}

/// [`TextGenerator`] that plays back a script, then keeps answering with a
/// fixed refinement prompt once the script is exhausted.
pub struct ScriptedText {
    script: Mutex<VecDeque<TextReply>>,
}

impl ScriptedText {
    pub fn new(script: Vec<TextReply>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
        })
    }

    /// First call returns `story`, every later call a refinement prompt.
    pub fn with_story(story: impl Into<String>) -> Arc<Self> {
        Self::new(vec![TextReply::Ok(story.into())])
    }
}

#[async_trait]
impl TextGenerator for ScriptedText {
    async fn generate_text(&self, _prompt: &str) -> Result<String, GenAiError> {
        match self.script.lock().unwrap().pop_front() {
            Some(TextReply::Ok(text)) => Ok(text),
            Some(TextReply::Err(msg)) => Err(GenAiError::Response(msg)),
            Some(TextReply::Panic(msg)) => panic!("{msg}"),
            None => Ok("a detailed panel prompt".to_string()),
        }
    }
}

/// One scripted outcome from the image-synthesis fake.
pub enum ImageReply {
    Ok,
    Err(String),
}

/// [`ImageSynthesizer`] that plays back a script, then keeps succeeding
/// with [`PNG_STUB`] once the script is exhausted.
pub struct ScriptedImages {
    script: Mutex<VecDeque<ImageReply>>,
}

impl ScriptedImages {
    pub fn new(script: Vec<ImageReply>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
        })
    }

    pub fn always_ok() -> Arc<Self> {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl ImageSynthesizer for ScriptedImages {
    async fn synthesize(&self, _prompt: &str) -> Result<Vec<u8>, GenAiError> {
        match self.script.lock().unwrap().pop_front() {
            Some(ImageReply::Ok) | None => Ok(PNG_STUB.to_vec()),
            Some(ImageReply::Err(msg)) => Err(GenAiError::Response(msg)),
        }
    }
}

// ---------------------------------------------------------------------------
// Builders and helpers
// ---------------------------------------------------------------------------

/// Engine over the fakes with a zero inter-panel delay.
pub fn test_engine(
    store: Arc<InMemoryJobStore>,
    text: Arc<ScriptedText>,
    image: Arc<ScriptedImages>,
    assets_root: &Path,
) -> GenerationEngine {
    GenerationEngine::new(
        store,
        text,
        image,
        EngineConfig {
            assets_root: assets_root.to_path_buf(),
            panel_delay: Duration::ZERO,
        },
    )
}

pub fn request(topic: &str, panel_count: u32) -> GenerationRequest {
    GenerationRequest {
        topic: topic.to_string(),
        genre: "sci-fi".to_string(),
        style: "noir".to_string(),
        panel_count,
    }
}

/// A collaborator response embedding a valid story with `scenes` scenes,
/// wrapped in the prose a real model produces.
pub fn story_response(scenes: usize) -> String {
    let scene_objs: Vec<serde_json::Value> = (1..=scenes)
        .map(|n| {
            serde_json::json!({
                "panel_number": n,
                "setting": format!("setting {n}"),
                "action": format!("action {n}"),
                "dialogue": format!("line {n}"),
                "characters": ["R-7"],
                "mood": "tense"
            })
        })
        .collect();
    let story = serde_json::json!({
        "title": "Test Comic",
        "summary": "A test story.",
        "characters": [
            {"name": "R-7", "description": "a tired robot", "role": "protagonist"}
        ],
        "scenes": scene_objs
    });
    format!("Here is your story:\n```json\n{story}\n```\nEnjoy!")
}

/// Poll the store until the job reaches a terminal status.
pub async fn wait_for_terminal(store: &InMemoryJobStore, id: JobId) -> ComicJob {
    for _ in 0..200 {
        if let Some(job) = store.get(id) {
            if matches!(job.status(), Some(s) if s.is_terminal()) {
                return job;
            }
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job {id} did not reach a terminal status in time");
}
