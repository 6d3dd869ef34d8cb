//! End-to-end pipeline tests over the in-memory store and scripted
//! collaborators: the full success path, stage failure paths, and the
//! per-panel fault isolation guarantees.

mod common;

use common::{
    request, story_response, test_engine, wait_for_terminal, ImageReply, InMemoryJobStore,
    ScriptedImages, ScriptedText, TextReply, PNG_STUB,
};
use panelforge_core::status::JobStatus;
use panelforge_core::story::ImageSet;
use panelforge_pipeline::engine::SubmitError;

// ---------------------------------------------------------------------------
// Test: full success path produces a completed job with ordered panels
// ---------------------------------------------------------------------------

#[tokio::test]
async fn three_panel_job_completes_with_ordered_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let store = InMemoryJobStore::new();
    let engine = test_engine(
        store.clone(),
        ScriptedText::with_story(story_response(3)),
        ScriptedImages::always_ok(),
        dir.path(),
    );

    let job = engine.submit(request("robot uprising", 3), None).await.unwrap();
    assert_eq!(job.status, "generating_story");
    assert_eq!(job.progress_percent, 0);
    assert_eq!(job.current_step, "Starting...");

    let done = wait_for_terminal(&store, job.id).await;
    assert_eq!(done.status, "completed");
    assert_eq!(done.progress_percent, 100);
    assert_eq!(done.current_step, "Complete!");
    assert!(done.completed_at.is_some());
    assert!(done.story.is_some());

    let images: ImageSet = serde_json::from_value(done.images.unwrap()).unwrap();
    assert_eq!(images.panels.len(), 3);
    let numbers: Vec<u32> = images.panels.iter().map(|p| p.panel_number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);

    for panel in &images.panels {
        assert!(panel.error.is_none());
        let file_name = panel.file_name.as_deref().unwrap();
        assert_eq!(file_name, format!("panel_{:02}.png", panel.panel_number));
        assert_eq!(
            panel.image_path.as_deref().unwrap(),
            format!("/generated/{}/{file_name}", job.id)
        );
    }

    // Artifacts really exist on disk under the per-job directory.
    for n in 1..=3 {
        let path = dir.path().join(job.id.to_string()).join(format!("panel_{n:02}.png"));
        assert_eq!(std::fs::read(&path).unwrap(), PNG_STUB);
    }
}

// ---------------------------------------------------------------------------
// Test: progress is non-decreasing and the image band steps 30/50/70
// ---------------------------------------------------------------------------

#[tokio::test]
async fn progress_never_decreases_and_steps_through_the_image_band() {
    let dir = tempfile::tempdir().unwrap();
    let store = InMemoryJobStore::new();
    let engine = test_engine(
        store.clone(),
        ScriptedText::with_story(story_response(3)),
        ScriptedImages::always_ok(),
        dir.path(),
    );

    let job = engine.submit(request("robot uprising", 3), None).await.unwrap();
    wait_for_terminal(&store, job.id).await;

    let progress = store.progress_history(job.id);
    assert!(
        progress.windows(2).all(|w| w[0] <= w[1]),
        "progress regressed: {progress:?}"
    );
    assert_eq!(*progress.last().unwrap(), 100);

    let panel_steps: Vec<i16> = store
        .history(job.id)
        .iter()
        .filter(|j| j.current_step.starts_with("Generating Panel"))
        .map(|j| j.progress_percent)
        .collect();
    assert_eq!(panel_steps, vec![30, 50, 70]);
}

// ---------------------------------------------------------------------------
// Test: the story is persisted together with the generating_images switch
// ---------------------------------------------------------------------------

#[tokio::test]
async fn story_is_persisted_when_the_image_stage_begins() {
    let dir = tempfile::tempdir().unwrap();
    let store = InMemoryJobStore::new();
    let engine = test_engine(
        store.clone(),
        ScriptedText::with_story(story_response(2)),
        ScriptedImages::always_ok(),
        dir.path(),
    );

    let job = engine.submit(request("robot uprising", 2), None).await.unwrap();
    wait_for_terminal(&store, job.id).await;

    let switch = store
        .history(job.id)
        .into_iter()
        .find(|j| j.status == "generating_images")
        .expect("job never entered generating_images");
    assert_eq!(switch.progress_percent, 30);
    assert_eq!(switch.current_step, "Generating images...");
    assert!(switch.story.is_some(), "story must land in the same update");
    assert!(switch.images.is_none());
}

// ---------------------------------------------------------------------------
// Test: unparseable story output ends the job without touching images
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unparseable_story_fails_the_job_before_images() {
    let dir = tempfile::tempdir().unwrap();
    let store = InMemoryJobStore::new();
    let engine = test_engine(
        store.clone(),
        ScriptedText::with_story("I'm sorry, I cannot write that story."),
        ScriptedImages::always_ok(),
        dir.path(),
    );

    let job = engine.submit(request("robot uprising", 3), None).await.unwrap();
    let done = wait_for_terminal(&store, job.id).await;

    assert_eq!(done.status, "error");
    assert!(done.story.is_none());
    assert!(done.images.is_none());
    let message = done.error_message.unwrap();
    assert!(message.starts_with("Failed to generate story"), "{message}");
    assert!(message.contains("no JSON object"), "{message}");

    // Progress stays where the story stage left it.
    assert_eq!(done.progress_percent, 10);
}

#[tokio::test]
async fn malformed_story_json_reports_a_distinct_reason() {
    let dir = tempfile::tempdir().unwrap();
    let store = InMemoryJobStore::new();
    let engine = test_engine(
        store.clone(),
        ScriptedText::with_story(r#"{"title": "broken", "scenes": }"#),
        ScriptedImages::always_ok(),
        dir.path(),
    );

    let job = engine.submit(request("robot uprising", 3), None).await.unwrap();
    let done = wait_for_terminal(&store, job.id).await;

    assert_eq!(done.status, "error");
    let message = done.error_message.unwrap();
    assert!(message.contains("malformed"), "{message}");
}

#[tokio::test]
async fn text_generation_outage_fails_the_job_with_its_reason() {
    let dir = tempfile::tempdir().unwrap();
    let store = InMemoryJobStore::new();
    let engine = test_engine(
        store.clone(),
        ScriptedText::new(vec![TextReply::Err("rate limited".to_string())]),
        ScriptedImages::always_ok(),
        dir.path(),
    );

    let job = engine.submit(request("robot uprising", 3), None).await.unwrap();
    let done = wait_for_terminal(&store, job.id).await;

    assert_eq!(done.status, "error");
    let message = done.error_message.unwrap();
    assert!(message.contains("text generation failed"), "{message}");
    assert!(message.contains("rate limited"), "{message}");
}

// ---------------------------------------------------------------------------
// Test: panel count follows the parsed story, not the request
// ---------------------------------------------------------------------------

#[tokio::test]
async fn panel_results_match_scene_count_even_when_it_differs_from_request() {
    let dir = tempfile::tempdir().unwrap();
    let store = InMemoryJobStore::new();
    let engine = test_engine(
        store.clone(),
        ScriptedText::with_story(story_response(5)),
        ScriptedImages::always_ok(),
        dir.path(),
    );

    let job = engine.submit(request("robot uprising", 3), None).await.unwrap();
    let done = wait_for_terminal(&store, job.id).await;

    assert_eq!(done.status, "completed");
    let images: ImageSet = serde_json::from_value(done.images.unwrap()).unwrap();
    assert_eq!(images.panels.len(), 5);
}

// ---------------------------------------------------------------------------
// Test: one failing panel never aborts the batch
// ---------------------------------------------------------------------------

#[tokio::test]
async fn failed_panel_is_isolated_and_the_batch_continues() {
    let dir = tempfile::tempdir().unwrap();
    let store = InMemoryJobStore::new();
    let engine = test_engine(
        store.clone(),
        ScriptedText::with_story(story_response(3)),
        ScriptedImages::new(vec![
            ImageReply::Ok,
            ImageReply::Err("content filtered".to_string()),
            ImageReply::Ok,
        ]),
        dir.path(),
    );

    let job = engine.submit(request("robot uprising", 3), None).await.unwrap();
    let done = wait_for_terminal(&store, job.id).await;

    // The job still completes; the failure lives in the panel entry.
    assert_eq!(done.status, "completed");

    let images: ImageSet = serde_json::from_value(done.images.unwrap()).unwrap();
    assert_eq!(images.panels.len(), 3);

    assert!(images.panels[0].error.is_none());
    assert!(images.panels[2].error.is_none());

    let failed = &images.panels[1];
    assert_eq!(failed.panel_number, 2);
    assert!(failed.error.as_deref().unwrap().contains("content filtered"));
    assert!(failed.file_name.is_none());
    assert!(failed.image_path.is_none());
    assert_eq!(failed.dialogue.as_deref(), Some("line 2"));
    assert!(failed.action.is_some());

    let job_dir = dir.path().join(job.id.to_string());
    assert!(job_dir.join("panel_01.png").exists());
    assert!(!job_dir.join("panel_02.png").exists());
    assert!(job_dir.join("panel_03.png").exists());
}

// ---------------------------------------------------------------------------
// Test: storage setup failure aborts the whole image stage
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unusable_assets_root_fails_the_batch() {
    // A file where the assets root should be makes create_dir_all fail.
    let blocker = tempfile::NamedTempFile::new().unwrap();
    let store = InMemoryJobStore::new();
    let engine = test_engine(
        store.clone(),
        ScriptedText::with_story(story_response(3)),
        ScriptedImages::always_ok(),
        blocker.path(),
    );

    let job = engine.submit(request("robot uprising", 3), None).await.unwrap();
    let done = wait_for_terminal(&store, job.id).await;

    assert_eq!(done.status, "error");
    assert!(done.images.is_none());
    let message = done.error_message.unwrap();
    assert!(message.starts_with("Failed to generate images"), "{message}");
}

// ---------------------------------------------------------------------------
// Test: a panicking task still reaches a terminal error status
// ---------------------------------------------------------------------------

#[tokio::test]
async fn panicking_generation_task_is_trapped_into_an_error_status() {
    let dir = tempfile::tempdir().unwrap();
    let store = InMemoryJobStore::new();
    let engine = test_engine(
        store.clone(),
        ScriptedText::new(vec![TextReply::Panic("wires crossed".to_string())]),
        ScriptedImages::always_ok(),
        dir.path(),
    );

    let job = engine.submit(request("robot uprising", 3), None).await.unwrap();
    let done = wait_for_terminal(&store, job.id).await;

    assert_eq!(done.status, "error");
    let message = done.error_message.unwrap();
    assert!(message.contains("panicked"), "{message}");
    assert!(message.contains("wires crossed"), "{message}");

    // The registry forgets the job once its supervisor finishes.
    for _ in 0..100 {
        if engine.in_flight().await == 0 {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    panic!("registry still reports in-flight jobs");
}

// ---------------------------------------------------------------------------
// Test: validation failures are synchronous and create nothing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn empty_topic_is_rejected_without_creating_a_job() {
    let dir = tempfile::tempdir().unwrap();
    let store = InMemoryJobStore::new();
    let engine = test_engine(
        store.clone(),
        ScriptedText::with_story(story_response(3)),
        ScriptedImages::always_ok(),
        dir.path(),
    );

    let result = engine.submit(request("   ", 3), None).await;
    assert!(matches!(result, Err(SubmitError::Validation(_))));
    assert_eq!(store.row_count(), 0);
}

#[tokio::test]
async fn zero_panel_count_is_rejected_without_creating_a_job() {
    let dir = tempfile::tempdir().unwrap();
    let store = InMemoryJobStore::new();
    let engine = test_engine(
        store.clone(),
        ScriptedText::with_story(story_response(3)),
        ScriptedImages::always_ok(),
        dir.path(),
    );

    let result = engine.submit(request("robot uprising", 0), None).await;
    assert!(matches!(result, Err(SubmitError::Validation(_))));
    assert_eq!(store.row_count(), 0);
}

// ---------------------------------------------------------------------------
// Test: the submitting user is recorded on the job row
// ---------------------------------------------------------------------------

#[tokio::test]
async fn submitting_user_is_recorded_as_owner() {
    let dir = tempfile::tempdir().unwrap();
    let store = InMemoryJobStore::new();
    let engine = test_engine(
        store.clone(),
        ScriptedText::with_story(story_response(1)),
        ScriptedImages::always_ok(),
        dir.path(),
    );

    let job = engine.submit(request("robot uprising", 1), Some(42)).await.unwrap();
    assert_eq!(job.created_by, Some(42));

    let anonymous = engine.submit(request("robot uprising", 1), None).await.unwrap();
    assert_eq!(anonymous.created_by, None);

    wait_for_terminal(&store, job.id).await;
    wait_for_terminal(&store, anonymous.id).await;
    assert_eq!(store.get(job.id).unwrap().created_by, Some(42));

    // Make sure JobStatus round-trips through the stored string.
    assert_eq!(
        store.get(job.id).unwrap().status(),
        Some(JobStatus::Completed)
    );
}
