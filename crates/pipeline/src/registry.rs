//! Tracks the detached orchestrator task of every in-flight job.
//!
//! Each launched job gets a worker task plus a supervisor that awaits it.
//! If the worker panics, the supervisor writes the terminal `error` status
//! the worker could not, so the "exactly one terminal status" guarantee
//! holds even across panics. The registry also answers which jobs are
//! still running, which the server logs at shutdown since in-flight jobs
//! do not survive a restart.

use std::collections::HashSet;
use std::sync::Arc;

use panelforge_core::types::JobId;
use panelforge_db::models::comic::ComicJob;
use tokio::sync::Mutex;

use crate::orchestrator::JobOrchestrator;
use crate::reporter::ProgressReporter;
use crate::store::JobStore;

/// Registry of in-flight generation tasks.
#[derive(Default)]
pub struct JobRegistry {
    active: Mutex<HashSet<JobId>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Launch a job's orchestrator as a supervised detached task and
    /// return immediately.
    pub async fn launch(
        self: &Arc<Self>,
        job: ComicJob,
        orchestrator: Arc<JobOrchestrator>,
        store: Arc<dyn JobStore>,
    ) {
        let job_id = job.id;
        self.active.lock().await.insert(job_id);

        let worker = tokio::spawn(async move { orchestrator.run(job).await });

        let registry = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(join_err) = worker.await {
                if join_err.is_panic() {
                    let message = panic_message(join_err.into_panic());
                    tracing::error!(job_id = %job_id, panic = %message, "Generation task panicked");

                    let reporter = ProgressReporter::new(store, job_id);
                    if let Err(e) = reporter
                        .failed(&format!("Generation task panicked: {message}"))
                        .await
                    {
                        tracing::error!(
                            job_id = %job_id,
                            error = %e,
                            "Failed to record panic as terminal error"
                        );
                    }
                }
            }
            registry.active.lock().await.remove(&job_id);
        });
    }

    /// Number of jobs whose tasks have not finished yet.
    pub async fn in_flight(&self) -> usize {
        self.active.lock().await.len()
    }

    /// Ids of jobs whose tasks have not finished yet.
    pub async fn active_jobs(&self) -> Vec<JobId> {
        self.active.lock().await.iter().copied().collect()
    }
}

/// Best-effort extraction of a readable message from a panic payload.
fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
