//! The background generation pipeline: a three-stage state machine that
//! drives each comic job from intake to a terminal status.
//!
//! `generating_story -> generating_images -> {completed | error}`
//!
//! [`engine::GenerationEngine`] is the public surface: it validates and
//! admits requests, launches one supervised orchestrator task per job, and
//! answers polling queries from persisted state. Stages talk to the
//! outside world only through the [`store::JobStore`] seam and the
//! collaborator traits from `panelforge_genai`, so the whole pipeline runs
//! against in-memory fakes in tests.

pub mod engine;
pub mod images;
pub mod orchestrator;
pub mod registry;
pub mod reporter;
pub mod store;
pub mod story;
