//! Domain types and pure logic for the comic generation pipeline.
//!
//! Nothing in this crate performs I/O. The background pipeline, the
//! persistence layer, and the HTTP surface all build on the types and
//! functions defined here.

pub mod error;
pub mod progress;
pub mod prompt;
pub mod request;
pub mod status;
pub mod story;
pub mod types;
