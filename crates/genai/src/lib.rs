//! REST clients for the external generative services: a Gemini-style
//! text-generation API and a Stability-style image-synthesis API.
//!
//! The pipeline depends only on the [`traits::TextGenerator`] and
//! [`traits::ImageSynthesizer`] seams, so tests substitute scripted fakes
//! and production wires in [`gemini::GeminiClient`] and
//! [`stability::StabilityClient`].

pub mod error;
pub mod gemini;
pub mod stability;
pub mod traits;

/// Default per-request timeout applied to both clients, in seconds.
/// Generation calls are slow; this bounds them without racing them.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
