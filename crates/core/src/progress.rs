//! Progress arithmetic and the human-readable step labels shown to pollers.
//!
//! Progress is a percentage with fixed milestones: 10 while the story is
//! being written, 30 when image synthesis begins, 100 on completion. The
//! image stage owns the 30..90 band and advances through it per panel.

/// Progress once the story stage has started.
pub const PROGRESS_STORY: i16 = 10;

/// Progress when the story is persisted and the image stage begins.
pub const PROGRESS_IMAGES: i16 = 30;

/// Progress of a finished job.
pub const PROGRESS_COMPLETE: i16 = 100;

/// Width of the band the image stage advances through.
const IMAGE_STAGE_SPAN: i16 = 60;

pub const STEP_STARTING: &str = "Starting...";
pub const STEP_STORY: &str = "Generating story...";
pub const STEP_IMAGES: &str = "Generating images...";
pub const STEP_COMPLETE: &str = "Complete!";

/// Step label while panel `panel_number` is being synthesized.
pub fn panel_step(panel_number: u32) -> String {
    format!("Generating Panel {panel_number}...")
}

/// Progress reported just before synthesizing the panel at `index`
/// (0-based) out of `total`, rounded to the nearest whole percent.
///
/// The sequence is strictly increasing for any fixed `total`, starts at
/// [`PROGRESS_IMAGES`], and stays below [`PROGRESS_COMPLETE`].
pub fn panel_progress(index: usize, total: usize) -> i16 {
    if total == 0 {
        return PROGRESS_IMAGES;
    }
    let fraction = index as f64 / total as f64;
    (f64::from(PROGRESS_IMAGES) + fraction * f64::from(IMAGE_STAGE_SPAN)).round() as i16
}
