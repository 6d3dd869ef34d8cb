//! Job lifecycle status.
//!
//! The `comics.status` column stores the lowercase string form; rows carry
//! the raw string and compare against these constants. The string values
//! are part of the polling contract and must not change.

/// Lifecycle status of a comic generation job.
///
/// `generating_story → generating_images → {completed | error}`. A freshly
/// created job sits in `GeneratingStory` at progress 0 until the
/// orchestrator's first transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    GeneratingStory,
    GeneratingImages,
    Completed,
    Error,
}

impl JobStatus {
    /// The database / wire string for this status.
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::GeneratingStory => "generating_story",
            JobStatus::GeneratingImages => "generating_images",
            JobStatus::Completed => "completed",
            JobStatus::Error => "error",
        }
    }

    /// Parse a stored status string. Returns `None` for unknown values.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "generating_story" => Some(JobStatus::GeneratingStory),
            "generating_images" => Some(JobStatus::GeneratingImages),
            "completed" => Some(JobStatus::Completed),
            "error" => Some(JobStatus::Error),
            _ => None,
        }
    }

    /// Whether this status admits no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Error)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
