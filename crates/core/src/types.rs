/// Comic jobs are keyed by UUID v7: time-ordered, globally unique, and
/// opaque to clients.
pub type JobId = uuid::Uuid;

/// Mint a fresh job id. UUID v7 embeds the creation instant, so ids sort
/// in submission order.
pub fn new_job_id() -> JobId {
    uuid::Uuid::now_v7()
}

/// User primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
