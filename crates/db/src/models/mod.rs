//! Entity models and DTOs, one module per table.

pub mod comic;
pub mod user;
