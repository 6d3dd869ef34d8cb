//! Repositories, one per table. All operations take the pool as their
//! first argument and return `sqlx::Error` untranslated; error mapping
//! happens at the API boundary.

pub mod comic_repo;
pub mod user_repo;

pub use comic_repo::ComicRepo;
pub use user_repo::UserRepo;
