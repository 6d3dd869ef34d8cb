//! Minimal repository over the `users` table.
//!
//! Signup and login are the only consumers, so this stays much smaller
//! than [`ComicRepo`](crate::repositories::ComicRepo): one insert and
//! one lookup.

use sqlx::PgPool;

use crate::models::user::{CreateUser, User};

/// Shared column list so both queries hydrate the same `User` shape.
const COLUMNS: &str = "id, email, password_hash, created_at, updated_at";

/// Access to user accounts. Stateless; the pool is passed per call.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new account row. A duplicate email trips the
    /// `uq_users_email` constraint and surfaces as a unique violation.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, password_hash) \
             VALUES ($1, $2) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.password_hash)
            .fetch_one(pool)
            .await
    }

    /// Look up an account by email, matched exactly as stored.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(pool)
            .await
    }
}
