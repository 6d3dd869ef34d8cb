//! Bearer-token extractors.
//!
//! Two flavours: [`AuthUser`] rejects the request outright when credentials
//! are missing or bad, [`OptionalAuthUser`] lets anonymous callers through.
//! Comic submission uses the optional one so galleries can attribute work
//! without forcing signup.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use panelforge_core::error::CoreError;
use panelforge_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// The caller's identity, proven by a valid `Authorization: Bearer` token.
///
/// Add it as a handler parameter to require login:
///
/// ```ignore
/// async fn delete_comic(user: AuthUser, Path(id): Path<JobId>) -> AppResult<StatusCode> {
///     // user.user_id is claims.sub, already signature-checked
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Database id of the logged-in account.
    pub user_id: DbId,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| unauthorized("Missing Authorization header"))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| unauthorized("Authorization header must be of the form: Bearer <token>"))?;

        let claims = validate_token(token, &state.config.jwt)
            .map_err(|_| unauthorized("Token is invalid or expired"))?;

        Ok(AuthUser {
            user_id: claims.sub,
        })
    }
}

/// Like [`AuthUser`], but an absent `Authorization` header yields `None`
/// instead of a 401.
///
/// A header that is present but bad is still rejected; a caller offering
/// credentials is never silently downgraded to anonymous.
#[derive(Debug, Clone)]
pub struct OptionalAuthUser(pub Option<AuthUser>);

impl FromRequestParts<AppState> for OptionalAuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if !parts.headers.contains_key(AUTHORIZATION) {
            return Ok(OptionalAuthUser(None));
        }

        let user = AuthUser::from_request_parts(parts, state).await?;
        Ok(OptionalAuthUser(Some(user)))
    }
}

fn unauthorized(msg: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(msg.to_string()))
}
