//! Bearer-token issuing and checking for the comics API.
//!
//! A single HS256-signed access token per login, no refresh flow: when the
//! token lapses the client simply logs in again. Claims carry only what
//! the middleware needs to attribute a request to an account.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use panelforge_core::types::DbId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payload signed into every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// The account's database id.
    pub sub: DbId,
    /// Expiry as a UTC Unix timestamp. Checked by `jsonwebtoken` on decode.
    pub exp: i64,
    /// Issue time as a UTC Unix timestamp.
    pub iat: i64,
    /// Random per-token id (UUID v4), handy when auditing logs.
    pub jti: String,
}

/// Signing secret plus token lifetime.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 key material, shared between issue and verify.
    pub secret: String,
    /// How long issued tokens stay valid, in hours.
    pub token_expiry_hours: i64,
}

const DEFAULT_EXPIRY_HOURS: i64 = 24;

impl JwtConfig {
    /// Read JWT settings from the environment.
    ///
    /// | Env Var            | Required | Default |
    /// |--------------------|----------|---------|
    /// | `JWT_SECRET`       | **yes**  | --      |
    /// | `JWT_EXPIRY_HOURS` | no       | `24`    |
    ///
    /// # Panics
    ///
    /// Panics when `JWT_SECRET` is missing or empty, or when
    /// `JWT_EXPIRY_HOURS` is set but not a number. Both are deployment
    /// mistakes that should stop the process at startup.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").expect("JWT_SECRET is required");
        assert!(!secret.is_empty(), "JWT_SECRET is empty");

        let token_expiry_hours: i64 = std::env::var("JWT_EXPIRY_HOURS")
            .unwrap_or_else(|_| DEFAULT_EXPIRY_HOURS.to_string())
            .parse()
            .expect("JWT_EXPIRY_HOURS must be an integer");

        Self {
            secret,
            token_expiry_hours,
        }
    }
}

/// Issue an access token for `user_id`, expiring `token_expiry_hours`
/// from now.
pub fn generate_access_token(
    user_id: DbId,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let iat = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        exp: iat + config.token_expiry_hours * 3600,
        iat,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Check signature and expiry, returning the [`Claims`] on success.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, checks exp
    )?;
    Ok(data.claims)
}
