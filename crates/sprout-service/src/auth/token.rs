//! Bearer session tokens.
//!
//! A token is 32 random bytes encoded as unpadded URL-safe base64. The client
//! keeps the token; the database keeps only its hex-encoded SHA-256 digest.

use argon2::password_hash::rand_core::{OsRng, RngCore};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};

use sprout_db::db::connection::DbConnection;
use sprout_db::db::query::token;
use sprout_db::model::user::User;
use sprout_db::model::user::token::NewAuthToken;

use crate::error::{ServiceError, ServiceResult};

const TOKEN_BYTES: usize = 32;

/// A freshly issued token. The plain token is only ever available here.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[must_use]
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

#[must_use]
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// ## Summary
/// Returns the expiry of a token issued at `now` that lives `ttl_days` days.
///
/// ## Errors
/// Returns `InvariantViolation` if the expiry does not fit in a timestamp.
pub fn expiry_from(now: DateTime<Utc>, ttl_days: u32) -> ServiceResult<DateTime<Utc>> {
    TimeDelta::try_days(i64::from(ttl_days))
        .and_then(|ttl| now.checked_add_signed(ttl))
        .ok_or(ServiceError::InvariantViolation(
            "token expiry is out of range",
        ))
}

/// ## Summary
/// Issues a new token for `user_id`.
///
/// ## Errors
/// Returns a database error if the token cannot be stored.
#[tracing::instrument(skip(conn))]
pub async fn issue_token(
    conn: &mut DbConnection<'_>,
    user_id: uuid::Uuid,
    ttl_days: u32,
) -> ServiceResult<IssuedToken> {
    let token = generate_token();
    let token_hash = hash_token(&token);
    let expires_at = expiry_from(Utc::now(), ttl_days)?;

    token::create_token(
        conn,
        &NewAuthToken {
            id: uuid::Uuid::now_v7(),
            user_id,
            token_hash: &token_hash,
            expires_at,
        },
    )
    .await?;

    tracing::debug!(%expires_at, "Issued session token");

    Ok(IssuedToken { token, expires_at })
}

/// ## Summary
/// Resolves the user owning an unexpired token.
///
/// ## Errors
/// Returns `NotAuthenticated` if the token is unknown or expired.
pub async fn resolve_token(conn: &mut DbConnection<'_>, token: &str) -> ServiceResult<User> {
    token::find_user_by_token_hash(conn, &hash_token(token), Utc::now())
        .await?
        .ok_or(ServiceError::NotAuthenticated)
}
