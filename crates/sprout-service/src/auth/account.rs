//! Registration and login.

use chrono::Utc;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::AsyncConnection;
use diesel_async::scoped_futures::ScopedFutureExt;
use serde::{Deserialize, Serialize};

use sprout_db::db::connection::DbConnection;
use sprout_db::db::query::{token, user};
use sprout_db::model::user::authuser::{NewAuthUser, PASSWORD_AUTH_SOURCE};
use sprout_db::model::user::{NewUser, User};

use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::issue_token;
use crate::error::{ServiceError, ServiceResult};

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// A signed-in user and their bearer token.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub user: User,
    pub token: String,
    pub expires_at: chrono::DateTime<Utc>,
}

fn email_taken() -> ServiceError {
    ServiceError::Conflict("an account with this email already exists".to_string())
}

/// E-mail addresses are matched case-insensitively.
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// ## Summary
/// Checks a registration payload and returns the trimmed name and normalized
/// e-mail address.
///
/// ## Errors
/// Returns `ValidationError` for an empty name, a malformed e-mail address or
/// a password shorter than eight characters.
pub fn validate_registration(request: &RegisterRequest) -> ServiceResult<(String, String)> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(ServiceError::ValidationError("name is required".to_string()));
    }

    let email = normalize_email(&request.email);
    let well_formed = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !well_formed {
        return Err(ServiceError::ValidationError(
            "a valid email address is required".to_string(),
        ));
    }

    if request.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ServiceError::ValidationError(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    Ok((name.to_string(), email))
}

/// ## Summary
/// Creates an account with a password credential and signs it in.
///
/// ## Side Effects
/// - Inserts a user row and its password credential
/// - Inserts a session token
///
/// ## Errors
/// - `ValidationError` for an invalid payload.
/// - `Conflict` if the e-mail address is already registered.
#[tracing::instrument(skip(conn, request))]
pub async fn register(
    conn: &mut DbConnection<'_>,
    request: &RegisterRequest,
    token_ttl_days: u32,
) -> ServiceResult<Session> {
    let (name, email) = validate_registration(request)?;
    let password_hash = hash_password(&request.password)?;

    conn.transaction::<_, ServiceError, _>(move |tx| {
        async move {
            if user::get_user_by_email(tx, &email).await?.is_some() {
                return Err(email_taken());
            }

            let created = user::create_user(
                tx,
                &NewUser {
                    id: uuid::Uuid::now_v7(),
                    name: &name,
                    email: &email,
                },
            )
            .await
            .map_err(|err| match err {
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    email_taken()
                }
                other => other.into(),
            })?;

            let _credential_rows = user::create_auth_user(
                tx,
                &NewAuthUser {
                    id: uuid::Uuid::now_v7(),
                    auth_source: PASSWORD_AUTH_SOURCE,
                    auth_id: &password_hash,
                    user_id: created.id,
                },
            )
            .await?;

            let issued = issue_token(tx, created.id, token_ttl_days).await?;

            tracing::info!(user_id = %created.id, "User registered");

            Ok(Session {
                user: created,
                token: issued.token,
                expires_at: issued.expires_at,
            })
        }
        .scope_boxed()
    })
    .await
}

/// ## Summary
/// Signs a user in with e-mail and password.
///
/// Expired tokens of the user are purged on the way.
///
/// ## Errors
/// Returns `NotAuthenticated` if the e-mail is unknown or the password does
/// not match. The two cases are not distinguished.
#[tracing::instrument(skip(conn, request))]
pub async fn login(
    conn: &mut DbConnection<'_>,
    request: &LoginRequest,
    token_ttl_days: u32,
) -> ServiceResult<Session> {
    let email = normalize_email(&request.email);

    let found = user::get_user_by_email(conn, &email)
        .await?
        .ok_or(ServiceError::NotAuthenticated)?;
    let credential = user::get_password_credential(conn, found.id)
        .await?
        .ok_or(ServiceError::NotAuthenticated)?;

    verify_password(&request.password, &credential.auth_id)?;

    let purged = token::purge_expired_tokens(conn, found.id, Utc::now()).await?;
    let issued = issue_token(conn, found.id, token_ttl_days).await?;

    tracing::info!(user_id = %found.id, purged, "User logged in");

    Ok(Session {
        user: found,
        token: issued.token,
        expires_at: issued.expires_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_registration_normalizes_fields() {
        let (name, email) =
            validate_registration(&request("  Ada ", " Ada@Example.COM ", "correct-horse"))
                .expect("valid registration");

        assert_eq!(name, "Ada");
        assert_eq!(email, "ada@example.com");
    }

    #[test]
    fn test_registration_rejects_bad_payloads() {
        let cases = [
            request("   ", "ada@example.com", "correct-horse"),
            request("Ada", "not-an-email", "correct-horse"),
            request("Ada", "@example.com", "correct-horse"),
            request("Ada", "ada@example.com", "short"),
        ];

        for case in cases {
            assert!(matches!(
                validate_registration(&case),
                Err(ServiceError::ValidationError(_))
            ));
        }
    }
}
