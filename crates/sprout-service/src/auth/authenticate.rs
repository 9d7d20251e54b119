use salvo::http::header::AUTHORIZATION;

use sprout_db::db::connection::DbConnection;
use sprout_db::model::user::User;

use crate::auth::token::resolve_token;
use crate::error::{ServiceError, ServiceResult};

/// ## Summary
/// Extracts the token from an `Authorization: Bearer <token>` header.
///
/// The scheme is matched case-insensitively. Returns `None` for a missing,
/// malformed or empty header.
#[must_use]
pub fn bearer_token(req: &salvo::Request) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();

    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// ## Summary
/// Authenticates a request by its bearer token.
///
/// ## Errors
/// Returns `NotAuthenticated` if the header is missing or the token is
/// unknown or expired.
#[tracing::instrument(skip(req, conn))]
pub async fn authenticate(req: &salvo::Request, conn: &mut DbConnection<'_>) -> ServiceResult<User> {
    let token = bearer_token(req).ok_or(ServiceError::NotAuthenticated)?;
    let user = resolve_token(conn, token).await?;

    tracing::trace!(user_id = %user.id, "Authenticated request");
    Ok(user)
}
