//! Query functions for bearer session tokens.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::connection::DbConnection;
use crate::db::schema::{auth_token, user};
use crate::model::user::User;
use crate::model::user::token::{AuthToken, NewAuthToken};

/// ## Summary
/// Inserts a new token and returns the inserted record.
///
/// ## Errors
/// Returns a database error if the insert fails.
pub async fn create_token(
    conn: &mut DbConnection<'_>,
    new_token: &NewAuthToken<'_>,
) -> diesel::QueryResult<AuthToken> {
    diesel::insert_into(auth_token::table)
        .values(new_token)
        .returning(AuthToken::as_returning())
        .get_result(conn)
        .await
}

/// ## Summary
/// Resolves the owner of an unexpired token by its digest.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn find_user_by_token_hash(
    conn: &mut DbConnection<'_>,
    token_hash: &str,
    now: DateTime<Utc>,
) -> diesel::QueryResult<Option<User>> {
    auth_token::table
        .inner_join(user::table)
        .filter(auth_token::token_hash.eq(token_hash))
        .filter(auth_token::expires_at.gt(now))
        .select(User::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Deletes a user's expired tokens. Returns the number of rows removed.
///
/// ## Errors
/// Returns a database error if the delete fails.
pub async fn purge_expired_tokens(
    conn: &mut DbConnection<'_>,
    user_id: uuid::Uuid,
    now: DateTime<Utc>,
) -> diesel::QueryResult<usize> {
    diesel::delete(
        auth_token::table
            .filter(auth_token::user_id.eq(user_id))
            .filter(auth_token::expires_at.le(now)),
    )
    .execute(conn)
    .await
}
