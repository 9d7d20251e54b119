//! Query functions for users and their password credentials.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::connection::DbConnection;
use crate::db::schema::{auth_user, user};
use crate::model::user::User;
use crate::model::user::authuser::{AuthUser, NewAuthUser, PASSWORD_AUTH_SOURCE};
use crate::model::user::NewUser;

/// ## Summary
/// Retrieves a user by ID.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn get_user(
    conn: &mut DbConnection<'_>,
    id: uuid::Uuid,
) -> diesel::QueryResult<Option<User>> {
    user::table
        .find(id)
        .select(User::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Retrieves a user by e-mail address.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn get_user_by_email(
    conn: &mut DbConnection<'_>,
    email: &str,
) -> diesel::QueryResult<Option<User>> {
    user::table
        .filter(user::email.eq(email))
        .select(User::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Inserts a new user and returns the inserted record.
///
/// ## Errors
/// Returns a database error if the insert fails (including a duplicate e-mail).
pub async fn create_user(
    conn: &mut DbConnection<'_>,
    new_user: &NewUser<'_>,
) -> diesel::QueryResult<User> {
    diesel::insert_into(user::table)
        .values(new_user)
        .returning(User::as_returning())
        .get_result(conn)
        .await
}

/// ## Summary
/// Stores a credential for a user.
///
/// ## Errors
/// Returns a database error if the insert fails.
pub async fn create_auth_user(
    conn: &mut DbConnection<'_>,
    new_auth_user: &NewAuthUser<'_>,
) -> diesel::QueryResult<usize> {
    diesel::insert_into(auth_user::table)
        .values(new_auth_user)
        .execute(conn)
        .await
}

/// ## Summary
/// Retrieves the password credential of a user, if any.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn get_password_credential(
    conn: &mut DbConnection<'_>,
    user_id: uuid::Uuid,
) -> diesel::QueryResult<Option<AuthUser>> {
    auth_user::table
        .filter(auth_user::user_id.eq(user_id))
        .filter(auth_user::auth_source.eq(PASSWORD_AUTH_SOURCE))
        .select(AuthUser::as_select())
        .first(conn)
        .await
        .optional()
}
