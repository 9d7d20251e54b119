use diesel::{pg::Pg, prelude::*};

use crate::db::schema;

/// Auth source for locally stored Argon2 password hashes.
pub const PASSWORD_AUTH_SOURCE: &str = "password";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = schema::auth_user)]
#[diesel(check_for_backend(Pg))]
#[diesel(belongs_to(super::User, foreign_key = user_id))]
pub struct AuthUser {
    pub id: uuid::Uuid,
    pub auth_source: String,
    pub auth_id: String,
    pub user_id: uuid::Uuid,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Insertable)]
#[diesel(table_name = schema::auth_user)]
pub struct NewAuthUser<'a> {
    pub id: uuid::Uuid,
    pub auth_source: &'a str,
    pub auth_id: &'a str,
    pub user_id: uuid::Uuid,
}
