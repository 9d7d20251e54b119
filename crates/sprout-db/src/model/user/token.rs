use diesel::{pg::Pg, prelude::*};

use crate::db::schema;

/// A bearer session token. Only the SHA-256 digest of the token is stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = schema::auth_token)]
#[diesel(check_for_backend(Pg))]
#[diesel(belongs_to(super::User, foreign_key = user_id))]
pub struct AuthToken {
    pub id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    pub token_hash: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Insertable)]
#[diesel(table_name = schema::auth_token)]
pub struct NewAuthToken<'a> {
    pub id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    pub token_hash: &'a str,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}
