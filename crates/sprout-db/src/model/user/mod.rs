pub mod authuser;
pub mod token;

use diesel::{pg::Pg, prelude::*};
use serde::Serialize;

use crate::db::schema;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Identifiable, Queryable, Selectable, Serialize)]
#[diesel(table_name = schema::user)]
#[diesel(check_for_backend(Pg))]
pub struct User {
    pub id: uuid::Uuid,
    pub name: String,
    pub email: String,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Insertable)]
#[diesel(table_name = schema::user)]
pub struct NewUser<'a> {
    pub id: uuid::Uuid,
    pub name: &'a str,
    pub email: &'a str,
}
