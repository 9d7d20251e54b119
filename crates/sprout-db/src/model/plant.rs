use chrono::{DateTime, NaiveDate, Utc};
use diesel::{pg::Pg, prelude::*};
use serde::Serialize;

use crate::db::schema;

#[derive(
    Debug, Clone, PartialEq, Eq, Identifiable, Queryable, Selectable, Associations, Serialize,
)]
#[diesel(table_name = schema::plant)]
#[diesel(check_for_backend(Pg))]
#[diesel(belongs_to(crate::model::user::User, foreign_key = owner_id))]
pub struct Plant {
    pub id: uuid::Uuid,
    pub owner_id: uuid::Uuid,
    pub name: String,
    pub species: String,
    pub date_acquired: NaiveDate,
    pub location: String,
    /// Days between waterings.
    pub watering_frequency: i32,
    /// Days between fertilizings.
    pub fertilizing_frequency: i32,
    pub last_watered: Option<NaiveDate>,
    pub last_fertilized: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The subset of a plant shown alongside its tasks.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Serialize)]
#[diesel(table_name = schema::plant)]
#[diesel(check_for_backend(Pg))]
pub struct PlantSummary {
    pub id: uuid::Uuid,
    pub name: String,
    pub species: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Insertable)]
#[diesel(table_name = schema::plant)]
pub struct NewPlant<'a> {
    pub id: uuid::Uuid,
    pub owner_id: uuid::Uuid,
    pub name: &'a str,
    pub species: &'a str,
    pub date_acquired: NaiveDate,
    pub location: &'a str,
    pub watering_frequency: i32,
    pub fertilizing_frequency: i32,
    pub last_watered: Option<NaiveDate>,
    pub last_fertilized: Option<NaiveDate>,
    pub notes: Option<&'a str>,
}

/// Partial update of a plant. `None` fields are left unchanged; `Some(None)`
/// writes `NULL` to a nullable column.
#[derive(Debug, Clone, Default, PartialEq, Eq, AsChangeset)]
#[diesel(table_name = schema::plant)]
pub struct PlantChangeset<'a> {
    pub name: Option<&'a str>,
    pub species: Option<&'a str>,
    pub date_acquired: Option<NaiveDate>,
    pub location: Option<&'a str>,
    pub watering_frequency: Option<i32>,
    pub fertilizing_frequency: Option<i32>,
    pub last_watered: Option<Option<NaiveDate>>,
    pub last_fertilized: Option<Option<NaiveDate>>,
    pub notes: Option<Option<&'a str>>,
    pub updated_at: Option<DateTime<Utc>>,
}
