//! Plant CRUD, scoped to the owning user.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use sprout_core::date::{deserialize_date, deserialize_optional_date};
use sprout_core::patch::{deserialize_nullable, deserialize_nullable_date};
use sprout_db::db::connection::DbConnection;
use sprout_db::db::query::plant;
use sprout_db::model::plant::{NewPlant, Plant, PlantChangeset, PlantSummary};

use crate::error::{ServiceError, ServiceResult};

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePlant {
    pub name: String,
    pub species: String,
    #[serde(deserialize_with = "deserialize_date")]
    pub date_acquired: NaiveDate,
    pub location: String,
    /// Days between waterings.
    pub watering_frequency: i32,
    /// Days between fertilizings.
    pub fertilizing_frequency: i32,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub last_watered: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub last_fertilized: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Partial update of a plant. Absent fields are left unchanged; `null`
/// clears the care dates and notes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePlant {
    pub name: Option<String>,
    pub species: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub date_acquired: Option<NaiveDate>,
    pub location: Option<String>,
    pub watering_frequency: Option<i32>,
    pub fertilizing_frequency: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_nullable_date")]
    pub last_watered: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "deserialize_nullable_date")]
    pub last_fertilized: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub notes: Option<Option<String>>,
}

fn require_text(field: &str, value: &str) -> ServiceResult<()> {
    if value.trim().is_empty() {
        return Err(ServiceError::ValidationError(format!("{field} is required")));
    }
    Ok(())
}

fn require_frequency(field: &str, days: i32) -> ServiceResult<()> {
    if days < 1 {
        return Err(ServiceError::ValidationError(format!(
            "{field} must be at least 1 day, got {days}"
        )));
    }
    Ok(())
}

impl CreatePlant {
    /// ## Errors
    /// Returns `ValidationError` for an empty name, species or location, or a
    /// frequency below one day.
    pub fn validate(&self) -> ServiceResult<()> {
        require_text("name", &self.name)?;
        require_text("species", &self.species)?;
        require_text("location", &self.location)?;
        require_frequency("watering_frequency", self.watering_frequency)?;
        require_frequency("fertilizing_frequency", self.fertilizing_frequency)
    }
}

impl UpdatePlant {
    /// ## Errors
    /// Returns `ValidationError` if a present field would be rejected on create.
    pub fn validate(&self) -> ServiceResult<()> {
        for (field, value) in [
            ("name", &self.name),
            ("species", &self.species),
            ("location", &self.location),
        ] {
            if let Some(value) = value {
                require_text(field, value)?;
            }
        }
        if let Some(days) = self.watering_frequency {
            require_frequency("watering_frequency", days)?;
        }
        if let Some(days) = self.fertilizing_frequency {
            require_frequency("fertilizing_frequency", days)?;
        }
        Ok(())
    }

    fn changeset(&self) -> PlantChangeset<'_> {
        PlantChangeset {
            name: self.name.as_deref().map(str::trim),
            species: self.species.as_deref().map(str::trim),
            date_acquired: self.date_acquired,
            location: self.location.as_deref().map(str::trim),
            watering_frequency: self.watering_frequency,
            fertilizing_frequency: self.fertilizing_frequency,
            last_watered: self.last_watered,
            last_fertilized: self.last_fertilized,
            notes: self.notes.as_ref().map(Option::as_deref),
            updated_at: Some(Utc::now()),
        }
    }
}

fn plant_not_found(id: uuid::Uuid) -> ServiceError {
    ServiceError::NotFound(format!("Plant {id}"))
}

/// ## Summary
/// Creates a plant for `owner_id`.
///
/// ## Errors
/// Returns `ValidationError` for an invalid payload, or a database error.
#[tracing::instrument(skip(conn, request))]
pub async fn create_plant(
    conn: &mut DbConnection<'_>,
    owner_id: uuid::Uuid,
    request: &CreatePlant,
) -> ServiceResult<Plant> {
    request.validate()?;

    let created = plant::create_plant(
        conn,
        &NewPlant {
            id: uuid::Uuid::now_v7(),
            owner_id,
            name: request.name.trim(),
            species: request.species.trim(),
            date_acquired: request.date_acquired,
            location: request.location.trim(),
            watering_frequency: request.watering_frequency,
            fertilizing_frequency: request.fertilizing_frequency,
            last_watered: request.last_watered,
            last_fertilized: request.last_fertilized,
            notes: request.notes.as_deref(),
        },
    )
    .await?;

    tracing::info!(plant_id = %created.id, "Plant created");
    Ok(created)
}

/// ## Errors
/// Returns a database error if the query fails.
pub async fn list_plants(
    conn: &mut DbConnection<'_>,
    owner_id: uuid::Uuid,
) -> ServiceResult<Vec<Plant>> {
    Ok(plant::list_plants(conn, owner_id).await?)
}

/// ## Errors
/// Returns `NotFound` if the plant does not belong to the owner.
pub async fn get_plant(
    conn: &mut DbConnection<'_>,
    owner_id: uuid::Uuid,
    plant_id: uuid::Uuid,
) -> ServiceResult<Plant> {
    plant::get_plant(conn, plant_id, owner_id)
        .await?
        .ok_or_else(|| plant_not_found(plant_id))
}

/// ## Summary
/// Applies a partial update to an owner's plant.
///
/// ## Errors
/// Returns `ValidationError` for an invalid payload, or `NotFound` if the
/// plant does not belong to the owner.
#[tracing::instrument(skip(conn, changes))]
pub async fn update_plant(
    conn: &mut DbConnection<'_>,
    owner_id: uuid::Uuid,
    plant_id: uuid::Uuid,
    changes: &UpdatePlant,
) -> ServiceResult<Plant> {
    changes.validate()?;

    plant::update_plant(conn, plant_id, owner_id, &changes.changeset())
        .await?
        .ok_or_else(|| plant_not_found(plant_id))
}

/// ## Summary
/// Deletes an owner's plant together with its tasks.
///
/// ## Errors
/// Returns `NotFound` if the plant does not belong to the owner.
#[tracing::instrument(skip(conn))]
pub async fn delete_plant(
    conn: &mut DbConnection<'_>,
    owner_id: uuid::Uuid,
    plant_id: uuid::Uuid,
) -> ServiceResult<()> {
    match plant::delete_plant(conn, plant_id, owner_id).await? {
        0 => Err(plant_not_found(plant_id)),
        _ => {
            tracing::info!(plant_id = %plant_id, "Plant deleted");
            Ok(())
        }
    }
}

/// ## Summary
/// Loads the summaries of the given plants, keyed by plant id. Plants the
/// owner does not have are absent from the map.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn plant_summaries(
    conn: &mut DbConnection<'_>,
    owner_id: uuid::Uuid,
    plant_ids: &[uuid::Uuid],
) -> ServiceResult<HashMap<uuid::Uuid, PlantSummary>> {
    if plant_ids.is_empty() {
        return Ok(HashMap::new());
    }

    Ok(plant::list_summaries(conn, owner_id, plant_ids)
        .await?
        .into_iter()
        .map(|summary| (summary.id, summary))
        .collect())
}
