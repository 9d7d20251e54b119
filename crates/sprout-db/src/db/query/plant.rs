//! Query functions for plants.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::connection::DbConnection;
use crate::db::schema::plant;
use crate::model::plant::{NewPlant, Plant, PlantChangeset, PlantSummary};

/// ## Summary
/// Returns a query to select all plants of an owner, ordered by name.
#[must_use]
pub fn by_owner(owner_id: uuid::Uuid) -> plant::BoxedQuery<'static, diesel::pg::Pg> {
    plant::table
        .filter(plant::owner_id.eq(owner_id))
        .order((plant::name.asc(), plant::id.asc()))
        .into_boxed()
}

/// ## Summary
/// Returns a query to find a plant by ID, scoped to its owner.
#[must_use]
pub fn by_id_and_owner(
    id: uuid::Uuid,
    owner_id: uuid::Uuid,
) -> plant::BoxedQuery<'static, diesel::pg::Pg> {
    plant::table
        .filter(plant::id.eq(id))
        .filter(plant::owner_id.eq(owner_id))
        .into_boxed()
}

/// ## Summary
/// Inserts a new plant and returns the inserted record.
///
/// ## Errors
/// Returns a database error if the insert fails.
pub async fn create_plant(
    conn: &mut DbConnection<'_>,
    new_plant: &NewPlant<'_>,
) -> diesel::QueryResult<Plant> {
    diesel::insert_into(plant::table)
        .values(new_plant)
        .returning(Plant::as_returning())
        .get_result(conn)
        .await
}

/// ## Summary
/// Retrieves a plant by ID, scoped to its owner.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn get_plant(
    conn: &mut DbConnection<'_>,
    id: uuid::Uuid,
    owner_id: uuid::Uuid,
) -> diesel::QueryResult<Option<Plant>> {
    by_id_and_owner(id, owner_id)
        .select(Plant::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Lists an owner's plants.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn list_plants(
    conn: &mut DbConnection<'_>,
    owner_id: uuid::Uuid,
) -> diesel::QueryResult<Vec<Plant>> {
    by_owner(owner_id)
        .select(Plant::as_select())
        .load(conn)
        .await
}

/// ## Summary
/// Loads name and species for the given plants of an owner.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn list_summaries(
    conn: &mut DbConnection<'_>,
    owner_id: uuid::Uuid,
    ids: &[uuid::Uuid],
) -> diesel::QueryResult<Vec<PlantSummary>> {
    plant::table
        .filter(plant::owner_id.eq(owner_id))
        .filter(plant::id.eq_any(ids))
        .select(PlantSummary::as_select())
        .load(conn)
        .await
}

/// ## Summary
/// Checks whether a plant exists and belongs to the owner.
///
/// ## Errors
/// Returns a database error if the query fails.
pub async fn plant_exists(
    conn: &mut DbConnection<'_>,
    id: uuid::Uuid,
    owner_id: uuid::Uuid,
) -> diesel::QueryResult<bool> {
    diesel::select(diesel::dsl::exists(
        plant::table
            .filter(plant::id.eq(id))
            .filter(plant::owner_id.eq(owner_id)),
    ))
    .get_result(conn)
    .await
}

/// ## Summary
/// Applies a partial update to an owner's plant and returns the updated record.
///
/// Returns `Ok(None)` if no such plant belongs to the owner.
///
/// ## Errors
/// Returns a database error if the update fails.
pub async fn update_plant(
    conn: &mut DbConnection<'_>,
    id: uuid::Uuid,
    owner_id: uuid::Uuid,
    changes: &PlantChangeset<'_>,
) -> diesel::QueryResult<Option<Plant>> {
    diesel::update(
        plant::table
            .filter(plant::id.eq(id))
            .filter(plant::owner_id.eq(owner_id)),
    )
    .set(changes)
    .returning(Plant::as_returning())
    .get_result(conn)
    .await
    .optional()
}

/// ## Summary
/// Deletes an owner's plant (its tasks cascade). Returns the number of rows removed.
///
/// ## Errors
/// Returns a database error if the delete fails.
pub async fn delete_plant(
    conn: &mut DbConnection<'_>,
    id: uuid::Uuid,
    owner_id: uuid::Uuid,
) -> diesel::QueryResult<usize> {
    diesel::delete(
        plant::table
            .filter(plant::id.eq(id))
            .filter(plant::owner_id.eq(owner_id)),
    )
    .execute(conn)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn test_plant_queries_are_owner_scoped() {
        let owner = uuid::Uuid::now_v7();
        let listing = diesel::debug_query::<diesel::pg::Pg, _>(
            &by_owner(owner).select(Plant::as_select()),
        )
        .to_string();
        let single = diesel::debug_query::<diesel::pg::Pg, _>(
            &by_id_and_owner(uuid::Uuid::now_v7(), owner).select(Plant::as_select()),
        )
        .to_string();

        assert!(listing.contains(r#""plant"."owner_id" = "#), "{listing}");
        assert!(listing.contains(r#"ORDER BY "plant"."name" ASC"#), "{listing}");
        assert!(single.contains(r#""plant"."id" = "#), "{single}");
        assert!(single.contains(r#""plant"."owner_id" = "#), "{single}");
    }
}
