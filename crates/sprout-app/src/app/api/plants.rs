use salvo::http::StatusCode;
use salvo::writing::Json;
use salvo::{Depot, Request, Response, Router, handler};

use sprout_db::model::plant::Plant;
use sprout_service::plant::service::{self as plant_service, CreatePlant, UpdatePlant};

use super::{PLANTS_ROUTE_COMPONENT, current_user_id, json_body, path_id};
use crate::db_handler::get_db_from_depot;
use crate::error::AppResult;

const PLANT: &str = "Plant";

#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
async fn list(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Vec<Plant>>> {
    let owner_id = current_user_id(depot)?;
    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    Ok(Json(plant_service::list_plants(&mut conn, owner_id).await?))
}

#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
async fn create(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> AppResult<Json<Plant>> {
    let owner_id = current_user_id(depot)?;
    let request: CreatePlant = json_body(req).await?;
    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    let plant = plant_service::create_plant(&mut conn, owner_id, &request).await?;

    res.status_code(StatusCode::CREATED);
    Ok(Json(plant))
}

#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
async fn show(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Plant>> {
    let owner_id = current_user_id(depot)?;
    let plant_id = path_id(req, PLANT)?;
    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    Ok(Json(
        plant_service::get_plant(&mut conn, owner_id, plant_id).await?,
    ))
}

#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
async fn update(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Plant>> {
    let owner_id = current_user_id(depot)?;
    let plant_id = path_id(req, PLANT)?;
    let changes: UpdatePlant = json_body(req).await?;
    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    Ok(Json(
        plant_service::update_plant(&mut conn, owner_id, plant_id, &changes).await?,
    ))
}

#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
async fn delete(req: &mut Request, depot: &mut Depot) -> AppResult<StatusCode> {
    let owner_id = current_user_id(depot)?;
    let plant_id = path_id(req, PLANT)?;
    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    plant_service::delete_plant(&mut conn, owner_id, plant_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(PLANTS_ROUTE_COMPONENT)
        .get(list)
        .post(create)
        .push(
            Router::with_path("{id}")
                .get(show)
                .patch(update)
                .delete(delete),
        )
}
