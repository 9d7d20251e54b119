mod auth;
mod health;
mod plants;
mod tasks;

use salvo::{Depot, Request, Router};
use serde::de::DeserializeOwned;

use sprout_service::auth::depot::get_user_from_depot;
use sprout_service::error::ServiceError;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthMiddleware;

// Re-export route constants from core
pub use sprout_core::constants::{
    API_ROUTE_COMPONENT, API_ROUTE_PREFIX, AUTH_ROUTE_COMPONENT, PLANTS_ROUTE_COMPONENT,
    TASKS_ROUTE_COMPONENT,
};

/// ## Summary
/// Constructs the API router. Health, registration and login are public;
/// everything else requires a bearer token.
#[must_use]
pub fn routes() -> Router {
    Router::with_path(API_ROUTE_COMPONENT)
        .push(health::routes())
        .push(auth::routes())
        .push(
            Router::new()
                .hoop(AuthMiddleware)
                .push(plants::routes())
                .push(tasks::routes()),
        )
}

/// Id of the user resolved by [`AuthMiddleware`].
fn current_user_id(depot: &Depot) -> AppResult<uuid::Uuid> {
    Ok(get_user_from_depot(depot)?.id)
}

/// Parses the `{id}` path segment. Anything that is not a stored record's
/// UUID, such as the id of a synthetic task instance, is reported as missing.
fn path_id(req: &Request, what: &str) -> AppResult<uuid::Uuid> {
    let raw = req.param::<String>("id").unwrap_or_default();
    uuid::Uuid::parse_str(&raw)
        .map_err(|_err| ServiceError::NotFound(format!("{what} {raw}")).into())
}

async fn json_body<T: DeserializeOwned + Send>(req: &mut Request) -> AppResult<T> {
    req.parse_json::<T>()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid request body: {e}")))
}
