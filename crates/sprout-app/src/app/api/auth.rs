use salvo::http::StatusCode;
use salvo::writing::Json;
use salvo::{Depot, Request, Response, Router, handler};

use sprout_db::model::user::User;
use sprout_service::auth::account::{self, LoginRequest, RegisterRequest, Session};
use sprout_service::auth::depot::get_user_from_depot;

use super::{AUTH_ROUTE_COMPONENT, json_body};
use crate::config::get_config_from_depot;
use crate::db_handler::get_db_from_depot;
use crate::error::AppResult;
use crate::middleware::auth::AuthMiddleware;

/// ## Summary
/// POST /api/auth/register - Creates an account and signs it in.
///
/// ## Errors
/// Returns 400 for an invalid payload, 409 if the e-mail is taken.
#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
async fn register(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> AppResult<Json<Session>> {
    let request: RegisterRequest = json_body(req).await?;
    let ttl_days = get_config_from_depot(depot)?.auth.token_ttl_days;
    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    let session = account::register(&mut conn, &request, ttl_days).await?;

    res.status_code(StatusCode::CREATED);
    Ok(Json(session))
}

/// ## Summary
/// POST /api/auth/login - Exchanges e-mail and password for a bearer token.
///
/// ## Errors
/// Returns 401 with a generic message for unknown e-mails and wrong passwords.
#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
async fn login(req: &mut Request, depot: &mut Depot) -> AppResult<Json<Session>> {
    let request: LoginRequest = json_body(req).await?;
    let ttl_days = get_config_from_depot(depot)?.auth.token_ttl_days;
    let provider = get_db_from_depot(depot)?;
    let mut conn = provider.get_connection().await?;

    Ok(Json(account::login(&mut conn, &request, ttl_days).await?))
}

/// GET /api/auth/me - The authenticated user.
#[handler]
async fn me(depot: &mut Depot) -> AppResult<Json<User>> {
    Ok(Json(get_user_from_depot(depot)?.clone()))
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(AUTH_ROUTE_COMPONENT)
        .push(Router::with_path("register").post(register))
        .push(Router::with_path("login").post(login))
        .push(Router::with_path("me").hoop(AuthMiddleware).get(me))
}

#[cfg(test)]
mod tests {
    use salvo::prelude::*;
    use salvo::test::TestClient;

    #[test_log::test(tokio::test)]
    async fn test_me_requires_authentication() {
        let service = Service::new(crate::app::api::routes());

        let resp = TestClient::get("http://127.0.0.1:5800/api/auth/me")
            .send(&service)
            .await;

        assert_eq!(resp.status_code, Some(StatusCode::UNAUTHORIZED));
    }

    #[test_log::test(tokio::test)]
    async fn test_register_rejects_malformed_body() {
        let service = Service::new(crate::app::api::routes());

        let resp = TestClient::post("http://127.0.0.1:5800/api/auth/register")
            .raw_json("{\"name\": ")
            .send(&service)
            .await;

        assert_eq!(resp.status_code, Some(StatusCode::BAD_REQUEST));
    }
}
