use salvo::http::StatusCode;
use salvo::writing::Json;
use salvo::{Depot, FlowCtrl, Request, Response};
use tracing::error;

use sprout_service::auth::authenticate::{authenticate, bearer_token};
use sprout_service::auth::depot::depot_keys;
use sprout_service::error::ServiceError;

use crate::db_handler::get_db_from_depot;
use crate::error::{ErrorResponse, NOT_AUTHENTICATED_MESSAGE};

/// ## Summary
/// Middleware that resolves the bearer token of a request and stores the
/// authenticated user in the depot.
///
/// Requests without a usable token are answered with 401 before any handler
/// runs. CORS preflight requests pass through untouched.
pub struct AuthMiddleware;

fn reject(res: &mut Response, ctrl: &mut FlowCtrl) {
    res.status_code(StatusCode::UNAUTHORIZED);
    res.render(Json(ErrorResponse {
        error: NOT_AUTHENTICATED_MESSAGE.to_string(),
    }));
    ctrl.skip_rest();
}

fn fail(res: &mut Response, ctrl: &mut FlowCtrl, status: StatusCode) {
    res.status_code(status);
    res.render(Json(ErrorResponse {
        error: "Internal server error".to_string(),
    }));
    ctrl.skip_rest();
}

#[salvo::async_trait]
impl salvo::Handler for AuthMiddleware {
    #[tracing::instrument(skip(self, req, depot, res, ctrl), fields(
        method = %req.method(),
        path = %req.uri().path()
    ))]
    async fn handle(
        &self,
        req: &mut Request,
        depot: &mut Depot,
        res: &mut Response,
        ctrl: &mut FlowCtrl,
    ) {
        if req.method() == salvo::http::Method::OPTIONS {
            return;
        }

        if bearer_token(req).is_none() {
            tracing::debug!("Missing or malformed bearer token");
            reject(res, ctrl);
            return;
        }

        let provider = match get_db_from_depot(depot) {
            Ok(p) => p,
            Err(e) => {
                error!(error = ?e, "Failed to get database provider from depot");
                fail(res, ctrl, StatusCode::INTERNAL_SERVER_ERROR);
                return;
            }
        };

        let mut conn = match provider.get_connection().await {
            Ok(c) => c,
            Err(e) => {
                error!(error = ?e, "Failed to get database connection");
                fail(res, ctrl, StatusCode::SERVICE_UNAVAILABLE);
                return;
            }
        };

        match authenticate(req, &mut conn).await {
            Ok(user) => {
                tracing::debug!(user_id = %user.id, "User authenticated successfully");
                depot.insert(depot_keys::AUTHENTICATED_USER, user);
            }
            Err(ServiceError::NotAuthenticated) => {
                tracing::debug!("Unknown or expired bearer token");
                reject(res, ctrl);
            }
            Err(e) => {
                error!(error = ?e, "Authentication failed with error");
                fail(res, ctrl, StatusCode::INTERNAL_SERVER_ERROR);
            }
        }
    }
}
