use salvo::http::StatusCode;
use salvo::writing::Json;
use salvo::{Depot, Request, Response, Writer, async_trait};
use serde::Serialize;
use thiserror::Error;

use sprout_core::error::CoreError;
use sprout_db::error::DbError;
use sprout_service::error::ServiceError;

/// Application-level errors (HTTP layer)
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    ServiceError(#[from] ServiceError),

    #[error(transparent)]
    DatabaseError(#[from] DbError),

    #[error(transparent)]
    CoreError(#[from] CoreError),

    /// The request itself could not be understood.
    #[error("{0}")]
    BadRequest(String),
}

pub type AppResult<T> = std::result::Result<T, AppError>;

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub const NOT_AUTHENTICATED_MESSAGE: &str = "Please authenticate.";
const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

fn core_status(err: &CoreError) -> StatusCode {
    match err {
        CoreError::ValidationError(_)
        | CoreError::InvalidRecurrenceConfig(_)
        | CoreError::DateOutOfRange(_) => StatusCode::BAD_REQUEST,
        CoreError::InvariantViolation(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl AppError {
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::CoreError(err) | Self::ServiceError(ServiceError::CoreError(err)) => {
                core_status(err)
            }
            Self::ServiceError(err) => match err {
                ServiceError::ValidationError(_) => StatusCode::BAD_REQUEST,
                ServiceError::NotAuthenticated => StatusCode::UNAUTHORIZED,
                ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
                ServiceError::Conflict(_) => StatusCode::CONFLICT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message shown to the client. Server errors are not described.
    #[must_use]
    pub fn client_message(&self) -> String {
        match self.status_code() {
            StatusCode::UNAUTHORIZED => NOT_AUTHENTICATED_MESSAGE.to_string(),
            status if status.is_server_error() => INTERNAL_ERROR_MESSAGE.to_string(),
            _ => self.to_string(),
        }
    }
}

#[async_trait]
impl Writer for AppError {
    async fn write(self, req: &mut Request, _depot: &mut Depot, res: &mut Response) {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(
                error = ?self,
                method = %req.method(),
                path = %req.uri().path(),
                "Request failed"
            );
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        res.status_code(status);
        res.render(Json(ErrorResponse {
            error: self.client_message(),
        }));
    }
}
