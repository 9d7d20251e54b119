use thiserror::Error;

/// Service layer errors - combines all error types
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    DatabaseError(#[from] sprout_db::error::DbError),

    #[error(transparent)]
    CoreError(#[from] sprout_core::error::CoreError),

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// A multi-step write failed part-way. Never retried automatically.
    #[error("Transient persistence failure: {0}")]
    TransientPersistence(String),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(&'static str),

    #[error("Diesel error: {0}")]
    DieselError(#[from] diesel::result::Error),
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
