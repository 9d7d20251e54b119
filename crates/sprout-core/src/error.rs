use thiserror::Error;

/// Core-level errors
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid recurrence configuration: {0}")]
    InvalidRecurrenceConfig(String),

    #[error("Date out of range: stepping from {0} overflows the calendar")]
    DateOutOfRange(chrono::NaiveDate),

    #[error("Invariant violation: {0}")]
    InvariantViolation(&'static str),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
