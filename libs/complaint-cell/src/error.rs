use thiserror::Error;

use shared_database::DatabaseError;
use shared_models::error::AppError;

#[derive(Error, Debug)]
pub enum ComplaintError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Complaint not found")]
    NotFound,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<DatabaseError> for ComplaintError {
    fn from(err: DatabaseError) -> Self {
        ComplaintError::DatabaseError(err.to_string())
    }
}

impl From<ComplaintError> for AppError {
    fn from(err: ComplaintError) -> Self {
        match err {
            ComplaintError::ValidationError(msg) => AppError::ValidationError(msg),
            ComplaintError::NotFound => AppError::NotFound(err.to_string()),
            ComplaintError::DatabaseError(msg) => AppError::Database(msg),
        }
    }
}
