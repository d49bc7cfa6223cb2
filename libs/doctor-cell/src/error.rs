use thiserror::Error;

use shared_database::DatabaseError;
use shared_models::error::AppError;

use crate::slot_format::SlotFormatError;

#[derive(Error, Debug)]
pub enum DoctorError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Slot {time} on {date} is already booked")]
    SlotUnavailable { date: String, time: String },

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<DatabaseError> for DoctorError {
    fn from(err: DatabaseError) -> Self {
        DoctorError::DatabaseError(err.to_string())
    }
}

impl From<SlotFormatError> for DoctorError {
    fn from(err: SlotFormatError) -> Self {
        DoctorError::ValidationError(err.to_string())
    }
}

impl From<DoctorError> for AppError {
    fn from(err: DoctorError) -> Self {
        match err {
            DoctorError::ValidationError(msg) => AppError::ValidationError(msg),
            DoctorError::DoctorNotFound => AppError::NotFound("Doctor not found".to_string()),
            DoctorError::SlotUnavailable { .. } => {
                AppError::Conflict("Slot not available, please choose another slot".to_string())
            }
            DoctorError::DatabaseError(msg) => AppError::Database(msg),
        }
    }
}
