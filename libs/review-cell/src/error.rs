use thiserror::Error;

use doctor_cell::DoctorError;
use shared_database::DatabaseError;
use shared_models::error::AppError;

#[derive(Error, Debug)]
pub enum ReviewError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Rating must be an integer between 1 and 5")]
    InvalidRating,

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Review not found")]
    ReviewNotFound,

    #[error("You have already reviewed this doctor")]
    DuplicateReview,

    #[error("Only the author may change this review")]
    Unauthorized,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl ReviewError {
    /// Maps a business rule raised inside one of the review functions.
    pub(crate) fn from_raised(raised: &str) -> Option<Self> {
        match raised {
            "DUPLICATE_REVIEW" => Some(ReviewError::DuplicateReview),
            "DOCTOR_NOT_FOUND" => Some(ReviewError::DoctorNotFound),
            "REVIEW_NOT_FOUND" => Some(ReviewError::ReviewNotFound),
            "UNAUTHORIZED" => Some(ReviewError::Unauthorized),
            "INVALID_RATING" => Some(ReviewError::InvalidRating),
            _ => None,
        }
    }
}

impl From<DatabaseError> for ReviewError {
    fn from(err: DatabaseError) -> Self {
        if let Some(mapped) = err.raised().and_then(ReviewError::from_raised) {
            return mapped;
        }
        if err.is_unique_violation() {
            return ReviewError::DuplicateReview;
        }
        ReviewError::DatabaseError(err.to_string())
    }
}

impl From<DoctorError> for ReviewError {
    fn from(err: DoctorError) -> Self {
        match err {
            DoctorError::DoctorNotFound => ReviewError::DoctorNotFound,
            DoctorError::ValidationError(msg) => ReviewError::ValidationError(msg),
            other => ReviewError::DatabaseError(other.to_string()),
        }
    }
}

impl From<ReviewError> for AppError {
    fn from(err: ReviewError) -> Self {
        match err {
            ReviewError::ValidationError(msg) => AppError::ValidationError(msg),
            ReviewError::InvalidRating => AppError::ValidationError(err.to_string()),
            ReviewError::DoctorNotFound | ReviewError::ReviewNotFound => AppError::NotFound(err.to_string()),
            ReviewError::DuplicateReview => AppError::Conflict(err.to_string()),
            ReviewError::Unauthorized => AppError::Forbidden("not permitted".to_string()),
            ReviewError::DatabaseError(msg) => AppError::Database(msg),
        }
    }
}
