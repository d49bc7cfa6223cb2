use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use doctor_cell::RatingSummary;

use crate::error::ReviewError;

pub const MAX_REVIEW_LENGTH: usize = 500;

/// Star rating, an integer from 1 to 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub fn value(self) -> u8 {
        self.0
    }

    /// JSON numbers arrive as floats; `4.0` is accepted, `4.5` is not.
    pub fn from_number(value: f64) -> Result<Self, ReviewError> {
        if value.fract() != 0.0 || !(1.0..=5.0).contains(&value) {
            return Err(ReviewError::InvalidRating);
        }
        Self::try_from(value as u8)
    }
}

impl TryFrom<u8> for Rating {
    type Error = ReviewError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (1..=5).contains(&value) {
            Ok(Rating(value))
        } else {
            Err(ReviewError::InvalidRating)
        }
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Review body: non-blank, at most 500 characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReviewText(String);

impl ReviewText {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ReviewText {
    type Error = ReviewError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ReviewError::ValidationError("Review text cannot be empty".to_string()));
        }
        if trimmed.chars().count() > MAX_REVIEW_LENGTH {
            return Err(ReviewError::ValidationError(format!(
                "Review text cannot exceed {} characters",
                MAX_REVIEW_LENGTH
            )));
        }
        Ok(ReviewText(trimmed.to_string()))
    }
}

impl From<ReviewText> for String {
    fn from(text: ReviewText) -> Self {
        text.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    pub doctor_id: Uuid,
    #[serde(rename = "userId")]
    pub author_id: Uuid,
    pub rating: Rating,
    #[serde(rename = "review")]
    pub text: ReviewText,
    #[serde(rename = "date")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    pub doctor_id: Option<String>,
    pub user_id: Option<String>,
    pub rating: Option<f64>,
    pub review: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReviewRequest {
    pub user_id: Option<String>,
    pub rating: Option<f64>,
    pub review: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewReview {
    pub doctor_id: Uuid,
    pub author_id: Uuid,
    pub rating: Rating,
    pub text: ReviewText,
}

/// One write against a doctor's review set. Each variant is applied together
/// with the recomputed summary, or not at all.
#[derive(Debug, Clone, PartialEq)]
pub enum ReviewMutation {
    Create(NewReview),
    Update {
        review_id: Uuid,
        author_id: Uuid,
        rating: Option<Rating>,
        text: Option<ReviewText>,
    },
    Delete {
        review_id: Uuid,
        author_id: Uuid,
    },
}

/// Result of a committed mutation: the affected review (as deleted, for a
/// delete) and the doctor's summary after the write.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewCommit {
    pub doctor_id: Uuid,
    pub review: Review,
    #[serde(flatten)]
    pub summary: RatingSummary,
}
