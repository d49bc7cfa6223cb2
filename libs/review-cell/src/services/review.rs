use std::sync::Arc;

use tracing::{debug, info, instrument};
use uuid::Uuid;

use shared_models::auth::User;

use crate::error::ReviewError;
use crate::models::{
    CreateReviewRequest, NewReview, Rating, Review, ReviewCommit, ReviewMutation, ReviewText,
    UpdateReviewRequest,
};
use crate::store::ReviewStore;

/// Validates review requests and hands them to the store as one mutation.
pub struct ReviewService {
    store: Arc<dyn ReviewStore>,
}

fn parse_id(raw: &str, what: &str) -> Result<Uuid, ReviewError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ReviewError::ValidationError(format!("Invalid {} ID format", what)))
}

fn author_of(user: &User, claimed: Option<&str>) -> Result<Uuid, ReviewError> {
    let author_id = user
        .uuid()
        .ok_or_else(|| ReviewError::ValidationError("Invalid user ID format".to_string()))?;

    match claimed {
        Some(claimed) if claimed.trim() != user.id => Err(ReviewError::Unauthorized),
        _ => Ok(author_id),
    }
}

impl ReviewService {
    pub fn new(store: Arc<dyn ReviewStore>) -> Self {
        Self { store }
    }

    /// Reviews for one doctor, newest first.
    pub async fn list_for_doctor(&self, doctor_id: &str) -> Result<Vec<Review>, ReviewError> {
        let doctor_id = parse_id(doctor_id, "doctor")?;
        let mut reviews = self.store.list_for_doctor(doctor_id).await?;
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        debug!("Found {} reviews for doctor {}", reviews.len(), doctor_id);
        Ok(reviews)
    }

    #[instrument(skip(self, user, request), fields(user_id = %user.id))]
    pub async fn create_review(&self, user: &User, request: CreateReviewRequest) -> Result<ReviewCommit, ReviewError> {
        let (Some(doctor_id), Some(rating), Some(text)) = (request.doctor_id, request.rating, request.review) else {
            return Err(ReviewError::ValidationError("Missing required fields".to_string()));
        };

        let author_id = author_of(user, request.user_id.as_deref())?;
        let new_review = NewReview {
            doctor_id: parse_id(&doctor_id, "doctor")?,
            author_id,
            rating: Rating::from_number(rating)?,
            text: ReviewText::try_from(text)?,
        };

        let commit = self.store.commit(ReviewMutation::Create(new_review)).await?;
        info!(
            "Review {} added for doctor {}; rating now {} over {}",
            commit.review.id, commit.doctor_id, commit.summary.average_rating, commit.summary.total_reviews
        );
        Ok(commit)
    }

    #[instrument(skip(self, user, request), fields(user_id = %user.id))]
    pub async fn update_review(
        &self,
        user: &User,
        review_id: &str,
        request: UpdateReviewRequest,
    ) -> Result<ReviewCommit, ReviewError> {
        let review_id = parse_id(review_id, "review")?;
        let author_id = author_of(user, request.user_id.as_deref())?;

        if request.rating.is_none() && request.review.is_none() {
            return Err(ReviewError::ValidationError("Nothing to update".to_string()));
        }

        let rating = request.rating.map(Rating::from_number).transpose()?;
        let text = request.review.map(ReviewText::try_from).transpose()?;

        let commit = self
            .store
            .commit(ReviewMutation::Update { review_id, author_id, rating, text })
            .await?;
        info!(
            "Review {} updated; doctor {} rating now {} over {}",
            review_id, commit.doctor_id, commit.summary.average_rating, commit.summary.total_reviews
        );
        Ok(commit)
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn delete_review(&self, user: &User, review_id: &str) -> Result<ReviewCommit, ReviewError> {
        let review_id = parse_id(review_id, "review")?;
        let author_id = author_of(user, None)?;

        let commit = self.store.commit(ReviewMutation::Delete { review_id, author_id }).await?;
        info!(
            "Review {} deleted; doctor {} rating now {} over {}",
            review_id, commit.doctor_id, commit.summary.average_rating, commit.summary.total_reviews
        );
        Ok(commit)
    }
}
