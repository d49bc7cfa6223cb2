use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex as AsyncMutex, RwLock};
use tracing::debug;
use uuid::Uuid;

use doctor_cell::{MemoryDoctorStore, RatingSummary};

use crate::error::ReviewError;
use crate::models::{NewReview, Rating, Review, ReviewCommit, ReviewMutation, ReviewText};
use crate::services::aggregator::summarize;
use crate::store::ReviewStore;

/// In-process review store sharing the doctor records of a `MemoryDoctorStore`.
///
/// Commits for one doctor hold that doctor's mutex from the first read to the
/// last write. The review map and the doctor summary are published while the
/// review map's write lock is held; a failed summary write leaves both as
/// they were.
pub struct MemoryReviewStore {
    doctors: Arc<MemoryDoctorStore>,
    reviews: RwLock<HashMap<Uuid, Review>>,
    doctor_locks: Mutex<HashMap<Uuid, Arc<AsyncMutex<()>>>>,
}

/// Staged change to the review map.
enum Change {
    Put(Review),
    Remove(Uuid),
}

impl MemoryReviewStore {
    pub fn new(doctors: Arc<MemoryDoctorStore>) -> Self {
        Self {
            doctors,
            reviews: RwLock::new(HashMap::new()),
            doctor_locks: Mutex::new(HashMap::new()),
        }
    }

    fn doctor_lock(&self, doctor_id: Uuid) -> Arc<AsyncMutex<()>> {
        let mut locks = self.doctor_locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.entry(doctor_id).or_default().clone()
    }

    /// Ratings for `doctor_id` as they will be once `change` lands.
    async fn staged_ratings(&self, doctor_id: Uuid, change: &Change) -> Vec<Rating> {
        let reviews = self.reviews.read().await;
        let (skip, extra) = match change {
            Change::Put(review) => (review.id, Some(review.rating)),
            Change::Remove(id) => (*id, None),
        };

        reviews
            .values()
            .filter(|r| r.doctor_id == doctor_id && r.id != skip)
            .map(|r| r.rating)
            .chain(extra)
            .collect()
    }

    async fn publish(&self, doctor_id: Uuid, change: Change) -> Result<RatingSummary, ReviewError> {
        let summary = summarize(self.staged_ratings(doctor_id, &change).await);

        let mut reviews = self.reviews.write().await;
        self.doctors.apply_rating_summary(doctor_id, summary).await?;
        match change {
            Change::Put(review) => {
                reviews.insert(review.id, review);
            }
            Change::Remove(id) => {
                reviews.remove(&id);
            }
        }

        Ok(summary)
    }

    async fn find(&self, review_id: Uuid) -> Option<Review> {
        self.reviews.read().await.get(&review_id).cloned()
    }

    /// Loads a review and checks the caller wrote it.
    async fn owned_review(&self, review_id: Uuid, author_id: Uuid) -> Result<Review, ReviewError> {
        let review = self.find(review_id).await.ok_or(ReviewError::ReviewNotFound)?;
        if review.author_id != author_id {
            return Err(ReviewError::Unauthorized);
        }
        Ok(review)
    }

    async fn create(&self, new_review: NewReview) -> Result<ReviewCommit, ReviewError> {
        if !self.doctors.contains(new_review.doctor_id).await {
            return Err(ReviewError::DoctorNotFound);
        }

        let lock = self.doctor_lock(new_review.doctor_id);
        let _guard = lock.lock().await;

        let duplicate = self
            .reviews
            .read()
            .await
            .values()
            .any(|r| r.doctor_id == new_review.doctor_id && r.author_id == new_review.author_id);
        if duplicate {
            return Err(ReviewError::DuplicateReview);
        }

        let review = Review {
            id: Uuid::new_v4(),
            doctor_id: new_review.doctor_id,
            author_id: new_review.author_id,
            rating: new_review.rating,
            text: new_review.text,
            created_at: Utc::now(),
        };

        let summary = self.publish(review.doctor_id, Change::Put(review.clone())).await?;
        Ok(ReviewCommit { doctor_id: review.doctor_id, review, summary })
    }

    async fn update(
        &self,
        review_id: Uuid,
        author_id: Uuid,
        rating: Option<Rating>,
        text: Option<ReviewText>,
    ) -> Result<ReviewCommit, ReviewError> {
        let doctor_id = self.owned_review(review_id, author_id).await?.doctor_id;

        let lock = self.doctor_lock(doctor_id);
        let _guard = lock.lock().await;

        // Re-read under the doctor lock; a concurrent delete may have won.
        let mut review = self.owned_review(review_id, author_id).await?;
        if let Some(rating) = rating {
            review.rating = rating;
        }
        if let Some(text) = text {
            review.text = text;
        }

        let summary = self.publish(doctor_id, Change::Put(review.clone())).await?;
        Ok(ReviewCommit { doctor_id, review, summary })
    }

    async fn delete(&self, review_id: Uuid, author_id: Uuid) -> Result<ReviewCommit, ReviewError> {
        let doctor_id = self.owned_review(review_id, author_id).await?.doctor_id;

        let lock = self.doctor_lock(doctor_id);
        let _guard = lock.lock().await;

        let review = self.owned_review(review_id, author_id).await?;
        let summary = self.publish(doctor_id, Change::Remove(review_id)).await?;
        Ok(ReviewCommit { doctor_id, review, summary })
    }
}

#[async_trait]
impl ReviewStore for MemoryReviewStore {
    async fn list_for_doctor(&self, doctor_id: Uuid) -> Result<Vec<Review>, ReviewError> {
        Ok(self
            .reviews
            .read()
            .await
            .values()
            .filter(|r| r.doctor_id == doctor_id)
            .cloned()
            .collect())
    }

    async fn commit(&self, mutation: ReviewMutation) -> Result<ReviewCommit, ReviewError> {
        debug!("Committing review mutation {:?}", mutation);
        match mutation {
            ReviewMutation::Create(new_review) => self.create(new_review).await,
            ReviewMutation::Update { review_id, author_id, rating, text } => {
                self.update(review_id, author_id, rating, text).await
            }
            ReviewMutation::Delete { review_id, author_id } => self.delete(review_id, author_id).await,
        }
    }
}
