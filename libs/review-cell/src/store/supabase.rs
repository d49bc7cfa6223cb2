use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, instrument};
use uuid::Uuid;

use doctor_cell::RatingSummary;
use shared_config::AppConfig;
use shared_database::SupabaseClient;

use crate::error::ReviewError;
use crate::models::{Rating, Review, ReviewCommit, ReviewMutation, ReviewText};
use crate::store::ReviewStore;

/// Review store backed by PostgREST.
///
/// Writes go through the `create_review`, `update_review` and `delete_review`
/// database functions. Each locks the doctor row `FOR UPDATE`, applies the
/// change, recomputes the summary from the remaining rows and returns it, all
/// inside the single transaction PostgREST opens per RPC call.
pub struct SupabaseReviewStore {
    supabase: SupabaseClient,
}

#[derive(Debug, Deserialize)]
struct ReviewRow {
    id: Uuid,
    doctor_id: Uuid,
    author_id: Uuid,
    rating: Rating,
    review: ReviewText,
    created_at: DateTime<Utc>,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Review {
            id: row.id,
            doctor_id: row.doctor_id,
            author_id: row.author_id,
            rating: row.rating,
            text: row.review,
            created_at: row.created_at,
        }
    }
}

/// Payload every review function returns.
#[derive(Debug, Deserialize)]
struct CommitRow {
    doctor_id: Uuid,
    average_rating: f64,
    total_reviews: u32,
    review: ReviewRow,
}

impl SupabaseReviewStore {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_client(SupabaseClient::service(config))
    }

    pub fn with_client(supabase: SupabaseClient) -> Self {
        Self { supabase }
    }

    async fn call(&self, function: &str, args: serde_json::Value) -> Result<ReviewCommit, ReviewError> {
        let row: CommitRow = self.supabase.rpc(function, args).await.map_err(|e| {
            let mapped = ReviewError::from(e);
            if let ReviewError::DatabaseError(detail) = &mapped {
                error!("{} failed: {}", function, detail);
            }
            mapped
        })?;

        Ok(ReviewCommit {
            doctor_id: row.doctor_id,
            summary: RatingSummary::new(row.average_rating, row.total_reviews),
            review: row.review.into(),
        })
    }
}

#[async_trait]
impl ReviewStore for SupabaseReviewStore {
    async fn list_for_doctor(&self, doctor_id: Uuid) -> Result<Vec<Review>, ReviewError> {
        let path = format!(
            "/rest/v1/reviews?doctor_id=eq.{}&select=*&order=created_at.desc",
            doctor_id
        );
        let rows: Vec<ReviewRow> = self.supabase.request(Method::GET, &path, None, None).await?;
        Ok(rows.into_iter().map(Review::from).collect())
    }

    #[instrument(skip(self, mutation))]
    async fn commit(&self, mutation: ReviewMutation) -> Result<ReviewCommit, ReviewError> {
        match mutation {
            ReviewMutation::Create(new_review) => {
                self.call(
                    "create_review",
                    json!({
                        "p_doctor_id": new_review.doctor_id,
                        "p_author_id": new_review.author_id,
                        "p_rating": new_review.rating.value(),
                        "p_review": new_review.text.as_str(),
                    }),
                )
                .await
            }
            ReviewMutation::Update { review_id, author_id, rating, text } => {
                self.call(
                    "update_review",
                    json!({
                        "p_review_id": review_id,
                        "p_author_id": author_id,
                        "p_rating": rating.map(Rating::value),
                        "p_review": text.as_ref().map(ReviewText::as_str),
                    }),
                )
                .await
            }
            ReviewMutation::Delete { review_id, author_id } => {
                self.call(
                    "delete_review",
                    json!({
                        "p_review_id": review_id,
                        "p_author_id": author_id,
                    }),
                )
                .await
            }
        }
    }
}
