use axum::{
    extract::{Extension, Path, State},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

use shared_models::auth::User;
use shared_models::error::AppError;
use shared_utils::extractor::JsonBody;

use crate::models::{CreateReviewRequest, ReviewCommit, UpdateReviewRequest};
use crate::state::ReviewCellState;

/// Body returned by every review mutation.
#[derive(Serialize)]
pub struct ReviewCommitResponse {
    success: bool,
    message: &'static str,
    #[serde(flatten)]
    commit: ReviewCommit,
}

fn commit_body(message: &'static str, commit: ReviewCommit) -> Json<ReviewCommitResponse> {
    Json(ReviewCommitResponse { success: true, message, commit })
}

#[axum::debug_handler]
pub async fn get_doctor_reviews(
    State(state): State<ReviewCellState>,
    Path(doctor_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let reviews = state.review_service().list_for_doctor(&doctor_id).await?;

    Ok(Json(json!({
        "success": true,
        "count": reviews.len(),
        "reviews": reviews
    })))
}

#[axum::debug_handler]
pub async fn add_review(
    State(state): State<ReviewCellState>,
    Extension(user): Extension<User>,
    JsonBody(request): JsonBody<CreateReviewRequest>,
) -> Result<Json<ReviewCommitResponse>, AppError> {
    let commit = state.review_service().create_review(&user, request).await?;
    Ok(commit_body("Review added successfully", commit))
}

#[axum::debug_handler]
pub async fn update_review(
    State(state): State<ReviewCellState>,
    Extension(user): Extension<User>,
    Path(review_id): Path<String>,
    JsonBody(request): JsonBody<UpdateReviewRequest>,
) -> Result<Json<ReviewCommitResponse>, AppError> {
    let commit = state.review_service().update_review(&user, &review_id, request).await?;
    Ok(commit_body("Review updated successfully", commit))
}

#[axum::debug_handler]
pub async fn delete_review(
    State(state): State<ReviewCellState>,
    Extension(user): Extension<User>,
    Path(review_id): Path<String>,
) -> Result<Json<ReviewCommitResponse>, AppError> {
    let commit = state.review_service().delete_review(&user, &review_id).await?;
    Ok(commit_body("Review deleted successfully", commit))
}
