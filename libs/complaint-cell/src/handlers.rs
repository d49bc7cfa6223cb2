use axum::{
    extract::{Extension, Path, State},
    Json,
};
use serde_json::{json, Value};

use shared_models::auth::User;
use shared_models::error::AppError;
use shared_utils::extractor::JsonBody;

use crate::models::{CreateComplaintRequest, UpdateComplaintRequest};
use crate::state::ComplaintCellState;

fn require_admin(user: &User) -> Result<(), AppError> {
    if !user.is_admin() {
        return Err(AppError::Forbidden("not permitted".to_string()));
    }
    Ok(())
}

#[axum::debug_handler]
pub async fn create_complaint(
    State(state): State<ComplaintCellState>,
    Extension(user): Extension<User>,
    JsonBody(request): JsonBody<CreateComplaintRequest>,
) -> Result<Json<Value>, AppError> {
    let complaint = state.complaint_service().file_complaint(&user, request).await?;

    Ok(Json(json!({
        "success": true,
        "complaint": complaint
    })))
}

#[axum::debug_handler]
pub async fn get_user_complaints(
    State(state): State<ComplaintCellState>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let complaints = state.complaint_service().complaints_for(&user).await?;

    Ok(Json(json!({
        "success": true,
        "complaints": complaints
    })))
}

#[axum::debug_handler]
pub async fn get_complaints(
    State(state): State<ComplaintCellState>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    require_admin(&user)?;
    let complaints = state.complaint_service().all_complaints().await?;

    Ok(Json(json!({
        "success": true,
        "complaints": complaints
    })))
}

#[axum::debug_handler]
pub async fn update_complaint(
    State(state): State<ComplaintCellState>,
    Extension(user): Extension<User>,
    Path(complaint_id): Path<String>,
    JsonBody(request): JsonBody<UpdateComplaintRequest>,
) -> Result<Json<Value>, AppError> {
    require_admin(&user)?;
    let complaint = state.complaint_service().respond(&complaint_id, request).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Complaint updated successfully",
        "complaint": complaint
    })))
}
