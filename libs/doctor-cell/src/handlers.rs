use axum::{
    extract::{Extension, Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::auth::User;
use shared_models::error::AppError;
use shared_utils::extractor::JsonBody;

use crate::models::{BookSlotRequest, CreateDoctorRequest};
use crate::state::DoctorCellState;

fn parse_doctor_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::ValidationError("Invalid doctor ID format".to_string()))
}

// ==============================================================================
// PUBLIC HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_doctors(
    State(state): State<DoctorCellState>,
) -> Result<Json<Value>, AppError> {
    let doctors = state.doctor_service().list_doctors().await?;

    Ok(Json(json!({
        "success": true,
        "doctors": doctors,
        "total": doctors.len()
    })))
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(state): State<DoctorCellState>,
    Path(doctor_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let doctor_id = parse_doctor_id(&doctor_id)?;
    let doctor = state.doctor_service().get_doctor(doctor_id).await?;

    Ok(Json(json!({
        "success": true,
        "doctor": doctor
    })))
}

#[axum::debug_handler]
pub async fn get_available_slots(
    State(state): State<DoctorCellState>,
    Path(doctor_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let doctor_id = parse_doctor_id(&doctor_id)?;
    let slots = state.doctor_service().available_slots(doctor_id).await?;

    Ok(Json(json!({
        "success": true,
        "doctorId": slots.doctor_id,
        "days": slots.days
    })))
}

// ==============================================================================
// AUTHENTICATED HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<DoctorCellState>,
    Extension(user): Extension<User>,
    JsonBody(request): JsonBody<BookSlotRequest>,
) -> Result<Json<Value>, AppError> {
    let patient_id = user
        .uuid()
        .ok_or_else(|| AppError::ValidationError("Invalid user ID format".to_string()))?;

    let booking = state.booking_committer().commit(patient_id, request).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Appointment Booked",
        "booking": booking
    })))
}

#[axum::debug_handler]
pub async fn create_doctor(
    State(state): State<DoctorCellState>,
    Extension(user): Extension<User>,
    JsonBody(request): JsonBody<CreateDoctorRequest>,
) -> Result<Json<Value>, AppError> {
    if !user.is_admin() {
        return Err(AppError::Forbidden("not permitted".to_string()));
    }

    let doctor = state.doctor_service().create_doctor(request).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Doctor Added",
        "doctor": doctor
    })))
}
