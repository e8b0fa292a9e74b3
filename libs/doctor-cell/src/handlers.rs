use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::error::AppError;
use shared_models::user::UserProfile;

use crate::models::{DoctorAvailabilityResponse, DoctorSearchQuery};
use crate::services::DoctorService;

fn parse_doctor_id(doctor_id: &str) -> Result<(), AppError> {
    Uuid::parse_str(doctor_id)
        .map(|_| ())
        .map_err(|_| AppError::BadRequest("Invalid doctor id".to_string()))
}

#[axum::debug_handler]
pub async fn list_doctors(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<DoctorSearchQuery>,
) -> Result<Json<Value>, AppError> {
    let doctor_service = DoctorService::new(&state);

    let doctors = doctor_service.list_doctors(&query).await?;

    Ok(Json(json!({
        "doctors": doctors,
        "total": doctors.len()
    })))
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<String>,
) -> Result<Json<UserProfile>, AppError> {
    parse_doctor_id(&doctor_id)?;
    let doctor_service = DoctorService::new(&state);

    let doctor = doctor_service.get_doctor(&doctor_id).await?;

    Ok(Json(doctor))
}

#[axum::debug_handler]
pub async fn get_doctor_availability(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<String>,
) -> Result<Json<DoctorAvailabilityResponse>, AppError> {
    parse_doctor_id(&doctor_id)?;
    let doctor_service = DoctorService::new(&state);

    let availability = doctor_service.get_availability(&doctor_id).await?;

    Ok(Json(availability))
}
