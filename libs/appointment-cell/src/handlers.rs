use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::appointment::{Appointment, CreateAppointmentRequest, UpdateAppointmentStatusRequest};
use shared_models::auth::{Role, User};
use shared_models::error::AppError;
use shared_utils::extractor::user_uuid;

use crate::models::{AppointmentError, AppointmentListQuery};
use crate::services::AppointmentBookingService;

fn parse_appointment_id(appointment_id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(appointment_id).map_err(|_| AppError::BadRequest("Invalid appointment id".to_string()))
}

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
    Json(request): Json<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<Appointment>), AppError> {
    if !user.is(Role::Patient) {
        return Err(AppointmentError::PatientsOnly.into());
    }
    let patient_id = user_uuid(&user)?;

    let booking_service = AppointmentBookingService::new(&state);
    let appointment = booking_service.book_appointment(patient_id, request).await?;

    Ok((StatusCode::CREATED, Json(appointment)))
}

#[axum::debug_handler]
pub async fn get_my_appointments(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
    Query(query): Query<AppointmentListQuery>,
) -> Result<Json<Value>, AppError> {
    let user_id = user_uuid(&user)?;

    let booking_service = AppointmentBookingService::new(&state);
    let appointments = booking_service.my_appointments(user_id, user.role(), &query).await?;

    Ok(Json(json!({
        "appointments": appointments,
        "total": appointments.len()
    })))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
    Path(appointment_id): Path<String>,
) -> Result<Json<Appointment>, AppError> {
    let appointment_id = parse_appointment_id(&appointment_id)?;
    let user_id = user_uuid(&user)?;

    let booking_service = AppointmentBookingService::new(&state);
    let appointment = booking_service
        .get_appointment(appointment_id, user_id, user.role())
        .await?;

    Ok(Json(appointment))
}

#[axum::debug_handler]
pub async fn update_appointment_status(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
    Path(appointment_id): Path<String>,
    Json(request): Json<UpdateAppointmentStatusRequest>,
) -> Result<Json<Appointment>, AppError> {
    let appointment_id = parse_appointment_id(&appointment_id)?;
    let user_id = user_uuid(&user)?;

    let booking_service = AppointmentBookingService::new(&state);
    let appointment = booking_service
        .update_status(appointment_id, user_id, user.role(), request.status)
        .await?;

    Ok(Json(appointment))
}
