use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::{Role, User};
use shared_models::error::AppError;
use shared_models::medical_record::{CreateMedicalRecordRequest, MedicalRecord};
use shared_utils::extractor::{require_role, user_uuid};

use crate::services::MedicalRecordService;

fn parse_id(raw: &str, what: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest(format!("Invalid {} id", what)))
}

#[axum::debug_handler]
pub async fn list_records(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, Role::Patient)?;
    let patient_id = user_uuid(&user)?;

    let service = MedicalRecordService::new(&state);
    let records = service.list_records(patient_id).await?;

    Ok(Json(json!({
        "records": records,
        "total": records.len()
    })))
}

#[axum::debug_handler]
pub async fn create_record(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
    Json(request): Json<CreateMedicalRecordRequest>,
) -> Result<(StatusCode, Json<MedicalRecord>), AppError> {
    require_role(&user, Role::Patient)?;
    let patient_id = user_uuid(&user)?;

    let service = MedicalRecordService::new(&state);
    let record = service.create_record(patient_id, request).await?;

    Ok((StatusCode::CREATED, Json(record)))
}

#[axum::debug_handler]
pub async fn get_record(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
    Path(record_id): Path<String>,
) -> Result<Json<MedicalRecord>, AppError> {
    let record_id = parse_id(&record_id, "record")?;
    let patient_id = user_uuid(&user)?;

    let service = MedicalRecordService::new(&state);
    let record = service.get_record(record_id, patient_id).await?;

    Ok(Json(record))
}

#[axum::debug_handler]
pub async fn delete_record(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
    Path(record_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let record_id = parse_id(&record_id, "record")?;
    let patient_id = user_uuid(&user)?;

    let service = MedicalRecordService::new(&state);
    service.delete_record(record_id, patient_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn get_patient_records(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
    Path(patient_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, Role::Doctor)?;
    let patient_id = parse_id(&patient_id, "patient")?;
    let doctor_id = user_uuid(&user)?;

    let service = MedicalRecordService::new(&state);
    let records = service.records_for_doctor(doctor_id, patient_id).await?;

    Ok(Json(json!({
        "records": records,
        "total": records.len()
    })))
}
