use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::{Role, User};
use shared_models::error::AppError;
use shared_models::user::{UpdateAvailabilityRequest, UpdateProfileRequest, UserProfile};
use shared_utils::extractor::require_role;

use crate::services::UserService;

#[axum::debug_handler]
pub async fn get_profile(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
) -> Result<Json<UserProfile>, AppError> {
    let service = UserService::new(&config);
    let profile = service.get_profile(&user.id).await?;

    Ok(Json(profile))
}

#[axum::debug_handler]
pub async fn update_profile(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<UserProfile>, AppError> {
    let service = UserService::new(&config);
    let profile = service.update_profile(&user.id, user.role(), request).await?;

    Ok(Json(profile))
}

#[axum::debug_handler]
pub async fn update_availability(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
    Json(request): Json<UpdateAvailabilityRequest>,
) -> Result<Json<UserProfile>, AppError> {
    let service = UserService::new(&config);
    let profile = service
        .update_availability(&user.id, user.role(), request.availability)
        .await?;

    Ok(Json(profile))
}

#[axum::debug_handler]
pub async fn get_my_patients(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, Role::Doctor)?;

    let service = UserService::new(&config);
    let patients = service.get_doctor_patients(&user.id).await?;

    Ok(Json(json!({
        "patients": patients,
        "total": patients.len()
    })))
}
