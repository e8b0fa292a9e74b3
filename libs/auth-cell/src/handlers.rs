use std::sync::Arc;

use axum::{
    extract::{Extension, Json, State},
    http::{HeaderMap, StatusCode},
};
use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_models::auth::{TokenResponse, User};
use shared_models::error::AppError;
use shared_models::user::{AuthResponse, LoginRequest, SignupRequest, UserProfile};
use shared_utils::extractor::extract_bearer_token;
use shared_utils::jwt;

use crate::services::AuthService;

#[axum::debug_handler]
pub async fn signup(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let service = AuthService::new(&config);
    let response = service.signup(request).await?;

    Ok((StatusCode::CREATED, Json(response)))
}

#[axum::debug_handler]
pub async fn login(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let service = AuthService::new(&config);
    let response = service.login(request).await?;

    Ok(Json(response))
}

pub async fn validate_token(
    State(config): State<Arc<AppConfig>>,
    headers: HeaderMap,
) -> Result<Json<TokenResponse>, AppError> {
    debug!("Validating token");

    let token = extract_bearer_token(&headers)?;

    let user = jwt::validate_token(&token, &config.jwt_secret).map_err(AppError::Auth)?;

    Ok(Json(TokenResponse {
        valid: true,
        user_id: user.id,
        email: user.email,
        role: user.role,
    }))
}

pub async fn verify_token(
    State(config): State<Arc<AppConfig>>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    debug!("Verifying token");

    let token = extract_bearer_token(&headers)?;
    let valid = jwt::validate_token(&token, &config.jwt_secret).is_ok();

    Ok(Json(json!({ "valid": valid })))
}

#[axum::debug_handler]
pub async fn me(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
) -> Result<Json<UserProfile>, AppError> {
    debug!("Getting profile for user: {}", user.id);

    let service = AuthService::new(&config);
    let profile = service.get_profile(&user.id).await?;

    Ok(Json(profile))
}
