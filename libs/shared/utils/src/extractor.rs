use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};

use shared_config::AppConfig;
use shared_models::auth::{Role, User};
use shared_models::error::AppError;

use crate::jwt::validate_token;

pub fn extract_bearer_token(headers: &HeaderMap) -> Result<String, AppError> {
    let auth_header = headers
        .get("Authorization")
        .ok_or_else(|| AppError::Auth("Missing authorization header".to_string()))?;

    let auth_value = auth_header
        .to_str()
        .map_err(|_| AppError::Auth("Invalid authorization header format".to_string()))?;

    auth_value
        .strip_prefix("Bearer ")
        .map(str::to_string)
        .ok_or_else(|| AppError::Auth("Invalid authorization header format".to_string()))
}

/// Validates the bearer token and stores the decoded [`User`] in request extensions.
pub async fn auth_middleware(
    State(config): State<Arc<AppConfig>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(request.headers())?;

    let user = validate_token(&token, &config.jwt_secret).map_err(AppError::Auth)?;

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

pub fn require_role(user: &User, role: Role) -> Result<(), AppError> {
    if user.is(role) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!("This action requires the {} role", role)))
    }
}

/// The caller's id as a UUID; tokens for non-UUID subjects are rejected.
pub fn user_uuid(user: &User) -> Result<uuid::Uuid, AppError> {
    uuid::Uuid::parse_str(&user.id)
        .map_err(|_| AppError::Auth("Token subject is not a valid user id".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_bearer_token() {
        let mut headers = HeaderMap::new();
        assert!(extract_bearer_token(&headers).is_err());

        headers.insert("Authorization", HeaderValue::from_static("Basic abc"));
        assert!(extract_bearer_token(&headers).is_err());

        headers.insert("Authorization", HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(extract_bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_require_role() {
        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            email: None,
            role: Some("patient".to_string()),
            created_at: None,
        };
        assert!(require_role(&user, Role::Patient).is_ok());
        assert!(matches!(require_role(&user, Role::Doctor), Err(AppError::Forbidden(_))));
        assert!(user_uuid(&user).is_ok());
    }
}
