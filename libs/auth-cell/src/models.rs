use serde::Deserialize;
use uuid::Uuid;

use shared_models::error::AppError;

/// The slice of a stored user row needed to check a password.
#[derive(Debug, Clone, Deserialize)]
pub struct StoredCredentials {
    pub id: Uuid,
    pub email: String,
    pub role: String,
    pub password_hash: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("An account with this email already exists")]
    EmailTaken,

    #[error("User not found")]
    UserNotFound,

    #[error("{0}")]
    Validation(String),

    #[error("Token error: {0}")]
    Token(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for AuthError {
    fn from(e: anyhow::Error) -> Self {
        AuthError::Database(e.to_string())
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidCredentials => AppError::Auth(e.to_string()),
            AuthError::EmailTaken => AppError::Conflict(e.to_string()),
            AuthError::UserNotFound => AppError::NotFound(e.to_string()),
            AuthError::Validation(msg) => AppError::ValidationError(msg),
            AuthError::Token(msg) | AuthError::Hashing(msg) => AppError::Internal(msg),
            AuthError::Database(msg) => AppError::Database(msg),
        }
    }
}
