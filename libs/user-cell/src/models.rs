use shared_models::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("User not found")]
    NotFound,

    #[error("Only doctors can update {0}")]
    DoctorOnly(&'static str),

    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for UserError {
    fn from(e: anyhow::Error) -> Self {
        UserError::Database(e.to_string())
    }
}

impl From<UserError> for AppError {
    fn from(e: UserError) -> Self {
        match e {
            UserError::NotFound => AppError::NotFound(e.to_string()),
            UserError::DoctorOnly(_) => AppError::Forbidden(e.to_string()),
            UserError::Validation(msg) => AppError::ValidationError(msg),
            UserError::Database(msg) => AppError::Database(msg),
        }
    }
}
