use shared_models::error::AppError;

#[derive(Debug, Clone, thiserror::Error)]
pub enum MedicalRecordError {
    #[error("Medical record not found")]
    NotFound,

    #[error("{0}")]
    Validation(String),

    #[error("Failed to decode file data: {0}")]
    InvalidFile(String),

    #[error("Unauthorized access to medical record")]
    Unauthorized,

    #[error("Doctor has no appointments with this patient")]
    NotTreatingDoctor,

    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for MedicalRecordError {
    fn from(e: anyhow::Error) -> Self {
        MedicalRecordError::Database(e.to_string())
    }
}

impl From<MedicalRecordError> for AppError {
    fn from(e: MedicalRecordError) -> Self {
        match e {
            MedicalRecordError::NotFound => AppError::NotFound(e.to_string()),
            MedicalRecordError::Validation(msg) => AppError::ValidationError(msg),
            MedicalRecordError::InvalidFile(_) => AppError::BadRequest(e.to_string()),
            MedicalRecordError::Unauthorized | MedicalRecordError::NotTreatingDoctor => {
                AppError::Forbidden(e.to_string())
            }
            MedicalRecordError::Database(msg) => AppError::Database(msg),
        }
    }
}
