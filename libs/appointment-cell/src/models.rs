// libs/appointment-cell/src/models.rs
use serde::Deserialize;

use shared_models::appointment::AppointmentStatus;
use shared_models::error::AppError;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppointmentListQuery {
    pub status: Option<AppointmentStatus>,
    /// Only appointments dated today or later.
    pub upcoming: Option<bool>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("{0}")]
    Validation(String),

    #[error("Unauthorized access to appointment")]
    Unauthorized,

    #[error("Only patients can book appointments")]
    PatientsOnly,

    #[error("Patients may only cancel appointments")]
    PatientMayOnlyCancel,

    #[error("Cannot change appointment status from {from} to {to}")]
    InvalidStatusTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for AppointmentError {
    fn from(e: anyhow::Error) -> Self {
        AppointmentError::Database(e.to_string())
    }
}

impl From<AppointmentError> for AppError {
    fn from(e: AppointmentError) -> Self {
        match e {
            AppointmentError::NotFound | AppointmentError::DoctorNotFound => AppError::NotFound(e.to_string()),
            AppointmentError::Validation(msg) => AppError::ValidationError(msg),
            AppointmentError::Unauthorized
            | AppointmentError::PatientsOnly
            | AppointmentError::PatientMayOnlyCancel => AppError::Forbidden(e.to_string()),
            AppointmentError::InvalidStatusTransition { .. } => AppError::Conflict(e.to_string()),
            AppointmentError::Database(msg) => AppError::Database(msg),
        }
    }
}
