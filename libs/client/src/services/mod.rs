//! One wrapper per backend resource.

pub mod appointment;
pub mod auth;
pub mod chat;
pub mod doctor;
pub mod health_metrics;
pub mod medical_record;
pub mod user;

pub use appointment::AppointmentApi;
pub use auth::AuthApi;
pub use chat::ChatApi;
pub use doctor::{DoctorApi, DoctorFilter};
pub use health_metrics::HealthMetricsApi;
pub use medical_record::MedicalRecordApi;
pub use user::UserApi;
