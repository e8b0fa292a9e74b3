pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::MedicalRecordError;
pub use router::medical_record_routes;
pub use services::MedicalRecordService;
