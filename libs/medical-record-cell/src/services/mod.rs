pub mod record;

pub use record::MedicalRecordService;
