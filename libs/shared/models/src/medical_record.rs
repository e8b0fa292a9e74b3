use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecordType {
    LabResult,
    Prescription,
    Imaging,
    Report,
    Vaccination,
    #[default]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicalRecord {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub title: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub doctor_id: Option<Uuid>,
    #[serde(default)]
    pub record_type: RecordType,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMedicalRecordRequest {
    pub title: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub doctor_id: Option<Uuid>,
    #[serde(default)]
    pub record_type: RecordType,
    #[serde(default)]
    pub description: Option<String>,
    /// Base64 file body, optionally prefixed with a `data:<mime>;base64,` header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
}

impl CreateMedicalRecordRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Record title cannot be empty".to_string());
        }
        if self.file_data.is_some() && self.file_type.as_deref().map_or(true, str::is_empty) {
            return Err("file_type is required when file_data is provided".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateMedicalRecordRequest {
        CreateMedicalRecordRequest {
            title: "Blood panel".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            doctor_id: None,
            record_type: RecordType::LabResult,
            description: None,
            file_data: None,
            file_type: None,
        }
    }

    #[test]
    fn test_requires_title() {
        let mut req = request();
        assert!(req.validate().is_ok());
        req.title = "  ".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_file_requires_type() {
        let mut req = request();
        req.file_data = Some("aGVsbG8=".to_string());
        assert!(req.validate().is_err());
        req.file_type = Some("application/pdf".to_string());
        assert!(req.validate().is_ok());
    }
}
