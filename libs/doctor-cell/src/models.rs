use serde::{Deserialize, Serialize};

use shared_models::error::AppError;
use shared_models::user::AvailabilityWindow;

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DoctorSearchQuery {
    pub specialty: Option<String>,
    pub verified_only: Option<bool>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl DoctorSearchQuery {
    /// Store query string for this search. Doctors are users with the doctor role.
    pub fn to_store_query(&self) -> String {
        let mut parts = vec!["role=eq.doctor".to_string()];

        if let Some(ref specialty) = self.specialty {
            let specialty = specialty.trim();
            if !specialty.is_empty() {
                parts.push(format!("specialty=ilike.*{}*", urlencoding::encode(specialty)));
            }
        }
        if self.verified_only.unwrap_or(false) {
            parts.push("is_verified=eq.true".to_string());
        }

        let limit = self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        parts.push("order=rating.desc.nullslast,last_name.asc".to_string());
        parts.push(format!("limit={}", limit));
        parts.push(format!("offset={}", self.offset.unwrap_or(0)));

        parts.join("&")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorAvailabilityResponse {
    pub doctor_id: String,
    pub availability: Vec<AvailabilityWindow>,
}

#[derive(Debug, thiserror::Error)]
pub enum DoctorError {
    #[error("Doctor not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for DoctorError {
    fn from(e: anyhow::Error) -> Self {
        DoctorError::Database(e.to_string())
    }
}

impl From<DoctorError> for AppError {
    fn from(e: DoctorError) -> Self {
        match e {
            DoctorError::NotFound => AppError::NotFound(e.to_string()),
            DoctorError::Database(msg) => AppError::Database(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_query() {
        let query = DoctorSearchQuery::default().to_store_query();
        assert!(query.starts_with("role=eq.doctor"));
        assert!(query.contains("limit=20"));
        assert!(query.contains("offset=0"));
        assert!(!query.contains("is_verified"));
    }

    #[test]
    fn test_filters_and_limit_clamp() {
        let query = DoctorSearchQuery {
            specialty: Some("Family Medicine".to_string()),
            verified_only: Some(true),
            limit: Some(1000),
            offset: Some(40),
        }
        .to_store_query();

        assert!(query.contains("specialty=ilike.*Family%20Medicine*"));
        assert!(query.contains("is_verified=eq.true"));
        assert!(query.contains("limit=100"));
        assert!(query.contains("offset=40"));
    }
}
