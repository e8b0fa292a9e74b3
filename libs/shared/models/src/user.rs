use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::Role;

/// Public view of a user record. The stored password hash is never part of it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub profile_picture: Option<String>,

    // Doctor-only fields
    #[serde(default)]
    pub specialty: Option<String>,
    #[serde(default)]
    pub license_number: Option<String>,
    #[serde(default)]
    pub years_of_experience: Option<i32>,
    #[serde(default)]
    pub medical_school: Option<String>,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub review_count: Option<i32>,
    #[serde(default)]
    pub is_verified: Option<bool>,
    #[serde(default)]
    pub availability: Vec<AvailabilityWindow>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_doctor(&self) -> bool {
        self.role == Role::Doctor
    }

    pub fn summary(&self) -> PersonSummary {
        PersonSummary {
            id: self.id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            specialty: self.specialty.clone(),
            profile_picture: self.profile_picture.clone(),
        }
    }
}

/// Compact user reference embedded in appointment listings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersonSummary {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub specialty: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
}

/// Weekly recurring window during which a doctor sees patients.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AvailabilityWindow {
    pub day_of_week: u8, // 0 = Sunday
    pub start_time: String,
    pub end_time: String,
}

impl AvailabilityWindow {
    pub fn validate(&self) -> Result<(), String> {
        if self.day_of_week > 6 {
            return Err(format!("day_of_week must be 0-6, got {}", self.day_of_week));
        }
        let start = parse_clock(&self.start_time)?;
        let end = parse_clock(&self.end_time)?;
        if start >= end {
            return Err(format!(
                "start_time {} must be before end_time {}",
                self.start_time, self.end_time
            ));
        }
        Ok(())
    }
}

fn parse_clock(value: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|_| format!("Invalid time '{}', expected HH:MM", value))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub specialty: Option<String>,
    #[serde(default)]
    pub license_number: Option<String>,
    #[serde(default)]
    pub years_of_experience: Option<i32>,
    #[serde(default)]
    pub medical_school: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

/// Partial profile update; absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub years_of_experience: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_school: Option<String>,
}

impl UpdateProfileRequest {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.phone.is_none()
            && self.profile_picture.is_none()
            && self.specialty.is_none()
            && self.license_number.is_none()
            && self.years_of_experience.is_none()
            && self.medical_school.is_none()
    }

    pub fn touches_doctor_fields(&self) -> bool {
        self.specialty.is_some()
            || self.license_number.is_some()
            || self.years_of_experience.is_some()
            || self.medical_school.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAvailabilityRequest {
    pub availability: Vec<AvailabilityWindow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(day: u8, start: &str, end: &str) -> AvailabilityWindow {
        AvailabilityWindow {
            day_of_week: day,
            start_time: start.to_string(),
            end_time: end.to_string(),
        }
    }

    #[test]
    fn test_availability_window_validation() {
        assert!(window(1, "09:00", "17:00").validate().is_ok());
        assert!(window(7, "09:00", "17:00").validate().is_err());
        assert!(window(1, "17:00", "09:00").validate().is_err());
        assert!(window(1, "9am", "17:00").validate().is_err());
    }

    #[test]
    fn test_profile_deserializes_without_doctor_fields() {
        let profile: UserProfile = serde_json::from_value(serde_json::json!({
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "first_name": "Ada",
            "last_name": "Patient",
            "email": "ada@example.com",
            "role": "patient",
            "password_hash": "$argon2id$..."
        }))
        .unwrap();

        assert_eq!(profile.full_name(), "Ada Patient");
        assert!(!profile.is_doctor());
        assert!(profile.availability.is_empty());

        let json = serde_json::to_value(&profile).unwrap();
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn test_update_profile_request_flags() {
        let empty = UpdateProfileRequest::default();
        assert!(empty.is_empty());

        let doctor_update = UpdateProfileRequest {
            specialty: Some("Cardiology".to_string()),
            ..Default::default()
        };
        assert!(!doctor_update.is_empty());
        assert!(doctor_update.touches_doctor_fields());
    }
}
