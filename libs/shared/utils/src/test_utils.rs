use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::User;

use crate::jwt::issue_token;

pub struct TestConfig {
    pub jwt_secret: String,
    pub store_url: String,
    pub store_api_key: String,
    pub chat_service_url: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            store_url: "http://localhost:54321".to_string(),
            store_api_key: "test-api-key".to_string(),
            chat_service_url: "http://localhost:5001".to_string(),
        }
    }
}

impl TestConfig {
    /// Default config pointed at a mock store.
    pub fn with_store(store_url: &str) -> Self {
        Self {
            store_url: store_url.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            store_url: self.store_url.clone(),
            store_api_key: self.store_api_key.clone(),
            jwt_secret: self.jwt_secret.clone(),
            token_ttl_hours: 24,
            chat_service_url: self.chat_service_url.clone(),
            port: 3000,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct TestUser {
    pub id: String,
    pub email: String,
    pub role: String,
}

impl Default for TestUser {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: "test@example.com".to_string(),
            role: "patient".to_string(),
        }
    }
}

impl TestUser {
    pub fn new(email: &str, role: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            role: role.to_string(),
        }
    }

    pub fn doctor(email: &str) -> Self {
        Self::new(email, "doctor")
    }

    pub fn patient(email: &str) -> Self {
        Self::new(email, "patient")
    }

    pub fn admin(email: &str) -> Self {
        Self::new(email, "admin")
    }

    pub fn to_user(&self) -> User {
        User {
            id: self.id.clone(),
            email: Some(self.email.clone()),
            role: Some(self.role.clone()),
            created_at: Some(Utc::now()),
        }
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(user: &TestUser, secret: &str, exp_hours: Option<i64>) -> String {
        issue_token(&user.id, &user.email, &user.role, secret, exp_hours.unwrap_or(24))
            .unwrap_or_else(|e| panic!("test token could not be issued: {}", e))
    }

    pub fn create_expired_token(user: &TestUser, secret: &str) -> String {
        Self::create_test_token(user, secret, Some(-1))
    }

    pub fn create_invalid_signature_token(user: &TestUser) -> String {
        Self::create_test_token(user, "wrong-secret", Some(24))
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }
}

/// Canned document-store rows shaped like the real collections.
pub struct MockStoreResponses;

impl MockStoreResponses {
    pub fn user_row(user_id: &str, email: &str, role: &str) -> serde_json::Value {
        json!({
            "id": user_id,
            "first_name": "Test",
            "last_name": "User",
            "email": email,
            "phone": null,
            "role": role,
            "profile_picture": null,
            "availability": [],
            "created_at": "2026-01-01T00:00:00Z",
            "updated_at": "2026-01-01T00:00:00Z"
        })
    }

    pub fn doctor_row(doctor_id: &str, specialty: &str) -> serde_json::Value {
        json!({
            "id": doctor_id,
            "first_name": "Gregory",
            "last_name": "House",
            "email": "house@example.com",
            "phone": "+15550100",
            "role": "doctor",
            "profile_picture": null,
            "specialty": specialty,
            "license_number": "MD123456",
            "years_of_experience": 12,
            "medical_school": "Johns Hopkins",
            "rating": 4.7,
            "review_count": 31,
            "is_verified": true,
            "availability": [
                { "day_of_week": 1, "start_time": "09:00", "end_time": "17:00" }
            ],
            "created_at": "2026-01-01T00:00:00Z",
            "updated_at": "2026-01-01T00:00:00Z"
        })
    }

    pub fn appointment_row(
        appointment_id: &str,
        patient_id: &str,
        doctor_id: &str,
        status: &str,
    ) -> serde_json::Value {
        json!({
            "id": appointment_id,
            "patient_id": patient_id,
            "doctor_id": doctor_id,
            "appointment_date": "2026-11-02",
            "appointment_time": "10:30 AM",
            "appointment_type": "consultation",
            "mode": "in_person",
            "reason": "Persistent cough",
            "notes": null,
            "status": status,
            "created_at": "2026-10-01T00:00:00Z",
            "updated_at": "2026-10-01T00:00:00Z"
        })
    }

    pub fn medical_record_row(record_id: &str, patient_id: &str) -> serde_json::Value {
        json!({
            "id": record_id,
            "patient_id": patient_id,
            "title": "Blood panel",
            "date": "2026-09-01",
            "doctor_id": null,
            "record_type": "lab_result",
            "file_url": null,
            "description": "Routine labs",
            "created_at": "2026-09-01T12:00:00Z"
        })
    }

    pub fn health_metric_row(metric_id: &str, patient_id: &str) -> serde_json::Value {
        json!({
            "id": metric_id,
            "patient_id": patient_id,
            "blood_pressure": "118/76",
            "heart_rate": 68,
            "weight": 70.0,
            "height": 175.0,
            "bmi": 22.9,
            "last_updated": "2026-10-10T08:00:00Z"
        })
    }

    pub fn error_response(message: &str, code: &str) -> serde_json::Value {
        json!({
            "message": message,
            "code": code
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::validate_token;

    #[test]
    fn test_config_creation() {
        let config = TestConfig::default();
        let app_config = config.to_app_config();

        assert_eq!(app_config.store_url, "http://localhost:54321");
        assert_eq!(app_config.store_api_key, "test-api-key");
        assert!(!app_config.jwt_secret.is_empty());
    }

    #[test]
    fn test_user_creation() {
        let user = TestUser::doctor("doc@example.com");
        assert_eq!(user.email, "doc@example.com");
        assert_eq!(user.role, "doctor");

        let user_model = user.to_user();
        assert_eq!(user_model.email, Some(user.email.clone()));
        assert_eq!(user_model.role, Some(user.role.clone()));
        assert_eq!(user_model.id, user.id);
    }

    #[test]
    fn test_jwt_token_creation_validates() {
        let config = TestConfig::default();
        let user = TestUser::default();
        let token = JwtTestUtils::create_test_token(&user, &config.jwt_secret, Some(1));

        assert_eq!(token.split('.').count(), 3);
        assert_eq!(validate_token(&token, &config.jwt_secret).unwrap().id, user.id);
        assert!(validate_token(&JwtTestUtils::create_invalid_signature_token(&user), &config.jwt_secret).is_err());
    }

    #[test]
    fn test_mock_rows_deserialize() {
        let doctor: shared_models::user::UserProfile =
            serde_json::from_value(MockStoreResponses::doctor_row(&Uuid::new_v4().to_string(), "Cardiology")).unwrap();
        assert!(doctor.is_doctor());

        let appt: shared_models::appointment::Appointment = serde_json::from_value(
            MockStoreResponses::appointment_row(
                &Uuid::new_v4().to_string(),
                &Uuid::new_v4().to_string(),
                &Uuid::new_v4().to_string(),
                "scheduled",
            ),
        )
        .unwrap();
        assert_eq!(appt.appointment_time, "10:30 AM");
    }
}
