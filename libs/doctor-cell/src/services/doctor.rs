use serde_json::Value;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::store::{eq, StoreClient};
use shared_models::user::UserProfile;

use crate::models::{DoctorAvailabilityResponse, DoctorError, DoctorSearchQuery};

const USERS: &str = "users";

pub struct DoctorService {
    store: StoreClient,
}

impl DoctorService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: StoreClient::new(config),
        }
    }

    fn decode(row: Value) -> Result<UserProfile, DoctorError> {
        serde_json::from_value(row).map_err(|e| DoctorError::Database(format!("Failed to decode doctor: {}", e)))
    }

    /// Search doctors with filters
    pub async fn list_doctors(&self, query: &DoctorSearchQuery) -> Result<Vec<UserProfile>, DoctorError> {
        debug!("Searching doctors with filters: {:?}", query);

        let rows = self.store.select(USERS, &query.to_store_query()).await?;
        rows.into_iter().map(Self::decode).collect()
    }

    /// Get doctor by ID
    pub async fn get_doctor(&self, doctor_id: &str) -> Result<UserProfile, DoctorError> {
        debug!("Fetching doctor profile: {}", doctor_id);

        let query = format!("{}&role=eq.doctor", eq("id", doctor_id));
        let row = self
            .store
            .select_one(USERS, &query)
            .await?
            .ok_or(DoctorError::NotFound)?;

        Self::decode(row)
    }

    pub async fn get_availability(&self, doctor_id: &str) -> Result<DoctorAvailabilityResponse, DoctorError> {
        let doctor = self.get_doctor(doctor_id).await?;

        Ok(DoctorAvailabilityResponse {
            doctor_id: doctor.id.to_string(),
            availability: doctor.availability,
        })
    }
}
