use std::collections::BTreeSet;

use chrono::Utc;
use serde_json::{json, Value};
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::store::{eq, in_list, StoreClient};
use shared_models::auth::Role;
use shared_models::user::{AvailabilityWindow, UpdateProfileRequest, UserProfile};

use crate::models::UserError;

const USERS: &str = "users";
const APPOINTMENTS: &str = "appointments";

pub struct UserService {
    store: StoreClient,
}

impl UserService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: StoreClient::new(config),
        }
    }

    fn decode(row: Value) -> Result<UserProfile, UserError> {
        serde_json::from_value(row).map_err(|e| UserError::Database(format!("Failed to decode user: {}", e)))
    }

    pub async fn get_profile(&self, user_id: &str) -> Result<UserProfile, UserError> {
        debug!("Fetching profile for user: {}", user_id);

        let row = self
            .store
            .select_one(USERS, &eq("id", user_id))
            .await?
            .ok_or(UserError::NotFound)?;

        Self::decode(row)
    }

    pub async fn update_profile(
        &self,
        user_id: &str,
        role: Option<Role>,
        request: UpdateProfileRequest,
    ) -> Result<UserProfile, UserError> {
        debug!("Updating profile for user: {}", user_id);

        if request.touches_doctor_fields() && role != Some(Role::Doctor) {
            return Err(UserError::DoctorOnly("professional details"));
        }
        if let Some(ref name) = request.first_name {
            if name.trim().is_empty() {
                return Err(UserError::Validation("First name cannot be empty".to_string()));
            }
        }
        if let Some(ref name) = request.last_name {
            if name.trim().is_empty() {
                return Err(UserError::Validation("Last name cannot be empty".to_string()));
            }
        }
        if let Some(years) = request.years_of_experience {
            if years < 0 {
                return Err(UserError::Validation("Years of experience cannot be negative".to_string()));
            }
        }
        if request.is_empty() {
            return self.get_profile(user_id).await;
        }

        let mut patch = match serde_json::to_value(&request) {
            Ok(Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        };
        patch.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));

        let rows = self.store.update(USERS, &eq("id", user_id), Value::Object(patch)).await?;
        let row = rows.into_iter().next().ok_or(UserError::NotFound)?;

        info!("Profile updated for user {}", user_id);
        Self::decode(row)
    }

    pub async fn update_availability(
        &self,
        user_id: &str,
        role: Option<Role>,
        windows: Vec<AvailabilityWindow>,
    ) -> Result<UserProfile, UserError> {
        if role != Some(Role::Doctor) {
            return Err(UserError::DoctorOnly("availability"));
        }
        for window in &windows {
            window.validate().map_err(UserError::Validation)?;
        }
        debug!("Replacing {} availability windows for doctor {}", windows.len(), user_id);

        let patch = json!({
            "availability": windows,
            "updated_at": Utc::now().to_rfc3339(),
        });

        let rows = self.store.update(USERS, &eq("id", user_id), patch).await?;
        let row = rows.into_iter().next().ok_or(UserError::NotFound)?;
        Self::decode(row)
    }

    /// Patients who have at least one appointment with `doctor_id`.
    pub async fn get_doctor_patients(&self, doctor_id: &str) -> Result<Vec<UserProfile>, UserError> {
        debug!("Collecting patients for doctor: {}", doctor_id);

        let query = format!("{}&select=patient_id", eq("doctor_id", doctor_id));
        let appointments = self.store.select(APPOINTMENTS, &query).await?;

        let patient_ids: BTreeSet<String> = appointments
            .iter()
            .filter_map(|a| a["patient_id"].as_str().map(str::to_string))
            .collect();

        if patient_ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = format!("{}&order=last_name.asc", in_list("id", &patient_ids));
        let rows = self.store.select(USERS, &query).await?;

        rows.into_iter().map(Self::decode).collect()
    }
}
