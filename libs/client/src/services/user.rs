use serde::Deserialize;

use shared_models::user::{AvailabilityWindow, UpdateAvailabilityRequest, UpdateProfileRequest, UserProfile};

use crate::error::ClientError;
use crate::http::ApiClient;

#[derive(Deserialize)]
struct PatientList {
    patients: Vec<UserProfile>,
}

#[derive(Debug, Clone)]
pub struct UserApi {
    api: ApiClient,
}

impl UserApi {
    pub fn new(api: &ApiClient) -> Self {
        Self { api: api.clone() }
    }

    pub async fn profile(&self) -> Result<UserProfile, ClientError> {
        self.api.get("/users/profile").await
    }

    pub async fn update_profile(&self, request: &UpdateProfileRequest) -> Result<UserProfile, ClientError> {
        self.api.put("/users/profile", request).await
    }

    pub async fn update_availability(&self, availability: Vec<AvailabilityWindow>) -> Result<UserProfile, ClientError> {
        self.api
            .put("/users/availability", &UpdateAvailabilityRequest { availability })
            .await
    }

    /// Distinct patients with at least one appointment with the signed-in doctor.
    pub async fn patients(&self) -> Result<Vec<UserProfile>, ClientError> {
        let list: PatientList = self.api.get("/users/patients").await?;
        Ok(list.patients)
    }
}
