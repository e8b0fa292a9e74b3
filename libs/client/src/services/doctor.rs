use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_models::user::{AvailabilityWindow, UserProfile};

use crate::error::ClientError;
use crate::http::ApiClient;

#[derive(Debug, Clone, Default, Serialize)]
pub struct DoctorFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

#[derive(Deserialize)]
struct DoctorList {
    doctors: Vec<UserProfile>,
}

#[derive(Deserialize)]
struct AvailabilityResponse {
    availability: Vec<AvailabilityWindow>,
}

#[derive(Debug, Clone)]
pub struct DoctorApi {
    api: ApiClient,
}

impl DoctorApi {
    pub fn new(api: &ApiClient) -> Self {
        Self { api: api.clone() }
    }

    pub async fn list(&self, filter: &DoctorFilter) -> Result<Vec<UserProfile>, ClientError> {
        let list: DoctorList = self.api.get_with_query("/doctors", filter).await?;
        Ok(list.doctors)
    }

    pub async fn get(&self, doctor_id: Uuid) -> Result<Option<UserProfile>, ClientError> {
        self.api.get_optional(&format!("/doctors/{}", doctor_id)).await
    }

    pub async fn availability(&self, doctor_id: Uuid) -> Result<Vec<AvailabilityWindow>, ClientError> {
        let resp: Option<AvailabilityResponse> = self
            .api
            .get_optional(&format!("/doctors/{}/availability", doctor_id))
            .await?;
        Ok(resp.map(|r| r.availability).unwrap_or_default())
    }
}
