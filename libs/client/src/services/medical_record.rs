use serde::Deserialize;
use uuid::Uuid;

use shared_models::medical_record::{CreateMedicalRecordRequest, MedicalRecord};

use crate::error::ClientError;
use crate::http::ApiClient;

#[derive(Deserialize)]
struct RecordList {
    records: Vec<MedicalRecord>,
}

#[derive(Debug, Clone)]
pub struct MedicalRecordApi {
    api: ApiClient,
}

impl MedicalRecordApi {
    pub fn new(api: &ApiClient) -> Self {
        Self { api: api.clone() }
    }

    pub async fn list(&self) -> Result<Vec<MedicalRecord>, ClientError> {
        let list: Option<RecordList> = self.api.get_optional("/medical-records").await?;
        Ok(list.map(|l| l.records).unwrap_or_default())
    }

    pub async fn upload(&self, request: &CreateMedicalRecordRequest) -> Result<MedicalRecord, ClientError> {
        request.validate().map_err(ClientError::Validation)?;
        self.api.post("/medical-records", request).await
    }

    pub async fn get(&self, record_id: Uuid) -> Result<Option<MedicalRecord>, ClientError> {
        self.api.get_optional(&format!("/medical-records/{}", record_id)).await
    }

    pub async fn delete(&self, record_id: Uuid) -> Result<(), ClientError> {
        self.api.delete(&format!("/medical-records/{}", record_id)).await
    }

    pub async fn for_patient(&self, patient_id: Uuid) -> Result<Vec<MedicalRecord>, ClientError> {
        let list: Option<RecordList> = self
            .api
            .get_optional(&format!("/medical-records/patient/{}", patient_id))
            .await?;
        Ok(list.map(|l| l.records).unwrap_or_default())
    }
}
