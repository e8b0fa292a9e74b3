use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::Utc;
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::store::{eq, StoreClient};
use shared_models::medical_record::{CreateMedicalRecordRequest, MedicalRecord};

use crate::models::MedicalRecordError;

const MEDICAL_RECORDS: &str = "medical_records";
const APPOINTMENTS: &str = "appointments";
pub const RECORDS_BUCKET: &str = "medical-records";

/// Strips an optional `data:<mime>;base64,` prefix and decodes the rest.
pub fn decode_file_data(file_data: &str) -> Result<Vec<u8>, MedicalRecordError> {
    let payload = match file_data.split_once(";base64,") {
        Some((_, rest)) => rest,
        None => file_data,
    };

    BASE64
        .decode(payload.trim())
        .map_err(|e| MedicalRecordError::InvalidFile(e.to_string()))
}

/// File extension for a MIME type such as `application/pdf`.
pub fn file_extension(file_type: &str) -> &str {
    match file_type.rsplit_once('/') {
        Some((_, ext)) if !ext.is_empty() => ext,
        Some(_) => "bin",
        None if file_type.is_empty() => "bin",
        None => file_type,
    }
}

pub struct MedicalRecordService {
    store: StoreClient,
}

impl MedicalRecordService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: StoreClient::new(config),
        }
    }

    fn decode(row: Value) -> Result<MedicalRecord, MedicalRecordError> {
        serde_json::from_value(row)
            .map_err(|e| MedicalRecordError::Database(format!("Failed to decode medical record: {}", e)))
    }

    pub async fn list_records(&self, patient_id: Uuid) -> Result<Vec<MedicalRecord>, MedicalRecordError> {
        debug!("Fetching medical records for patient: {}", patient_id);

        let query = format!("{}&order=date.desc", eq("patient_id", &patient_id.to_string()));
        let rows = self.store.select(MEDICAL_RECORDS, &query).await?;

        rows.into_iter().map(Self::decode).collect()
    }

    pub async fn create_record(
        &self,
        patient_id: Uuid,
        request: CreateMedicalRecordRequest,
    ) -> Result<MedicalRecord, MedicalRecordError> {
        request.validate().map_err(MedicalRecordError::Validation)?;

        let record_id = Uuid::new_v4();

        let file_url = match (request.file_data.as_deref(), request.file_type.as_deref()) {
            (Some(data), Some(file_type)) => {
                let bytes = decode_file_data(data)?;
                let object_path = format!("{}/{}.{}", patient_id, record_id, file_extension(file_type));
                debug!("Uploading medical record file to {}", object_path);

                Some(
                    self.store
                        .upload_object(RECORDS_BUCKET, &object_path, bytes, file_type)
                        .await?,
                )
            }
            _ => None,
        };

        let row = json!({
            "id": record_id,
            "patient_id": patient_id,
            "title": request.title.trim(),
            "date": request.date,
            "doctor_id": request.doctor_id,
            "record_type": request.record_type,
            "file_url": file_url,
            "description": request.description,
            "created_at": Utc::now().to_rfc3339(),
        });

        let stored = self.store.insert(MEDICAL_RECORDS, row).await?;
        info!("Medical record {} created for patient {}", record_id, patient_id);

        Self::decode(stored)
    }

    async fn fetch_record(&self, record_id: Uuid) -> Result<MedicalRecord, MedicalRecordError> {
        let row = self
            .store
            .select_one(MEDICAL_RECORDS, &eq("id", &record_id.to_string()))
            .await?
            .ok_or(MedicalRecordError::NotFound)?;

        Self::decode(row)
    }

    pub async fn get_record(&self, record_id: Uuid, patient_id: Uuid) -> Result<MedicalRecord, MedicalRecordError> {
        let record = self.fetch_record(record_id).await?;

        if record.patient_id != patient_id {
            return Err(MedicalRecordError::Unauthorized);
        }

        Ok(record)
    }

    /// Removes the record and, when present, its stored file.
    pub async fn delete_record(&self, record_id: Uuid, patient_id: Uuid) -> Result<(), MedicalRecordError> {
        let record = self.get_record(record_id, patient_id).await?;

        if let Some(url) = record.file_url.as_deref() {
            match self.store.object_path_from_url(RECORDS_BUCKET, url) {
                Some(object_path) => {
                    if let Err(e) = self.store.delete_object(RECORDS_BUCKET, object_path).await {
                        warn!("Failed to delete stored file for record {}: {}", record_id, e);
                    }
                }
                None => warn!("Record {} has a file url outside the records bucket", record_id),
            }
        }

        self.store
            .delete(MEDICAL_RECORDS, &eq("id", &record_id.to_string()))
            .await?;

        info!("Medical record {} deleted", record_id);
        Ok(())
    }

    /// Records of a patient, visible to a doctor who has at least one appointment with them.
    pub async fn records_for_doctor(
        &self,
        doctor_id: Uuid,
        patient_id: Uuid,
    ) -> Result<Vec<MedicalRecord>, MedicalRecordError> {
        let query = format!(
            "{}&{}&select=id&limit=1",
            eq("doctor_id", &doctor_id.to_string()),
            eq("patient_id", &patient_id.to_string())
        );

        if self.store.select_one(APPOINTMENTS, &query).await?.is_none() {
            return Err(MedicalRecordError::NotTreatingDoctor);
        }

        self.list_records(patient_id).await
    }
}
