use chrono::Utc;
use serde_json::{json, Value};
use tracing::{debug, info};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::store::{eq, StoreClient};
use shared_models::health::{HealthMetric, RecordHealthMetricRequest};

use crate::models::HealthMetricsError;

const HEALTH_METRICS: &str = "health_metrics";

pub struct HealthMetricsService {
    store: StoreClient,
}

impl HealthMetricsService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: StoreClient::new(config),
        }
    }

    fn decode(row: Value) -> Result<HealthMetric, HealthMetricsError> {
        serde_json::from_value(row)
            .map_err(|e| HealthMetricsError::Database(format!("Failed to decode health metric: {}", e)))
    }

    /// Stores a new reading. BMI is derived here when both weight and height are given.
    pub async fn record_metric(
        &self,
        patient_id: Uuid,
        request: RecordHealthMetricRequest,
    ) -> Result<HealthMetric, HealthMetricsError> {
        request.validate().map_err(HealthMetricsError::Validation)?;

        let row = json!({
            "id": Uuid::new_v4(),
            "patient_id": patient_id,
            "blood_pressure": request.blood_pressure.as_deref().map(str::trim),
            "heart_rate": request.heart_rate,
            "weight": request.weight,
            "height": request.height,
            "bmi": request.bmi(),
            "last_updated": Utc::now().to_rfc3339(),
        });

        let stored = self.store.insert(HEALTH_METRICS, row).await?;
        info!("Recorded health metric for patient {}", patient_id);

        Self::decode(stored)
    }

    /// Newest first.
    pub async fn history(&self, patient_id: Uuid, limit: u32) -> Result<Vec<HealthMetric>, HealthMetricsError> {
        debug!("Fetching up to {} health metrics for patient {}", limit, patient_id);

        let query = format!(
            "{}&order=last_updated.desc&limit={}",
            eq("patient_id", &patient_id.to_string()),
            limit
        );
        let rows = self.store.select(HEALTH_METRICS, &query).await?;

        rows.into_iter().map(Self::decode).collect()
    }

    pub async fn latest(&self, patient_id: Uuid) -> Result<HealthMetric, HealthMetricsError> {
        self.history(patient_id, 1)
            .await?
            .into_iter()
            .next()
            .ok_or(HealthMetricsError::NoMetrics)
    }
}
