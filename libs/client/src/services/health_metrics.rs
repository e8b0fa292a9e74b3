use serde::Deserialize;

use shared_models::health::{HealthMetric, RecordHealthMetricRequest};

use crate::error::ClientError;
use crate::http::ApiClient;

#[derive(Deserialize)]
struct MetricList {
    metrics: Vec<HealthMetric>,
}

#[derive(Debug, Clone)]
pub struct HealthMetricsApi {
    api: ApiClient,
}

impl HealthMetricsApi {
    pub fn new(api: &ApiClient) -> Self {
        Self { api: api.clone() }
    }

    /// `None` until the patient records a first reading.
    pub async fn latest(&self) -> Result<Option<HealthMetric>, ClientError> {
        self.api.get_optional("/health-metrics/latest").await
    }

    pub async fn history(&self, limit: u32) -> Result<Vec<HealthMetric>, ClientError> {
        let list: Option<MetricList> = self
            .api
            .get_optional(&format!("/health-metrics?limit={}", limit))
            .await?;
        Ok(list.map(|l| l.metrics).unwrap_or_default())
    }

    pub async fn record(&self, request: &RecordHealthMetricRequest) -> Result<HealthMetric, ClientError> {
        request.validate().map_err(ClientError::Validation)?;
        self.api.post("/health-metrics", request).await
    }
}
