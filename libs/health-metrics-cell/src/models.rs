use serde::Deserialize;

use shared_models::error::AppError;

pub const DEFAULT_HISTORY_LIMIT: u32 = 30;
pub const MAX_HISTORY_LIMIT: u32 = 100;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetricHistoryQuery {
    pub limit: Option<u32>,
}

impl MetricHistoryQuery {
    pub fn effective_limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_HISTORY_LIMIT).clamp(1, MAX_HISTORY_LIMIT)
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum HealthMetricsError {
    #[error("No health metrics recorded yet")]
    NoMetrics,

    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for HealthMetricsError {
    fn from(e: anyhow::Error) -> Self {
        HealthMetricsError::Database(e.to_string())
    }
}

impl From<HealthMetricsError> for AppError {
    fn from(e: HealthMetricsError) -> Self {
        match e {
            HealthMetricsError::NoMetrics => AppError::NotFound(e.to_string()),
            HealthMetricsError::Validation(msg) => AppError::ValidationError(msg),
            HealthMetricsError::Database(msg) => AppError::Database(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_limit_is_clamped() {
        assert_eq!(MetricHistoryQuery::default().effective_limit(), DEFAULT_HISTORY_LIMIT);
        assert_eq!(MetricHistoryQuery { limit: Some(0) }.effective_limit(), 1);
        assert_eq!(MetricHistoryQuery { limit: Some(5000) }.effective_limit(), MAX_HISTORY_LIMIT);
    }
}
