use std::sync::Arc;

use axum::{
    extract::{Extension, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::{Role, User};
use shared_models::error::AppError;
use shared_models::health::{HealthMetric, RecordHealthMetricRequest};
use shared_utils::extractor::{require_role, user_uuid};

use crate::models::MetricHistoryQuery;
use crate::services::HealthMetricsService;

#[axum::debug_handler]
pub async fn record_metric(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
    Json(request): Json<RecordHealthMetricRequest>,
) -> Result<(StatusCode, Json<HealthMetric>), AppError> {
    require_role(&user, Role::Patient)?;
    let patient_id = user_uuid(&user)?;

    let service = HealthMetricsService::new(&state);
    let metric = service.record_metric(patient_id, request).await?;

    Ok((StatusCode::CREATED, Json(metric)))
}

#[axum::debug_handler]
pub async fn get_history(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
    Query(query): Query<MetricHistoryQuery>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, Role::Patient)?;
    let patient_id = user_uuid(&user)?;

    let service = HealthMetricsService::new(&state);
    let metrics = service.history(patient_id, query.effective_limit()).await?;

    Ok(Json(json!({
        "metrics": metrics,
        "total": metrics.len()
    })))
}

#[axum::debug_handler]
pub async fn get_latest(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
) -> Result<Json<HealthMetric>, AppError> {
    require_role(&user, Role::Patient)?;
    let patient_id = user_uuid(&user)?;

    let service = HealthMetricsService::new(&state);
    let metric = service.latest(patient_id).await?;

    Ok(Json(metric))
}
