pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{HealthMetricsError, MetricHistoryQuery};
pub use router::health_metrics_routes;
pub use services::HealthMetricsService;
