use std::sync::Arc;

use axum::{routing::get, Router};

use appointment_cell::appointment_routes;
use auth_cell::auth_routes;
use chat_cell::chat_routes;
use doctor_cell::doctor_routes;
use health_metrics_cell::health_metrics_routes;
use medical_record_cell::medical_record_routes;
use shared_config::AppConfig;
use user_cell::user_routes;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Kromium Health API is running!" }))
        .nest("/auth", auth_routes(state.clone()))
        .nest("/users", user_routes(state.clone()))
        .nest("/doctors", doctor_routes(state.clone()))
        .nest("/appointments", appointment_routes(state.clone()))
        .nest("/medical-records", medical_record_routes(state.clone()))
        .nest("/health-metrics", health_metrics_routes(state.clone()))
        .nest("/api", chat_routes(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use shared_utils::test_utils::TestConfig;
    use tower::ServiceExt;

    fn app() -> Router {
        create_router(TestConfig::default().to_arc())
    }

    #[tokio::test]
    async fn test_root_reports_liveness() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"Kromium Health API is running!");
    }

    #[tokio::test]
    async fn test_protected_cells_require_token() {
        for uri in [
            "/users/profile",
            "/appointments/my-appointments",
            "/medical-records",
            "/health-metrics/latest",
            "/auth/me",
        ] {
            let response = app()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let response = app()
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
