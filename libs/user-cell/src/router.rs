use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, put},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn user_routes(state: Arc<AppConfig>) -> Router {
    let protected_routes = Router::new()
        .route("/profile", get(handlers::get_profile).put(handlers::update_profile))
        .route("/availability", put(handlers::update_availability))
        .route("/patients", get(handlers::get_my_patients))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(protected_routes)
        .with_state(state)
}
