use std::sync::Arc;

use axum::{routing::post, Router};

use shared_config::AppConfig;

use crate::handlers;

pub fn chat_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/chat", post(handlers::send_message))
        .with_state(state)
}
