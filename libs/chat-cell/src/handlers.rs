use std::sync::Arc;

use axum::{extract::State, Json};

use shared_config::AppConfig;
use shared_models::chat::{ChatReply, ChatRequest};
use shared_models::error::AppError;

use crate::services::ChatRelayService;

#[axum::debug_handler]
pub async fn send_message(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatReply>, AppError> {
    let relay = ChatRelayService::new(&state);
    let reply = relay.send(&request).await?;

    Ok(Json(reply))
}
