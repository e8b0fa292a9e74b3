use shared_models::chat::{ChatReply, ChatRequest};

use crate::error::ClientError;
use crate::http::ApiClient;

#[derive(Debug, Clone)]
pub struct ChatApi {
    api: ApiClient,
}

impl ChatApi {
    pub fn new(api: &ApiClient) -> Self {
        Self { api: api.clone() }
    }

    pub async fn send(&self, message: &str) -> Result<String, ClientError> {
        let request = ChatRequest {
            message: message.to_string(),
        };
        let reply: ChatReply = self.api.post("/api/chat", &request).await?;
        Ok(reply.reply)
    }
}
