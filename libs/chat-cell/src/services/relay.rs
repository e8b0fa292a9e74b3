use reqwest::Client;
use tracing::{debug, error};

use shared_config::AppConfig;
use shared_models::chat::{ChatReply, ChatRequest};

use crate::models::{ChatError, UpstreamReply, MAX_MESSAGE_LENGTH};

/// Forwards a single message to the external chatbot service and relays its answer.
pub struct ChatRelayService {
    client: Client,
    base_url: String,
}

impl ChatRelayService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.chat_service_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn validate(message: &str) -> Result<&str, ChatError> {
        let trimmed = message.trim();
        if trimmed.is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        if trimmed.chars().count() > MAX_MESSAGE_LENGTH {
            return Err(ChatError::MessageTooLong);
        }
        Ok(trimmed)
    }

    pub async fn send(&self, request: &ChatRequest) -> Result<ChatReply, ChatError> {
        let message = Self::validate(&request.message)?;
        if self.base_url.is_empty() {
            return Err(ChatError::NotConfigured);
        }

        let url = format!("{}/api/chat", self.base_url);
        debug!("Forwarding chat message to {}", url);

        let resp = self
            .client
            .post(&url)
            .json(&ChatRequest {
                message: message.to_string(),
            })
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let text = resp.text().await.unwrap_or_default();
            error!("Chat service returned {}: {}", status, text);
            return Err(ChatError::Upstream { status, message: text });
        }

        let data: UpstreamReply = resp.json().await?;
        Ok(ChatReply { reply: data.reply })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_trims_and_rejects_blank() {
        assert_eq!(ChatRelayService::validate("  hi  ").unwrap(), "hi");
        assert!(matches!(ChatRelayService::validate("   "), Err(ChatError::EmptyMessage)));
        let long = "a".repeat(MAX_MESSAGE_LENGTH + 1);
        assert!(matches!(ChatRelayService::validate(&long), Err(ChatError::MessageTooLong)));
    }
}
