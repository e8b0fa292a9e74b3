use serde::Deserialize;

use shared_models::error::AppError;

pub const MAX_MESSAGE_LENGTH: usize = 2000;

/// Reply body of the chatbot service. Older deployments answer with
/// `response` instead of `reply`.
#[derive(Debug, Deserialize)]
pub struct UpstreamReply {
    #[serde(alias = "response")]
    pub reply: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("Message cannot be empty")]
    EmptyMessage,

    #[error("Message exceeds {} characters", MAX_MESSAGE_LENGTH)]
    MessageTooLong,

    #[error("Chat service is not configured")]
    NotConfigured,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Chat service error: {status} - {message}")]
    Upstream { status: u16, message: String },
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        match e {
            ChatError::EmptyMessage | ChatError::MessageTooLong => AppError::ValidationError(e.to_string()),
            ChatError::NotConfigured => AppError::Internal(e.to_string()),
            ChatError::Http(_) | ChatError::Upstream { .. } => AppError::ExternalService(e.to_string()),
        }
    }
}
