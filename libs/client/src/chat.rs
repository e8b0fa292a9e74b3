use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use shared_models::chat::{ChatMessage, Sender};

use crate::error::ClientError;
use crate::keys;
use crate::services::ChatApi;
use crate::storage::KeyValueStore;

pub const GREETING: &str = "Hello! I'm your Kromium health assistant. How can I help you today?";
pub const FALLBACK_REPLY: &str = "Sorry, I'm having trouble connecting right now. Please try again later.";

/// Whatever answers chat messages.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn reply(&self, message: &str) -> Result<String, ClientError>;
}

#[async_trait]
impl ChatBackend for ChatApi {
    async fn reply(&self, message: &str) -> Result<String, ClientError> {
        self.send(message).await
    }
}

/// Serializes the message list under a single key.
#[derive(Clone)]
pub struct ChatHistoryStore {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl ChatHistoryStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(store, keys::CHAT_HISTORY)
    }

    pub fn with_key(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self { store, key: key.into() }
    }

    /// Unreadable history is dropped rather than failing the widget.
    pub fn load(&self) -> Result<Vec<ChatMessage>, ClientError> {
        let Some(raw) = self.store.get(&self.key)? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str(&raw) {
            Ok(messages) => Ok(messages),
            Err(e) => {
                warn!("Ignoring corrupt chat history under {}: {}", self.key, e);
                Ok(Vec::new())
            }
        }
    }

    pub fn save(&self, messages: &[ChatMessage]) -> Result<(), ClientError> {
        self.store.set(&self.key, &serde_json::to_string(messages)?)
    }

    pub fn clear(&self) -> Result<(), ClientError> {
        self.store.remove(&self.key)
    }
}

pub struct ChatWidget<B: ChatBackend> {
    backend: B,
    history: ChatHistoryStore,
    messages: Vec<ChatMessage>,
    is_sending: bool,
}

impl<B: ChatBackend> ChatWidget<B> {
    /// Restores saved history, or starts a fresh conversation with the greeting.
    pub fn load(backend: B, history: ChatHistoryStore) -> Result<Self, ClientError> {
        let mut messages = history.load()?;
        if messages.is_empty() {
            messages.push(ChatMessage::bot(GREETING));
            history.save(&messages)?;
        }

        Ok(Self {
            backend,
            history,
            messages,
            is_sending: false,
        })
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_sending(&self) -> bool {
        self.is_sending
    }

    /// Sends `text` and returns the bot's answer. Blank input is ignored.
    /// A failed call still produces a bot message, with [`FALLBACK_REPLY`].
    pub async fn send(&mut self, text: &str) -> Result<Option<&ChatMessage>, ClientError> {
        let text = text.trim();
        if text.is_empty() || self.is_sending {
            return Ok(None);
        }

        self.messages.push(ChatMessage::user(text));
        if let Err(e) = self.history.save(&self.messages) {
            self.messages.pop();
            return Err(e);
        }

        self.is_sending = true;
        let reply = match self.backend.reply(text).await {
            Ok(reply) if !reply.trim().is_empty() => reply,
            Ok(_) => FALLBACK_REPLY.to_string(),
            Err(e) => {
                warn!("Chat request failed: {}", e);
                FALLBACK_REPLY.to_string()
            }
        };
        self.is_sending = false;

        self.messages.push(ChatMessage::new(reply, Sender::Bot));
        self.history.save(&self.messages)?;

        Ok(self.messages.last())
    }

    pub fn clear(&mut self) -> Result<(), ClientError> {
        self.messages = vec![ChatMessage::bot(GREETING)];
        self.history.save(&self.messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    struct Echo {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ChatBackend for Echo {
        async fn reply(&self, message: &str) -> Result<String, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("echo: {}", message))
        }
    }

    struct Down;

    #[async_trait]
    impl ChatBackend for Down {
        async fn reply(&self, _message: &str) -> Result<String, ClientError> {
            Err(ClientError::Api {
                status: 503,
                message: "unavailable".to_string(),
            })
        }
    }

    /// Accepts writes until `read_only` is flipped.
    #[derive(Default)]
    struct ReadOnlyAfterLoad {
        inner: MemoryStore,
        read_only: AtomicBool,
    }

    impl KeyValueStore for ReadOnlyAfterLoad {
        fn get(&self, key: &str) -> Result<Option<String>, ClientError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), ClientError> {
            if self.read_only.load(Ordering::SeqCst) {
                return Err(ClientError::Storage("disk full".to_string()));
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), ClientError> {
            self.inner.remove(key)
        }
    }

    fn history() -> ChatHistoryStore {
        ChatHistoryStore::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_fresh_widget_greets() {
        let widget = ChatWidget::load(Echo { calls: AtomicUsize::new(0) }, history()).unwrap();
        assert_eq!(widget.messages().len(), 1);
        assert_eq!(widget.messages()[0].sender, Sender::Bot);
        assert_eq!(widget.messages()[0].text, GREETING);
    }

    #[tokio::test]
    async fn test_blank_input_is_ignored() {
        let backend = Echo { calls: AtomicUsize::new(0) };
        let mut widget = ChatWidget::load(backend, history()).unwrap();

        assert!(widget.send("   ").await.unwrap().is_none());
        assert_eq!(widget.messages().len(), 1);
        assert_eq!(widget.backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_send_appends_user_and_bot_messages() {
        let mut widget = ChatWidget::load(Echo { calls: AtomicUsize::new(0) }, history()).unwrap();

        let reply = widget.send(" hi ").await.unwrap().unwrap();
        assert_eq!(reply.text, "echo: hi");

        let senders: Vec<Sender> = widget.messages().iter().map(|m| m.sender).collect();
        assert_eq!(senders, vec![Sender::Bot, Sender::User, Sender::Bot]);
    }

    #[tokio::test]
    async fn test_backend_failure_yields_fallback_message() {
        let mut widget = ChatWidget::load(Down, history()).unwrap();

        let reply = widget.send("hello?").await.unwrap().unwrap();
        assert_eq!(reply.text, FALLBACK_REPLY);
        assert_eq!(reply.sender, Sender::Bot);
        assert!(!widget.is_sending());
    }

    #[tokio::test]
    async fn test_clear_resets_to_greeting() {
        let store = history();
        let mut widget = ChatWidget::load(Echo { calls: AtomicUsize::new(0) }, store.clone()).unwrap();
        widget.send("one").await.unwrap();

        widget.clear().unwrap();
        assert_eq!(widget.messages().len(), 1);
        assert_eq!(store.load().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unsaved_message_is_not_kept() {
        let backing = Arc::new(ReadOnlyAfterLoad::default());
        let backend = Echo { calls: AtomicUsize::new(0) };
        let mut widget = ChatWidget::load(backend, ChatHistoryStore::new(backing.clone())).unwrap();

        backing.read_only.store(true, Ordering::SeqCst);
        assert!(matches!(widget.send("hi").await, Err(ClientError::Storage(_))));

        assert_eq!(widget.messages().len(), 1);
        assert_eq!(widget.messages()[0].text, GREETING);
        assert_eq!(widget.backend.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_histories_under_different_keys_are_separate() {
        let backing: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let default = ChatHistoryStore::new(backing.clone());
        let scoped = ChatHistoryStore::with_key(backing, "kromium-chat-history-ada");

        scoped.save(&[ChatMessage::user("hi")]).unwrap();
        assert!(default.load().unwrap().is_empty());
        assert_eq!(scoped.load().unwrap().len(), 1);
    }

    #[test]
    fn test_corrupt_history_is_dropped() {
        let backing = Arc::new(MemoryStore::new());
        backing.set(keys::CHAT_HISTORY, "{not json").unwrap();

        let store = ChatHistoryStore::new(backing);
        assert!(store.load().unwrap().is_empty());
    }
}
