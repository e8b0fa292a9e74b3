//! Typed client for the Kromium Health API.
//!
//! [`ApiClient`] carries the base URL and bearer token; the per-resource
//! wrappers in [`services`] sit on top of it. [`Session`], [`BookingForm`],
//! [`ChatWidget`] and the dashboard loaders hold the state a front end needs.

pub mod booking;
pub mod chat;
pub mod dashboard;
pub mod error;
pub mod http;
pub mod services;
pub mod session;
pub mod storage;

pub use booking::{BookingForm, BookingOutcome};
pub use chat::{ChatBackend, ChatHistoryStore, ChatWidget};
pub use dashboard::{DoctorDashboard, PatientDashboard};
pub use error::ClientError;
pub use http::ApiClient;
pub use session::Session;
pub use storage::{FileStore, KeyValueStore, MemoryStore};

/// Storage keys shared with the browser build.
pub mod keys {
    pub const CHAT_HISTORY: &str = "kromium-chat-history";
    pub const AUTH_TOKEN: &str = "kromium-auth-token";
    pub const USER: &str = "kromium-user";
}
