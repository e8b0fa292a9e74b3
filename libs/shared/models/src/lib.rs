pub mod auth;
pub mod error;
pub mod user;
pub mod appointment;
pub mod medical_record;
pub mod health;
pub mod chat;
