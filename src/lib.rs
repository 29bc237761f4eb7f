//! Persistence layer for a conversational application: a per-session log of
//! question/answer exchanges, a registry of uploaded document metadata, and
//! reconstruction of stored rows into ordered chat history.

pub mod config;
pub mod db;
pub mod error;
pub mod service;

pub use config::Config;
pub use db::models::{ChatMessage, DocumentRecord};
pub use db::sqlite::{ConversationLogStore, DocumentStore, SqlitePool, connect};
pub use error::ChronicleError;
pub use service::ChronicleOps;
