//! Database module: models and schema for persistent storage.
//!
//! Layout:
//! - `models.rs`: typed rows and the reconstructed message union
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `sqlite.rs`: connection provider and the two storage structs

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::{ChatMessage, DocumentRecord};
pub use schema::{CONVERSATION_LOGS_INIT, DOCUMENTS_INIT};
pub use sqlite::{ConversationLogStore, DocumentStore, SqlitePool, connect};
