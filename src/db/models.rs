use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One turn of reconstructed conversation history.
///
/// Serializes as `{"role": "user" | "assistant", "content": "..."}`, the
/// shape expected when history is replayed into a model's context window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", content = "content", rename_all = "lowercase")]
pub enum ChatMessage {
    User(String),
    Assistant(String),
}

impl ChatMessage {
    pub fn role(&self) -> &'static str {
        match self {
            ChatMessage::User(_) => "user",
            ChatMessage::Assistant(_) => "assistant",
        }
    }

    pub fn content(&self) -> &str {
        match self {
            ChatMessage::User(content) | ChatMessage::Assistant(content) => content,
        }
    }
}

/// One row of the `documents` registry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DocumentRecord {
    pub id: i64,
    pub filename: String,
    pub upload_timestamp: DateTime<Utc>,
}
