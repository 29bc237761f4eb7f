//! SQL DDL for initializing the conversation log and document registry.
//! SQLite-first design; can be adapted for other RDBMS.

/// Conversation log schema with:
/// - `id` INTEGER PRIMARY KEY AUTOINCREMENT, also the tie-breaker when two
///   rows land on the same timestamp tick
/// - `session_id` as an opaque grouping key (no sessions table behind it)
/// - `created_at` assigned by the database at insert time, RFC3339 text with
///   millisecond precision so ordering survives bursts of appends
/// - Index on `session_id`, the only access path for history reads
pub const CONVERSATION_LOGS_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS conversation_logs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id TEXT,
    user_query TEXT,
    model_response TEXT,
    model TEXT,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE INDEX IF NOT EXISTS idx_conversation_logs_session_id ON conversation_logs(session_id);
"#;

/// Document registry schema. One row per uploaded file, removed by `id`;
/// `upload_timestamp` drives the most-recent-first listing.
pub const DOCUMENTS_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS documents (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    filename TEXT,
    upload_timestamp TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);
"#;
