use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};

use crate::config::Config;
use crate::db::models::{ChatMessage, DocumentRecord};
use crate::db::schema::{CONVERSATION_LOGS_INIT, DOCUMENTS_INIT};
use crate::error::ChronicleError;

pub type SqlitePool = Pool<Sqlite>;

/// Open a connection pool for the configured store, creating the database
/// file if it does not exist yet.
///
/// Connectivity is validated eagerly, so a bad `database_url` fails here
/// rather than on the first operation. Each store operation later checks a
/// connection out of this pool for its own duration and returns it on every
/// exit path; waiting for a checkout is bounded by `acquire_timeout_secs`.
pub async fn connect(config: &Config) -> Result<SqlitePool, ChronicleError> {
    let connect_opts = SqliteConnectOptions::from_str(config.database_url.as_str())
        .map_err(ChronicleError::Connection)?
        .create_if_missing(true);

    // Every physical connection to `:memory:` opens its own private database,
    // so a pool wider than one connection would see disjoint schemas.
    let max_connections = if is_memory_url(&config.database_url) {
        1
    } else {
        config.max_connections
    };

    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect_with(connect_opts)
        .await
        .map_err(ChronicleError::Connection)
}

fn is_memory_url(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

/// Append-only log of question/answer exchanges, grouped by session.
#[derive(Clone, Debug)]
pub struct ConversationLogStore {
    pool: SqlitePool,
}

impl ConversationLogStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the conversation log table and its session index.
    ///
    /// The DDL is idempotent; running it again against an initialized
    /// database is a no-op. All statements run in one transaction, which
    /// rolls back if any of them fails.
    pub async fn ensure_schema(&self) -> Result<(), ChronicleError> {
        run_ddl(&self.pool, CONVERSATION_LOGS_INIT).await
    }

    /// Record one query/response exchange for a session.
    ///
    /// `id` and `created_at` are assigned by the database; rows are never
    /// updated or deleted afterwards. A failed insert leaves no partial row
    /// behind.
    pub async fn append(
        &self,
        session_id: &str,
        user_query: &str,
        model_response: &str,
        model: &str,
    ) -> Result<(), ChronicleError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(ChronicleError::Connection)?;
        sqlx::query(
            r#"INSERT INTO conversation_logs (session_id, user_query, model_response, model)
               VALUES (?, ?, ?, ?)"#,
        )
        .bind(session_id)
        .bind(user_query)
        .bind(model_response)
        .bind(model)
        .execute(&mut *conn)
        .await
        .map_err(ChronicleError::Statement)?;
        Ok(())
    }

    /// Reconstruct a session's history as alternating user/assistant turns.
    ///
    /// Rows are read oldest-first (`created_at`, with `id` breaking ties
    /// within one timestamp tick) and each row expands into the user turn
    /// followed by the assistant turn that answered it. NULL columns come
    /// back as empty turns; nothing is validated or filtered at read time.
    /// An unknown `session_id` yields an empty history.
    pub async fn history(&self, session_id: &str) -> Result<Vec<ChatMessage>, ChronicleError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(ChronicleError::Connection)?;
        let rows: Vec<(Option<String>, Option<String>)> = sqlx::query_as(
            r#"SELECT user_query, model_response FROM conversation_logs
               WHERE session_id = ?
               ORDER BY created_at ASC, id ASC"#,
        )
        .bind(session_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(ChronicleError::Statement)?;

        let messages = rows
            .into_iter()
            .flat_map(|(user_query, model_response)| {
                [
                    ChatMessage::User(user_query.unwrap_or_default()),
                    ChatMessage::Assistant(model_response.unwrap_or_default()),
                ]
            })
            .collect();
        Ok(messages)
    }
}

/// Registry of uploaded document metadata.
#[derive(Clone, Debug)]
pub struct DocumentStore {
    pool: SqlitePool,
}

impl DocumentStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the document registry table (idempotent DDL).
    pub async fn ensure_schema(&self) -> Result<(), ChronicleError> {
        run_ddl(&self.pool, DOCUMENTS_INIT).await
    }

    /// Insert a document record and return its database-generated id.
    pub async fn create(&self, filename: &str) -> Result<i64, ChronicleError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(ChronicleError::Connection)?;
        let id: i64 = sqlx::query_scalar("INSERT INTO documents (filename) VALUES (?) RETURNING id")
            .bind(filename)
            .fetch_one(&mut *conn)
            .await
            .map_err(ChronicleError::Statement)?;
        Ok(id)
    }

    /// Delete a document record by id.
    ///
    /// A DELETE that matches no row still succeeds; only failures to execute
    /// the statement are errors.
    pub async fn remove(&self, id: i64) -> Result<(), ChronicleError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(ChronicleError::Connection)?;
        sqlx::query("DELETE FROM documents WHERE id = ?")
            .bind(id)
            .execute(&mut *conn)
            .await
            .map_err(ChronicleError::Statement)?;
        Ok(())
    }

    /// List every document record, most recent upload first.
    pub async fn list_all(&self) -> Result<Vec<DocumentRecord>, ChronicleError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(ChronicleError::Connection)?;
        let records = sqlx::query_as::<_, DocumentRecord>(
            r#"SELECT id, filename, upload_timestamp FROM documents
               ORDER BY upload_timestamp DESC, id DESC"#,
        )
        .fetch_all(&mut *conn)
        .await
        .map_err(ChronicleError::Statement)?;
        Ok(records)
    }
}

/// Execute one schema's DDL inside a transaction.
///
/// SQLite accepts multi-statement batches but `sqlx::query` does not, so the
/// bundled DDL is split on `;` and run statement by statement.
async fn run_ddl(pool: &SqlitePool, ddl: &str) -> Result<(), ChronicleError> {
    let mut tx = pool.begin().await.map_err(ChronicleError::Connection)?;
    for stmt in ddl.split(';') {
        let s = stmt.trim();
        if s.is_empty() {
            continue;
        }
        sqlx::query(s)
            .execute(&mut *tx)
            .await
            .map_err(ChronicleError::Statement)?;
    }
    tx.commit().await.map_err(ChronicleError::Statement)?;
    Ok(())
}
