use tracing::{debug, error};

use crate::config::Config;
use crate::db::models::{ChatMessage, DocumentRecord};
use crate::db::sqlite::{ConversationLogStore, DocumentStore, connect};
use crate::error::ChronicleError;

/// Application-facing facade over the conversation log and document stores.
///
/// The stores report every failure as an error; this layer applies the
/// policy the surrounding request flow wants instead. A failed history write
/// or document listing is logged and turned into a benign default (`()`,
/// empty vec, `None`, `false`) so it never takes the request down with it.
/// Callers that need to tell an empty result from a failed one use
/// [`ConversationLogStore`] and [`DocumentStore`] directly.
#[derive(Clone, Debug)]
pub struct ChronicleOps {
    conversation_logs: ConversationLogStore,
    documents: DocumentStore,
}

impl ChronicleOps {
    /// Connect to the configured database and initialize both schemas.
    ///
    /// An unreachable or invalid database propagates as
    /// [`ChronicleError::Connection`]; there is nothing useful to hand back
    /// without a pool. Schema initialization after that is best-effort, so a
    /// failed DDL statement is logged and startup continues.
    pub async fn new(config: &Config) -> Result<Self, ChronicleError> {
        let pool = connect(config).await?;
        let conversation_logs = ConversationLogStore::new(pool.clone());
        let documents = DocumentStore::new(pool);

        if let Err(e) = conversation_logs.ensure_schema().await {
            error!(error = %e, "conversation log schema initialization failed");
        }
        if let Err(e) = documents.ensure_schema().await {
            error!(error = %e, "document schema initialization failed");
        }

        Ok(Self {
            conversation_logs,
            documents,
        })
    }

    /// The strict conversation log store backing this facade.
    pub fn conversation_logs(&self) -> &ConversationLogStore {
        &self.conversation_logs
    }

    /// The strict document store backing this facade.
    pub fn documents(&self) -> &DocumentStore {
        &self.documents
    }

    /// Record one query/response exchange; failures are logged, not raised.
    pub async fn append(
        &self,
        session_id: &str,
        user_query: &str,
        model_response: &str,
        model: &str,
    ) {
        if let Err(e) = self
            .conversation_logs
            .append(session_id, user_query, model_response, model)
            .await
        {
            error!(session_id = %session_id, error = %e, "failed to record exchange");
        }
    }

    /// Ordered history for a session. Empty both when the session has no
    /// rows and when the read failed; the failure itself is logged.
    pub async fn history(&self, session_id: &str) -> Vec<ChatMessage> {
        match self.conversation_logs.history(session_id).await {
            Ok(messages) => {
                debug!(session_id = %session_id, turns = messages.len(), "history reconstructed");
                messages
            }
            Err(e) => {
                error!(session_id = %session_id, error = %e, "failed to load history");
                Vec::new()
            }
        }
    }

    /// Register an uploaded document. `None` means the insert failed.
    pub async fn create_document(&self, filename: &str) -> Option<i64> {
        match self.documents.create(filename).await {
            Ok(id) => Some(id),
            Err(e) => {
                error!(filename = %filename, error = %e, "failed to register document");
                None
            }
        }
    }

    /// Delete a document record. `true` means the statement executed,
    /// whether or not a row matched the id.
    pub async fn remove_document(&self, id: i64) -> bool {
        match self.documents.remove(id).await {
            Ok(()) => true,
            Err(e) => {
                error!(document_id = id, error = %e, "failed to delete document record");
                false
            }
        }
    }

    /// Every document record, most recent upload first; empty on failure.
    pub async fn list_documents(&self) -> Vec<DocumentRecord> {
        match self.documents.list_all().await {
            Ok(records) => records,
            Err(e) => {
                error!(error = %e, "failed to list documents");
                Vec::new()
            }
        }
    }
}
