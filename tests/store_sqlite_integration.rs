//! Integration tests for the strict stores against in-memory and file-backed
//! SQLite. Covers schema initialization, append/history ordering, document
//! registry semantics, and the connection/statement error split.

use chronicle::{
    ChatMessage, ChronicleError, Config, ConversationLogStore, DocumentStore, connect,
};

async fn memory_stores() -> (ConversationLogStore, DocumentStore) {
    let config = Config::new("sqlite::memory:");
    let pool = connect(&config).await.expect("connect");
    let logs = ConversationLogStore::new(pool.clone());
    let docs = DocumentStore::new(pool);
    logs.ensure_schema().await.expect("conversation log schema");
    docs.ensure_schema().await.expect("document schema");
    (logs, docs)
}

#[tokio::test]
async fn ensure_schema_is_idempotent() {
    let (logs, docs) = memory_stores().await;
    for _ in 0..3 {
        logs.ensure_schema().await.expect("repeat conversation log schema");
        docs.ensure_schema().await.expect("repeat document schema");
    }

    logs.append("s1", "hi", "hello", "test-model")
        .await
        .expect("append after re-init");
    assert_eq!(logs.history("s1").await.expect("history").len(), 2);
}

#[tokio::test]
async fn append_then_history_round_trip() {
    let (logs, _docs) = memory_stores().await;

    logs.append("s1", "What is Rust?", "A systems language.", "test-model")
        .await
        .expect("append");

    let history = logs.history("s1").await.expect("history");
    assert_eq!(
        history,
        vec![
            ChatMessage::User("What is Rust?".to_string()),
            ChatMessage::Assistant("A systems language.".to_string()),
        ]
    );
    assert_eq!(history[0].role(), "user");
    assert_eq!(history[1].role(), "assistant");
}

#[tokio::test]
async fn history_preserves_append_order() {
    let (logs, _docs) = memory_stores().await;

    // Appends land within the same timestamp tick; the row id breaks the tie.
    for i in 0..5 {
        logs.append("s1", &format!("q{i}"), &format!("a{i}"), "test-model")
            .await
            .expect("append");
    }

    let history = logs.history("s1").await.expect("history");
    assert_eq!(history.len(), 10);
    for (i, pair) in history.chunks(2).enumerate() {
        assert_eq!(pair[0], ChatMessage::User(format!("q{i}")));
        assert_eq!(pair[1], ChatMessage::Assistant(format!("a{i}")));
    }
}

#[tokio::test]
async fn history_is_scoped_to_session() {
    let (logs, _docs) = memory_stores().await;

    logs.append("s1", "q", "a", "test-model").await.expect("append");
    logs.append("s2", "other", "answer", "test-model")
        .await
        .expect("append");

    assert_eq!(logs.history("s1").await.expect("history").len(), 2);
    assert_eq!(logs.history("s2").await.expect("history").len(), 2);
    assert!(logs.history("never-seen").await.expect("history").is_empty());
}

#[tokio::test]
async fn null_columns_become_empty_turns() {
    let (logs, _docs) = memory_stores().await;

    sqlx::query("INSERT INTO conversation_logs (session_id) VALUES (?)")
        .bind("s1")
        .execute(logs.pool())
        .await
        .expect("insert row with NULL content");

    let history = logs.history("s1").await.expect("history");
    assert_eq!(
        history,
        vec![
            ChatMessage::User(String::new()),
            ChatMessage::Assistant(String::new()),
        ]
    );
}

#[tokio::test]
async fn empty_strings_survive_the_round_trip() {
    let (logs, _docs) = memory_stores().await;

    logs.append("", "", "", "").await.expect("append empty");

    let history = logs.history("").await.expect("history");
    assert_eq!(
        history,
        vec![
            ChatMessage::User(String::new()),
            ChatMessage::Assistant(String::new()),
        ]
    );
}

#[tokio::test]
async fn documents_list_most_recent_first() {
    let (_logs, docs) = memory_stores().await;

    let first = docs.create("report.pdf").await.expect("create");
    let second = docs.create("notes.txt").await.expect("create");
    let third = docs.create("summary.md").await.expect("create");
    assert!(first < second && second < third);

    let records = docs.list_all().await.expect("list");
    let ids: Vec<i64> = records.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![third, second, first]);
    assert_eq!(records[0].filename, "summary.md");

    let now = chrono::Utc::now();
    for record in &records {
        assert!((now - record.upload_timestamp).num_seconds().abs() < 60);
    }
}

#[tokio::test]
async fn remove_deletes_only_the_given_id() {
    let (_logs, docs) = memory_stores().await;

    let keep = docs.create("keep.pdf").await.expect("create");
    let gone = docs.create("gone.pdf").await.expect("create");

    docs.remove(gone).await.expect("remove");

    let records = docs.list_all().await.expect("list");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, keep);
}

#[tokio::test]
async fn remove_of_missing_id_succeeds() {
    let (_logs, docs) = memory_stores().await;

    docs.create("only.pdf").await.expect("create");
    docs.remove(9999).await.expect("remove of absent id");

    assert_eq!(docs.list_all().await.expect("list").len(), 1);
}

#[tokio::test]
async fn statement_failures_are_statement_errors() {
    let (logs, docs) = memory_stores().await;

    sqlx::query("DROP TABLE conversation_logs")
        .execute(logs.pool())
        .await
        .expect("drop table");
    sqlx::query("DROP TABLE documents")
        .execute(docs.pool())
        .await
        .expect("drop table");

    let err = logs
        .append("s1", "q", "a", "m")
        .await
        .expect_err("append against missing table");
    assert!(matches!(err, ChronicleError::Statement(_)));

    let err = docs.create("x.pdf").await.expect_err("create against missing table");
    assert!(matches!(err, ChronicleError::Statement(_)));
}

#[tokio::test]
async fn unreachable_database_is_a_connection_error() {
    let temp = tempfile::tempdir().expect("tempdir");
    let missing = temp.path().join("no").join("such").join("dir").join("x.db");
    let config = Config::new(format!("sqlite:{}", missing.display()));

    let err = connect(&config).await.expect_err("connect into missing directory");
    assert!(matches!(err, ChronicleError::Connection(_)));
}

#[tokio::test]
async fn file_backed_store_round_trip() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("chronicle.db");
    let config = Config::new(format!("sqlite:{}", path.display()));

    let pool = connect(&config).await.expect("connect");
    let logs = ConversationLogStore::new(pool.clone());
    let docs = DocumentStore::new(pool);
    logs.ensure_schema().await.expect("conversation log schema");
    docs.ensure_schema().await.expect("document schema");

    logs.append("s1", "persisted?", "yes", "test-model")
        .await
        .expect("append");
    let id = docs.create("saved.pdf").await.expect("create");

    assert_eq!(logs.history("s1").await.expect("history").len(), 2);
    assert_eq!(docs.list_all().await.expect("list")[0].id, id);
    assert!(path.exists());
}
