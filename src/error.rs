use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

/// Failures surfaced by the persistence layer.
///
/// `Connection` covers failures to open the pool or to check a connection
/// out of it; `Statement` covers SQL that failed after a connection was
/// available. Pool acquisition timeouts land in `Connection`.
#[derive(Debug, ThisError)]
pub enum ChronicleError {
    #[error("Configuration error: {0}")]
    Config(#[from] figment::Error),

    #[error("Database connection error: {0}")]
    Connection(SqlxError),

    #[error("Statement execution error: {0}")]
    Statement(SqlxError),
}
