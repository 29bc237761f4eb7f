use figment::{Figment, providers::Env};
use serde::Deserialize;

use crate::error::ChronicleError;

/// Environment prefix for all configuration variables.
pub const ENV_PREFIX: &str = "CHRONICLE_";

/// Connection settings for the backing store.
///
/// Built once at startup and passed explicitly to [`crate::connect`]; nothing
/// in this crate reads the environment behind the caller's back.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Store location, e.g. `sqlite://chronicle.db` or `sqlite::memory:`.
    pub database_url: String,
    /// Upper bound on concurrently open connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// How long an operation may wait to check a connection out of the pool.
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout_secs() -> u64 {
    30
}

impl Config {
    /// Load configuration from `CHRONICLE_*` environment variables, reading a
    /// `.env` file first when one is present.
    ///
    /// `CHRONICLE_DATABASE_URL` is required; everything else has a default.
    pub fn from_env() -> Result<Self, ChronicleError> {
        dotenvy::dotenv().ok();
        let config = Figment::new().merge(Env::prefixed(ENV_PREFIX)).extract()?;
        Ok(config)
    }

    /// Configuration for an explicit database URL, defaults elsewhere.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout_secs(),
        }
    }
}
