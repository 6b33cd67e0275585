//! SQLite state file
//!
//! Items and meetings share one `sqlx` pool. The schema lives in the
//! workspace `migrations/` directory and is embedded with `sqlx::migrate!()`.

use std::{path::Path, str::FromStr, time::Duration};

use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous},
};
use tracing::{debug, info, instrument};

/// How long a writer waits on a locked state file before giving up
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Failure to open or migrate the state file
#[derive(Debug, thiserror::Error)]
pub enum StateDbError {
    #[error("State database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Schema migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Where the state file lives and how many connections share it
#[derive(Debug, Clone)]
pub struct StateDbConfig {
    /// SQLite URL, `sqlite:<path>` or `sqlite::memory:`
    pub url: String,
    /// Pool size
    pub max_connections: u32,
    /// Connections kept open while idle
    pub min_connections: u32,
    /// Write-ahead journal for file databases
    pub wal_mode: bool,
}

impl Default for StateDbConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:reviewdesk.db".to_string(),
            max_connections: 5,
            min_connections: 1,
            wal_mode: true,
        }
    }
}

impl StateDbConfig {
    /// Private in-memory database
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            // Every connection to :memory: opens a separate database
            max_connections: 1,
            min_connections: 1,
            wal_mode: false,
        }
    }

    /// Database stored at `path`, created on first open
    #[must_use]
    pub fn file(path: impl AsRef<Path>) -> Self {
        Self {
            url: format!("sqlite:{}", path.as_ref().display()),
            ..Default::default()
        }
    }

    fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:")
    }
}

/// Open state file
#[derive(Debug, Clone)]
pub struct StateDb {
    pool: SqlitePool,
}

impl StateDb {
    /// Open (creating if needed) the state file
    #[instrument(skip_all, fields(url = %config.url))]
    pub async fn new(config: &StateDbConfig) -> Result<Self, StateDbError> {
        // Pragmas must be set on every pooled connection
        let mut options = SqliteConnectOptions::from_str(&config.url)?
            .create_if_missing(true)
            .busy_timeout(BUSY_TIMEOUT);
        if config.wal_mode && !config.is_in_memory() {
            options = options
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal);
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_with(options)
            .await?;

        info!(
            max_connections = config.max_connections,
            wal = config.wal_mode,
            "State database opened"
        );
        Ok(Self { pool })
    }

    /// Open a private in-memory database
    pub async fn in_memory() -> Result<Self, StateDbError> {
        Self::new(&StateDbConfig::in_memory()).await
    }

    /// Pool handed to the SQLite stores
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Bring the schema up to date
    #[instrument(skip(self))]
    pub async fn migrate(&self) -> Result<(), StateDbError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        info!("Review workflow schema is up to date");
        Ok(())
    }

    /// Close every connection
    pub async fn close(&self) {
        self.pool.close().await;
        debug!("State database closed");
    }
}
