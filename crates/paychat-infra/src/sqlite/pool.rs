//! Database bootstrap: a single SQLite connection in WAL mode.
//!
//! Startup opens the database named by `DATABASE_URL` and runs `SELECT 1`.
//! Failure is fatal for the process.

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use tracing::info;

use paychat_types::error::StartupError;

/// Handle to the verified database connection.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open `database_url` and verify it answers a trivial query.
    ///
    /// Uses WAL journal mode, a 5-second busy timeout, and creates the file
    /// if it does not exist. No migrations are run.
    pub async fn connect(database_url: &str) -> Result<Self, StartupError> {
        let opts = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| StartupError::Database(e.to_string()))?
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(opts)
            .await
            .map_err(|e| StartupError::Database(e.to_string()))?;

        sqlx::query("SELECT 1")
            .execute(&pool)
            .await
            .map_err(|e| StartupError::Database(e.to_string()))?;

        info!("connected to database");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Re-run the liveness query. Used by the health endpoint.
    pub async fn ping(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// The configured database URL, after environment overrides.
///
/// Returns [`StartupError::MissingDatabaseUrl`] when it is unset or blank.
pub fn require_database_url(configured: Option<&str>) -> Result<&str, StartupError> {
    configured
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(StartupError::MissingDatabaseUrl)
}
