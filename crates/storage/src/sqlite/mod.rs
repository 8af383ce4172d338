use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;

use crate::repository::{KeyValueStore, Storage};

mod kv_repo;
mod migrate;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Key/value blobs in a single `kv_entries` table.
///
/// One writer is all the game log needs, so the pool holds a single connection.
#[derive(Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SqliteInitError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl SqliteRepository {
    /// Open the database at `database_url`, creating the file if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if the URL does not parse or the database cannot be opened.
    pub async fn connect(database_url: &str) -> Result<Self, SqliteInitError> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .busy_timeout(BUSY_TIMEOUT);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        tracing::debug!(database_url, "sqlite opened");
        Ok(Self { pool })
    }

    /// # Errors
    ///
    /// Returns `SqliteInitError` if a schema step fails.
    pub async fn migrate(&self) -> Result<(), SqliteInitError> {
        migrate::run_migrations(&self.pool).await
    }
}

impl Storage {
    /// Storage whose key/value slots live in the `SQLite` database at `database_url`.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if opening or migrating the database fails.
    pub async fn sqlite(database_url: &str) -> Result<Self, SqliteInitError> {
        let repo = SqliteRepository::connect(database_url).await?;
        repo.migrate().await?;
        let kv: Arc<dyn KeyValueStore> = Arc::new(repo);
        Ok(Self { kv })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SqliteRepository>();
    }

    #[tokio::test]
    async fn missing_directory_is_an_init_error() {
        let url = "sqlite:///nonexistent-movie-quiz-dir/nested/stats.sqlite3";
        let err = SqliteRepository::connect(url).await.err();
        assert!(matches!(err, Some(SqliteInitError::Sqlx(_))));
    }
}
