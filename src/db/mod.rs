pub mod operations;
pub mod schema;

use std::str::FromStr;
use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use thiserror::Error;

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
    url: String,
}

impl Database {
    /// Opens (creating if needed) the database at `url` and applies the schema.
    pub async fn connect(url: &str) -> Result<Self, DbInitError> {
        let in_memory = url.contains(":memory:");

        if !in_memory {
            if let Some(parent) = sqlite_file_path(url).and_then(|p| p.parent().map(|p| p.to_path_buf())) {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(&parent).map_err(|e| DbInitError::Io(e.to_string()))?;
                }
            }
        }

        let mut options = SqliteConnectOptions::from_str(url)
            .map_err(|e| DbInitError::Config(e.to_string()))?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(30));

        if !in_memory {
            options = options.journal_mode(SqliteJournalMode::Wal);
        }

        // Every connection to `:memory:` is a separate database, so pin a single one.
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = pool_options
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(options)
            .await?;

        if schema::run_migrations(&pool).await? {
            tracing::info!(version = schema::SCHEMA_VERSION, "database schema applied");
        }

        Ok(Self {
            pool,
            url: url.to_string(),
        })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn ping(&self) -> Result<Duration, sqlx::Error> {
        let started = std::time::Instant::now();
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(started.elapsed())
    }
}

pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub(crate) fn sqlite_file_path(url: &str) -> Option<std::path::PathBuf> {
    let rest = url.strip_prefix("sqlite://").or_else(|| url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next()?;
    if path.is_empty() {
        None
    } else {
        Some(std::path::PathBuf::from(path))
    }
}

#[derive(Debug, Error)]
pub enum DbInitError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_file_path() {
        assert_eq!(
            sqlite_file_path("sqlite:/tmp/a/data.db?mode=rwc"),
            Some(std::path::PathBuf::from("/tmp/a/data.db"))
        );
        assert_eq!(
            sqlite_file_path("sqlite://data.db"),
            Some(std::path::PathBuf::from("data.db"))
        );
        assert_eq!(sqlite_file_path("postgres://x"), None);
    }

    #[tokio::test]
    async fn test_connect_in_memory_applies_schema() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        assert_eq!(
            schema::schema_version(db.pool()).await.as_deref(),
            Some(schema::SCHEMA_VERSION)
        );
        assert!(db.ping().await.is_ok());
        assert!(!schema::run_migrations(db.pool()).await.unwrap());
    }
}
