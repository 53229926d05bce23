use std::sync::Arc;
use std::time::{Instant, SystemTime};

use crate::config::{Config, SessionStoreKind};
use crate::db::{Database, DbInitError};
use crate::services::{MemorySessionStore, SessionRepository, SessionStore, SqliteSessionStore};

#[derive(Clone)]
pub struct AppState {
    started_at: Instant,
    started_at_system: SystemTime,
    db: Database,
    sessions: SessionRepository,
}

impl AppState {
    pub fn new(db: Database, session_store: Arc<dyn SessionStore>) -> Self {
        Self {
            started_at: Instant::now(),
            started_at_system: SystemTime::now(),
            db,
            sessions: SessionRepository::new(session_store),
        }
    }

    pub async fn from_config(config: &Config) -> Result<Self, DbInitError> {
        let db = Database::connect(&config.database_url).await?;

        let store: Arc<dyn SessionStore> = match config.session_store {
            SessionStoreKind::Sqlite => Arc::new(SqliteSessionStore::new(db.clone())),
            SessionStoreKind::Memory => Arc::new(MemorySessionStore::new()),
        };

        Ok(Self::new(db, store))
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn started_at_system(&self) -> SystemTime {
        self.started_at_system
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn sessions(&self) -> &SessionRepository {
        &self.sessions
    }
}
