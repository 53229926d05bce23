//! Session snapshot storage.
//!
//! Snapshots are whole JSON documents keyed per word set; the last write wins.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::db::{now_iso, Database};
use crate::services::exam_session::ExamSession;
use crate::services::learn_session::LearnSession;

pub const LEARN_SESSION_PREFIX: &str = "learn_session_";
pub const EXAM_SESSION_PREFIX: &str = "exam_session_";

pub fn learn_session_key(word_set_id: &str) -> String {
    format!("{LEARN_SESSION_PREFIX}{word_set_id}")
}

pub fn exam_session_key(word_set_id: &str) -> String {
    format!("{EXAM_SESSION_PREFIX}{word_set_id}")
}

#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error("failed to serialize session: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("session storage unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, SessionStoreError>;
    async fn set(&self, key: &str, value: String) -> Result<(), SessionStoreError>;
    async fn remove(&self, key: &str) -> Result<(), SessionStoreError>;
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, key: &str) -> Result<Option<String>, SessionStoreError> {
        Ok(self.entries.read().get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), SessionStoreError> {
        self.entries.write().insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), SessionStoreError> {
        self.entries.write().remove(key);
        Ok(())
    }
}

pub struct SqliteSessionStore {
    db: Database,
}

impl SqliteSessionStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn get(&self, key: &str) -> Result<Option<String>, SessionStoreError> {
        let value: Option<String> =
            sqlx::query_scalar(r#"SELECT "value" FROM "session_snapshots" WHERE "key" = ?"#)
                .bind(key)
                .fetch_optional(self.db.pool())
                .await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: String) -> Result<(), SessionStoreError> {
        sqlx::query(
            r#"
            INSERT INTO "session_snapshots" ("key", "value", "updatedAt")
            VALUES (?, ?, ?)
            ON CONFLICT ("key") DO UPDATE SET "value" = excluded."value", "updatedAt" = excluded."updatedAt"
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(now_iso())
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), SessionStoreError> {
        sqlx::query(r#"DELETE FROM "session_snapshots" WHERE "key" = ?"#)
            .bind(key)
            .execute(self.db.pool())
            .await?;
        Ok(())
    }
}

/// Typed access to learn and exam snapshots on top of a [`SessionStore`].
#[derive(Clone)]
pub struct SessionRepository {
    store: Arc<dyn SessionStore>,
}

impl SessionRepository {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub async fn load_learn(&self, word_set_id: &str) -> Result<Option<LearnSession>, SessionStoreError> {
        self.load(&learn_session_key(word_set_id)).await
    }

    pub async fn save_learn(&self, session: &LearnSession) -> Result<(), SessionStoreError> {
        self.save(&learn_session_key(&session.word_set_id), session).await
    }

    pub async fn clear_learn(&self, word_set_id: &str) -> Result<(), SessionStoreError> {
        self.store.remove(&learn_session_key(word_set_id)).await
    }

    pub async fn load_exam(&self, word_set_id: &str) -> Result<Option<ExamSession>, SessionStoreError> {
        self.load(&exam_session_key(word_set_id)).await
    }

    pub async fn save_exam(&self, session: &ExamSession) -> Result<(), SessionStoreError> {
        self.save(&exam_session_key(&session.word_set_id), session).await
    }

    pub async fn clear_exam(&self, word_set_id: &str) -> Result<(), SessionStoreError> {
        self.store.remove(&exam_session_key(word_set_id)).await
    }

    pub async fn clear_all(&self, word_set_id: &str) -> Result<(), SessionStoreError> {
        self.clear_learn(word_set_id).await?;
        self.clear_exam(word_set_id).await
    }

    /// A snapshot that no longer parses counts as "no session".
    async fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, SessionStoreError> {
        let Some(raw) = self.store.get(key).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                tracing::warn!(key, error = %err, "discarding unreadable session snapshot");
                Ok(None)
            }
        }
    }

    async fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), SessionStoreError> {
        let raw = serde_json::to_string(value)?;
        self.store.set(key, raw).await
    }
}
