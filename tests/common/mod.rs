#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use wordset_backend::config::Config;
use wordset_backend::db::Database;
use wordset_backend::services::{SessionStore, SessionStoreError};
use wordset_backend::state::AppState;

pub async fn create_test_app() -> Router {
    wordset_backend::create_app(&Config::in_memory())
        .await
        .expect("in-memory app")
}

pub async fn create_test_app_with_store(store: Arc<dyn SessionStore>) -> Router {
    let config = Config::in_memory();
    let db = Database::connect(&config.database_url)
        .await
        .expect("in-memory database");
    wordset_backend::build_app(AppState::new(db, store), &config)
}

/// Reads fine, refuses every write.
pub struct ReadOnlySessionStore;

#[async_trait]
impl SessionStore for ReadOnlySessionStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, SessionStoreError> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: String) -> Result<(), SessionStoreError> {
        Err(SessionStoreError::Unavailable("quota exceeded".to_string()))
    }

    async fn remove(&self, _key: &str) -> Result<(), SessionStoreError> {
        Ok(())
    }
}

pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

/// Posts `raw` verbatim as a JSON body, for bodies `serde_json::Value` cannot express.
pub async fn post_raw(app: &Router, uri: &str, raw: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(raw.to_string()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, "GET", uri, None).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, "POST", uri, Some(body)).await
}

pub async fn put(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, "PUT", uri, Some(body)).await
}

pub async fn delete(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, "DELETE", uri, None).await
}

/// Creates a word set with `count` words named `word{i}` / `뜻{i}` and returns its id.
pub async fn seed_word_set(app: &Router, count: usize) -> String {
    let words: Vec<Value> = (0..count)
        .map(|i| serde_json::json!({ "text": format!("word{i}"), "meaning": format!("뜻{i}") }))
        .collect();
    let (status, body) = post(
        app,
        "/api/wordsets",
        serde_json::json!({ "name": "Seeded", "words": words }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["id"].as_str().unwrap().to_string()
}
