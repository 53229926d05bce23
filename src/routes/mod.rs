mod exam;
pub mod extract;
mod folders;
mod health;
mod learn;
pub mod validation;
mod word_sets;
mod words;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Router;

use crate::db::operations::{self, WordSet};
use crate::response::{json_error, AppError};
use crate::state::AppState;

pub fn router(state: AppState, healthcheck_endpoint: &str) -> Router {
    let mut app = Router::new()
        .nest("/api/folders", folders::router())
        .nest("/api/wordsets", word_sets::router());

    app = app.nest("/health", health::router());
    if is_health_alias(healthcheck_endpoint) {
        app = app.nest(healthcheck_endpoint, health::router());
    }

    app.fallback(fallback_handler).with_state(state)
}

/// Extra mount point for the health router; paths that would collide with
/// existing routes are ignored.
fn is_health_alias(endpoint: &str) -> bool {
    endpoint != "/health" && !endpoint.starts_with("/health/") && !endpoint.starts_with("/api/")
}

async fn fallback_handler() -> Response {
    json_error(StatusCode::NOT_FOUND, "NOT_FOUND", "요청한 경로를 찾을 수 없습니다").into_response()
}

pub(crate) async fn require_word_set(state: &AppState, word_set_id: &str) -> Result<WordSet, AppError> {
    operations::get_word_set(state.db(), word_set_id)
        .await?
        .ok_or_else(|| AppError::not_found("단어장을 찾을 수 없습니다"))
}
