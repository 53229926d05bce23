use std::time::{Duration, SystemTime};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::db::now_iso;
use crate::state::AppState;

const DB_CHECK_TIMEOUT: Duration = Duration::from_secs(2);

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/info", get(info))
        .route("/live", get(live))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    database: &'static str,
    #[serde(rename = "latencyMs", skip_serializing_if = "Option::is_none")]
    latency_ms: Option<u64>,
    timestamp: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LivenessResponse {
    status: &'static str,
    timestamp: String,
    uptime: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthInfoResponse {
    service: &'static str,
    version: &'static str,
    database: String,
    start_time: String,
    uptime: u64,
}

enum DbCheckStatus {
    Connected { latency_ms: u64 },
    Timeout,
    Disconnected,
}

async fn root(State(state): State<AppState>) -> Response {
    let (database, latency_ms) = match database_check(&state).await {
        DbCheckStatus::Connected { latency_ms } => ("connected", Some(latency_ms)),
        DbCheckStatus::Timeout => ("timeout", None),
        DbCheckStatus::Disconnected => ("disconnected", None),
    };
    let ok = database == "connected";

    let response = HealthResponse {
        status: if ok { "ok" } else { "degraded" },
        database,
        latency_ms,
        timestamp: now_iso(),
    };

    let status_code = if ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status_code, Json(response)).into_response()
}

async fn live(State(state): State<AppState>) -> Response {
    Json(LivenessResponse {
        status: "healthy",
        timestamp: now_iso(),
        uptime: state.uptime_seconds(),
    })
    .into_response()
}

async fn info(State(state): State<AppState>) -> Response {
    let url = state.db().url();
    let database = if url.contains(":memory:") {
        "memory".to_string()
    } else {
        crate::db::sqlite_file_path(url)
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| url.to_string())
    };

    Json(HealthInfoResponse {
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        database,
        start_time: system_time_iso(state.started_at_system()),
        uptime: state.uptime_seconds(),
    })
    .into_response()
}

async fn database_check(state: &AppState) -> DbCheckStatus {
    match tokio::time::timeout(DB_CHECK_TIMEOUT, state.db().ping()).await {
        Ok(Ok(latency)) => DbCheckStatus::Connected {
            latency_ms: latency.as_millis() as u64,
        },
        Ok(Err(err)) => {
            tracing::warn!(error = %err, "health check: database ping failed");
            DbCheckStatus::Disconnected
        }
        Err(_) => DbCheckStatus::Timeout,
    }
}

fn system_time_iso(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
