pub mod config;
pub mod db;
pub mod logging;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;

use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::Config;
use crate::db::DbInitError;
use crate::state::AppState;

pub fn build_app(state: AppState, config: &Config) -> axum::Router {
    routes::router(state, &config.healthcheck_endpoint)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

pub async fn create_app(config: &Config) -> Result<axum::Router, DbInitError> {
    let state = AppState::from_config(config).await?;
    Ok(build_app(state, config))
}
