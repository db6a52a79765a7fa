pub mod routes;
pub mod models;
pub mod errors;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use crate::db::Database;
use crate::errors::AlertDeskError;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
}

pub async fn create_app_state(db_path: &str) -> Result<AppState, AlertDeskError> {
    let db = Database::new(db_path)?;
    Ok(AppState { db })
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(routes::health::health_check))
        .route("/analysis/requests/pending", get(routes::requests::list_pending))
        .route("/analysis/requests/completed", get(routes::requests::list_completed))
        .route("/analysis/requests/bulk-action", post(routes::requests::bulk_action))
        .route("/analysis/requests/exception", post(routes::requests::set_exception))
        .route("/analysis/detection/:id", get(routes::requests::get_detection))
        .route("/analysis/summary", get(routes::summary::get_summary))
        .route("/file-policies", get(routes::policies::list_policies))
        .route("/file-policies/bulk-move", post(routes::policies::bulk_move))
        .route("/file-policies/bulk-remove", post(routes::policies::bulk_remove))
        .route("/policy/servers", get(routes::servers::list_servers))
        .route("/policy/servers/assign", post(routes::servers::assign_servers))
        .route("/server-settings", get(routes::settings::get_settings).put(routes::settings::update_settings))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
