use axum::{extract::State, Json};
use crate::api::models::HealthResponse;
use crate::api::AppState;
use crate::errors::AlertDeskError;

pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, AlertDeskError> {
    let alerts = state.db.count_alerts()?;
    Ok(Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        git_hash: option_env!("ALERTDESK_GIT_HASH"),
        built_at: option_env!("ALERTDESK_BUILT_AT"),
        alerts,
    }))
}
