use axum::{extract::State, Json};
use serde_json::{json, Value};
use crate::api::AppState;
use crate::errors::AlertDeskError;

pub async fn get_settings(State(state): State<AppState>) -> Result<Json<Value>, AlertDeskError> {
    state.db.get_all_settings().map(Json)
}

pub async fn update_settings(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AlertDeskError> {
    let obj = body
        .as_object()
        .ok_or_else(|| AlertDeskError::Validation("Settings body must be a JSON object".into()))?;
    let updated = state.db.set_settings(obj)?;
    Ok(Json(json!({"updated": updated})))
}
