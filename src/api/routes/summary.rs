use axum::{extract::State, Json};
use crate::api::AppState;
use crate::errors::AlertDeskError;
use crate::selectors::StatusSummary;

pub async fn get_summary(State(state): State<AppState>) -> Result<Json<StatusSummary>, AlertDeskError> {
    Ok(Json(state.db.status_summary()?))
}
