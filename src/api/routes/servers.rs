use axum::{extract::State, Json};
use crate::api::AppState;
use crate::errors::AlertDeskError;
use crate::models::{BulkOutcome, ServerAssignment, ServerRecord};

pub async fn list_servers(State(state): State<AppState>) -> Result<Json<Vec<ServerRecord>>, AlertDeskError> {
    Ok(Json(state.db.list_servers()?))
}

pub async fn assign_servers(
    State(state): State<AppState>,
    Json(req): Json<ServerAssignment>,
) -> Result<Json<BulkOutcome>, AlertDeskError> {
    req.validate()?;
    let updated = state
        .db
        .assign_servers(&req.ids, req.cluster.as_deref(), req.manager.as_deref())?;
    Ok(Json(BulkOutcome { updated }))
}
