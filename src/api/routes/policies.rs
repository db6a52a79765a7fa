use axum::{
    extract::{Query, State},
    Json,
};
use tracing::info;
use crate::api::models::PolicyListQuery;
use crate::api::AppState;
use crate::errors::AlertDeskError;
use crate::models::{BulkOutcome, FilePolicyRecord, Page, PolicyMoveRequest, PolicyRemoveRequest};
use crate::selectors;

pub async fn list_policies(
    State(state): State<AppState>,
    Query(query): Query<PolicyListQuery>,
) -> Result<Json<Page<FilePolicyRecord>>, AlertDeskError> {
    let records = state.db.list_policies(query.policy)?;
    Ok(Json(selectors::paginate(&records, query.page())))
}

pub async fn bulk_move(
    State(state): State<AppState>,
    Json(req): Json<PolicyMoveRequest>,
) -> Result<Json<BulkOutcome>, AlertDeskError> {
    req.validate()?;
    let updated = state.db.move_policies(&req.ids, req.policy)?;
    info!(requested = req.ids.len(), updated, to = %req.policy, "Policies moved");
    Ok(Json(BulkOutcome { updated }))
}

pub async fn bulk_remove(
    State(state): State<AppState>,
    Json(req): Json<PolicyRemoveRequest>,
) -> Result<Json<BulkOutcome>, AlertDeskError> {
    req.validate()?;
    let updated = state.db.remove_policies(&req.ids)?;
    info!(requested = req.ids.len(), updated, "Policies removed");
    Ok(Json(BulkOutcome { updated }))
}
