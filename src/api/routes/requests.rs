use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::info;
use crate::api::AppState;
use crate::errors::AlertDeskError;
use crate::models::{
    AlertQuery, AlertRecord, BulkActionRequest, BulkOutcome, ExceptionRequest, FilePolicyRecord, Page,
};
use crate::selectors;

fn query_page(alerts: Vec<AlertRecord>, query: &AlertQuery) -> Page<AlertRecord> {
    let matching: Vec<AlertRecord> = selectors::filter_alerts(&alerts, &query.filters())
        .into_iter()
        .cloned()
        .collect();
    selectors::paginate(&matching, query.page())
}

pub async fn list_pending(
    State(state): State<AppState>,
    Query(query): Query<AlertQuery>,
) -> Result<Json<Page<AlertRecord>>, AlertDeskError> {
    let alerts = state.db.list_alerts(true)?;
    Ok(Json(query_page(alerts, &query)))
}

pub async fn list_completed(
    State(state): State<AppState>,
    Query(query): Query<AlertQuery>,
) -> Result<Json<Page<AlertRecord>>, AlertDeskError> {
    let alerts = state.db.list_alerts(false)?;
    Ok(Json(query_page(alerts, &query)))
}

pub async fn get_detection(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AlertRecord>, AlertDeskError> {
    state
        .db
        .get_alert(&id)?
        .map(Json)
        .ok_or_else(|| AlertDeskError::NotFound(format!("Detection {} not found", id)))
}

pub async fn bulk_action(
    State(state): State<AppState>,
    Json(req): Json<BulkActionRequest>,
) -> Result<Json<BulkOutcome>, AlertDeskError> {
    req.validate()?;
    let updated = state
        .db
        .bulk_update_status(&req.selected_ids, req.action, &req.memo, &req.user_id)?;
    info!(requested = req.selected_ids.len(), updated, action = %req.action, "Bulk action");
    Ok(Json(BulkOutcome { updated }))
}

pub async fn set_exception(
    State(state): State<AppState>,
    Json(req): Json<ExceptionRequest>,
) -> Result<Json<Vec<FilePolicyRecord>>, AlertDeskError> {
    req.validate()?;
    let records = state.db.set_exception(&req.ids, req.exception)?;
    info!(requested = req.ids.len(), exception = %req.exception, "Exception set");
    Ok(Json(records))
}
