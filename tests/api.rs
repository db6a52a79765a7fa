use axum::http::StatusCode;
use axum::body::Body;
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use tower::ServiceExt;
use serde_json::{json, Value};
use alertdesk::api::{build_router, AppState};
use alertdesk::db::Database;
use alertdesk::demo;
use alertdesk::models::{AlertRecord, ExceptionKind, ProcessStatus, RiskScore, Verdict};

fn alert(id: &str, minutes_ago: i64, risk: u8, verdict: Verdict, server_ip: &str) -> AlertRecord {
    AlertRecord {
        id: id.to_string(),
        time: Utc::now() - Duration::minutes(minutes_ago),
        file_name: format!("{}.exe", id),
        server_ip: server_ip.to_string(),
        risk: RiskScore::new(risk),
        verdict,
        process_status: ProcessStatus::Pending,
        exception: ExceptionKind::None,
        memo: None,
        processed_by: None,
    }
}

fn create_test_state() -> AppState {
    let db = Database::in_memory().unwrap();
    let mut done = alert("a4", 40, 20, Verdict::Benign, "10.0.0.2");
    done.process_status = ProcessStatus::NoAction;
    db.insert_alerts(&[
        alert("a1", 10, 95, Verdict::Malware, "10.0.0.1"),
        alert("a2", 20, 60, Verdict::Suspicious, "10.0.0.1"),
        alert("a3", 30, 85, Verdict::Malware, "10.0.0.2"),
        done,
    ]).unwrap();
    db.insert_servers(&demo::sample_servers()).unwrap();
    AppState { db }
}

fn app(state: &AppState) -> axum::Router {
    build_router(state.clone())
}

fn make_request(method: &str, uri: &str, body: Option<Value>) -> axum::http::Request<Body> {
    let builder = axum::http::Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");

    match body {
        Some(b) => builder.body(Body::from(serde_json::to_string(&b).unwrap())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn response_json(response: axum::http::Response<Body>) -> Value {
    let (parts, body) = response.into_parts();
    let bytes = body.collect().await.unwrap().to_bytes();
    if bytes.is_empty() {
        panic!("Empty response body. Status: {}, Headers: {:?}", parts.status, parts.headers);
    }
    serde_json::from_slice(&bytes)
        .unwrap_or_else(|e| panic!("JSON parse error: {}. Body: {:?}", e, String::from_utf8_lossy(&bytes)))
}

async fn call(state: &AppState, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let response = app(state).oneshot(make_request(method, uri, body)).await.unwrap();
    let status = response.status();
    (status, response_json(response).await)
}

fn ids(page: &Value) -> Vec<String> {
    page["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_health_endpoint() {
    let state = create_test_state();
    let (status, body) = call(&state, "GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["alerts"], 4);
}

#[tokio::test]
async fn test_pending_list_newest_first() {
    let state = create_test_state();
    let (status, body) = call(&state, "GET", "/analysis/requests/pending", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec!["a1", "a2", "a3"]);
    assert_eq!(body["total"], 3);
    assert_eq!(body["current"], 1);
}

#[tokio::test]
async fn test_pending_list_filters_and_paginates() {
    let state = create_test_state();
    let (_, body) = call(&state, "GET", "/analysis/requests/pending?risk=high", None).await;
    assert_eq!(ids(&body), vec!["a1", "a3"]);

    let (_, body) = call(&state, "GET", "/analysis/requests/pending?risk=high&server_ip=10.0.0.2", None).await;
    assert_eq!(ids(&body), vec!["a3"]);

    let (_, body) = call(&state, "GET", "/analysis/requests/pending?current=2&pageSize=2", None).await;
    assert_eq!(ids(&body), vec!["a3"]);
    assert_eq!(body["total"], 3);
    assert_eq!(body["pageSize"], 2);
}

#[tokio::test]
async fn test_huge_page_number_returns_empty_page() {
    let state = create_test_state();
    let (status, body) = call(
        &state,
        "GET",
        "/analysis/requests/pending?current=18446744073709551615&pageSize=2",
        None,
    ).await;
    assert_eq!(status, StatusCode::OK);
    assert!(ids(&body).is_empty());
    assert_eq!(body["total"], 3);

    let (status, body) = call(&state, "GET", "/file-policies?policy=blacklist&current=18446744073709551615", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn test_bulk_action_moves_to_completed() {
    let state = create_test_state();
    let (status, body) = call(&state, "POST", "/analysis/requests/bulk-action", Some(json!({
        "ids": ["a1", "a2"],
        "process_status": "quarantine",
        "comments": "confirmed dropper",
        "user_id": "analyst-1"
    }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"], 2);

    let (_, pending) = call(&state, "GET", "/analysis/requests/pending", None).await;
    assert_eq!(ids(&pending), vec!["a3"]);

    let (_, completed) = call(&state, "GET", "/analysis/requests/completed", None).await;
    assert_eq!(ids(&completed), vec!["a1", "a2", "a4"]);
    assert_eq!(completed["data"][0]["process_status"], "quarantine");
    assert_eq!(completed["data"][0]["memo"], "confirmed dropper");
    assert_eq!(completed["data"][0]["processed_by"], "analyst-1");
}

#[tokio::test]
async fn test_bulk_action_skips_terminal_records() {
    let state = create_test_state();
    let (status, body) = call(&state, "POST", "/analysis/requests/bulk-action", Some(json!({
        "ids": ["a4"],
        "process_status": "delete"
    }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"], 0);

    let (_, detection) = call(&state, "GET", "/analysis/detection/a4", None).await;
    assert_eq!(detection["process_status"], "no_action");
}

#[tokio::test]
async fn test_bulk_action_empty_selection_rejected() {
    let state = create_test_state();
    let (status, body) = call(&state, "POST", "/analysis/requests/bulk-action", Some(json!({
        "ids": [],
        "process_status": "delete"
    }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("No records selected"));
}

#[tokio::test]
async fn test_detection_not_found() {
    let state = create_test_state();
    let (status, body) = call(&state, "GET", "/analysis/detection/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("missing"));
}

#[tokio::test]
async fn test_exception_creates_and_clears_policies() {
    let state = create_test_state();
    let (status, body) = call(&state, "POST", "/analysis/requests/exception", Some(json!({
        "ids": ["a1", "a3"],
        "exception": "blacklist"
    }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (_, page) = call(&state, "GET", "/file-policies?policy=blacklist", None).await;
    assert_eq!(page["total"], 2);
    assert_eq!(page["data"][0]["policy"], "blacklist");

    let (_, body) = call(&state, "POST", "/analysis/requests/exception", Some(json!({
        "ids": ["a1"],
        "exception": "none"
    }))).await;
    assert!(body.as_array().unwrap().is_empty());

    let (_, page) = call(&state, "GET", "/file-policies?policy=blacklist", None).await;
    assert_eq!(ids(&page), vec!["a3"]);
    let (_, detection) = call(&state, "GET", "/analysis/detection/a1", None).await;
    assert_eq!(detection["exception"], "none");
}

#[tokio::test]
async fn test_policy_move_and_remove() {
    let state = create_test_state();
    call(&state, "POST", "/analysis/requests/exception", Some(json!({
        "ids": ["a1", "a2"],
        "exception": "whitelist"
    }))).await;

    let (status, body) = call(&state, "POST", "/file-policies/bulk-move", Some(json!({
        "ids": ["a1"],
        "policy": "blacklist"
    }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"], 1);

    let (_, white) = call(&state, "GET", "/file-policies?policy=whitelist", None).await;
    assert_eq!(ids(&white), vec!["a2"]);
    let (_, detection) = call(&state, "GET", "/analysis/detection/a1", None).await;
    assert_eq!(detection["exception"], "blacklist");

    let (_, body) = call(&state, "POST", "/file-policies/bulk-remove", Some(json!({
        "ids": ["a1", "a2"]
    }))).await;
    assert_eq!(body["updated"], 2);
    let (_, black) = call(&state, "GET", "/file-policies?policy=blacklist", None).await;
    assert_eq!(black["total"], 0);
}

#[tokio::test]
async fn test_servers_list_and_assign() {
    let state = create_test_state();
    let (status, body) = call(&state, "GET", "/policy/servers", None).await;
    assert_eq!(status, StatusCode::OK);
    let servers = body.as_array().unwrap();
    assert_eq!(servers.len(), demo::sample_servers().len());

    let (status, body) = call(&state, "POST", "/policy/servers/assign", Some(json!({
        "ids": ["server-4"],
        "cluster": "prod-west",
        "manager": null
    }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"], 1);

    let (_, body) = call(&state, "GET", "/policy/servers", None).await;
    let server = body
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["id"] == "server-4")
        .unwrap()
        .clone();
    assert_eq!(server["cluster"], "prod-west");
}

#[tokio::test]
async fn test_assign_without_target_rejected() {
    let state = create_test_state();
    let (status, _) = call(&state, "POST", "/policy/servers/assign", Some(json!({
        "ids": ["server-1"],
        "cluster": null,
        "manager": null
    }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_summary_counts() {
    let state = create_test_state();
    let (status, body) = call(&state, "GET", "/analysis/summary", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pending"], 3);
    assert_eq!(body["no_action"], 1);
    assert_eq!(body["by_verdict"]["Malware"], 2);
}

#[tokio::test]
async fn test_settings_round_trip() {
    let state = create_test_state();
    let (status, body) = call(&state, "PUT", "/server-settings", Some(json!({
        "retention_days": 30,
        "auto_quarantine": true
    }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"], 2);

    let (_, body) = call(&state, "GET", "/server-settings", None).await;
    assert_eq!(body["retention_days"], "30");
    assert_eq!(body["auto_quarantine"], "true");

    let (status, _) = call(&state, "PUT", "/server-settings", Some(json!({"nested": {"a": 1}}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
