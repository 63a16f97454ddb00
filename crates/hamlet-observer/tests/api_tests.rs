//! Integration tests for the Observer API endpoints.
//!
//! Tests drive the Axum `Router` directly via `tower::ServiceExt`
//! without starting a TCP server.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use hamlet_core::config::{SimulationBoundsConfig, SimulationConfig};
use hamlet_core::operator::OperatorState;
use hamlet_core::simulation::Simulation;
use hamlet_observer::router::build_router;
use hamlet_observer::state::{AppState, WorldInfo};
use hamlet_world::create_town_map;
use serde_json::Value;
use tower::ServiceExt;

fn make_operator() -> Arc<OperatorState> {
    Arc::new(OperatorState::new(
        1000,
        &SimulationBoundsConfig {
            max_steps: 50,
            max_real_time_seconds: 0,
        },
    ))
}

async fn make_test_state(operator: Option<Arc<OperatorState>>) -> Arc<AppState> {
    let map = create_town_map().unwrap();
    let world = WorldInfo::from_map(&map);
    let mut sim = Simulation::from_config(&SimulationConfig::default(), Arc::new(map)).unwrap();
    sim.add_directive("Gather at the store.");

    let state = match operator {
        Some(op) => AppState::with_operator(op, world),
        None => {
            let state = AppState::new();
            state.snapshot.write().await.world = world;
            state
        }
    };
    state.snapshot.write().await.refresh(&sim);
    Arc::new(state)
}

async fn get(state: Arc<AppState>, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = build_router(state)
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

async fn post_json(state: Arc<AppState>, uri: &str, body: &str) -> (StatusCode, Value) {
    let response = build_router(state)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_owned()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn get_json(state: Arc<AppState>, uri: &str) -> (StatusCode, Value) {
    let (status, bytes) = get(state, uri).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

// ---------------------------------------------------------------------------
// Read-only endpoints
// ---------------------------------------------------------------------------

#[tokio::test]
async fn index_returns_html() {
    let state = make_test_state(None).await;
    let (status, bytes) = get(state, "/").await;
    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(bytes).unwrap();
    assert!(html.contains("Hamlet Observer"));
    assert!(html.contains("/api/agents"));
}

#[tokio::test]
async fn status_reports_step_and_agent_count() {
    let state = make_test_state(None).await;
    let (status, json) = get_json(state, "/api/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["step"], 0);
    assert_eq!(json["agent_count"], 8);
    assert!(json["sim_time"].as_str().unwrap().ends_with("06:00"));
}

#[tokio::test]
async fn list_agents_returns_roster() {
    let state = make_test_state(None).await;
    let (status, json) = get_json(state, "/api/agents").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 8);
    let names: Vec<&str> = json["agents"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|a| a["name"].as_str())
        .collect();
    assert!(names.contains(&"Clara"));
}

#[tokio::test]
async fn get_agent_by_name() {
    let state = make_test_state(None).await;
    let (status, json) = get_json(state, "/api/agents/Clara").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "Clara");
    assert!(json["position"]["x"].is_number());
    assert_eq!(json["relationships"]["Otto"], 0);
}

#[tokio::test]
async fn unknown_agent_is_404() {
    let state = make_test_state(None).await;
    let (status, json) = get_json(state, "/api/agents/Nobody").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["status"], 404);
}

#[tokio::test]
async fn messages_include_operator_directive() {
    let state = make_test_state(None).await;
    let (status, json) = get_json(state, "/api/messages").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["messages"][0], "Operator: Gather at the store.");
}

#[tokio::test]
async fn directives_carry_ttl() {
    let state = make_test_state(None).await;
    let (status, json) = get_json(state, "/api/directives").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 1);
    assert_eq!(json["directives"][0]["text"], "Gather at the store.");
    assert_eq!(json["directives"][0]["ttl"], 2);
}

#[tokio::test]
async fn world_describes_the_map() {
    let state = make_test_state(None).await;
    let (status, json) = get_json(state, "/api/world").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["width"], 48);
    assert_eq!(json["height"], 27);
    assert_eq!(json["ascii"].as_str().unwrap().lines().count(), 27);
}

#[tokio::test]
async fn unknown_route_is_404() {
    let state = make_test_state(None).await;
    let (status, _) = get(state, "/api/nothing-here").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Operator endpoints
// ---------------------------------------------------------------------------

#[tokio::test]
async fn operator_endpoints_need_operator_state() {
    let state = make_test_state(None).await;
    let (status, _) = post_json(state, "/api/operator/pause", "").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn pause_and_resume() {
    let operator = make_operator();
    let state = make_test_state(Some(Arc::clone(&operator))).await;

    let (status, json) = post_json(Arc::clone(&state), "/api/operator/pause", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ok"], true);
    assert!(operator.is_paused());

    let (status, _) = post_json(state, "/api/operator/resume", "").await;
    assert_eq!(status, StatusCode::OK);
    assert!(!operator.is_paused());
}

#[tokio::test]
async fn stop_sets_flag() {
    let operator = make_operator();
    let state = make_test_state(Some(Arc::clone(&operator))).await;
    let (status, _) = post_json(state, "/api/operator/stop", "").await;
    assert_eq!(status, StatusCode::OK);
    assert!(operator.is_stop_requested());
}

#[tokio::test]
async fn speed_change_and_minimum() {
    let operator = make_operator();
    let state = make_test_state(Some(Arc::clone(&operator))).await;

    let (status, json) = post_json(
        Arc::clone(&state),
        "/api/operator/speed",
        r#"{"step_interval_ms": 250}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["previous_interval_ms"], 1000);
    assert_eq!(operator.step_interval_ms(), 250);

    let (status, _) = post_json(state, "/api/operator/speed", r#"{"step_interval_ms": 10}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(operator.step_interval_ms(), 250);
}

#[tokio::test]
async fn directive_submission_is_queued() {
    let operator = make_operator();
    let state = make_test_state(Some(Arc::clone(&operator))).await;

    let (status, _) = post_json(
        Arc::clone(&state),
        "/api/operator/directive",
        r#"{"text": "  Meet at the bridge.  "}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = post_json(state, "/api/operator/directive", r#"{"text": "   "}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(operator.drain_directives().await, vec!["Meet at the bridge.".to_owned()]);
}

#[tokio::test]
async fn operator_status_reports_limits() {
    let operator = make_operator();
    operator.pause();
    assert!(operator.submit_directive("Close the store early.").await);
    let state = make_test_state(Some(operator)).await;
    let (status, json) = get_json(state, "/api/operator/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["paused"], true);
    assert_eq!(json["max_steps"], 50);
    assert_eq!(json["agent_count"], 8);
    assert_eq!(json["step_interval_ms"], 1000);
    assert_eq!(json["pending_directives"], 1);
    assert!(json["end_reason"].is_null());
}
