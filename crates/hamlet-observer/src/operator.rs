//! Operator REST API handlers for runtime simulation control.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/api/operator/pause` | Pause the step loop |
//! | `POST` | `/api/operator/resume` | Resume the step loop |
//! | `POST` | `/api/operator/speed` | Set step interval (ms) |
//! | `GET` | `/api/operator/status` | Current simulation status |
//! | `POST` | `/api/operator/directive` | Queue a directive for the next step |
//! | `POST` | `/api/operator/stop` | Trigger clean shutdown |

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use hamlet_core::operator::{MIN_STEP_INTERVAL_MS, OperatorState};

use crate::error::ObserverError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/operator/speed`.
#[derive(Debug, serde::Deserialize)]
pub struct SetSpeedRequest {
    /// New step interval in milliseconds (minimum 100).
    pub step_interval_ms: u64,
}

/// Request body for `POST /api/operator/directive`.
#[derive(Debug, serde::Deserialize)]
pub struct DirectiveRequest {
    /// Directive text shown to every agent.
    pub text: String,
}

/// Generic success response.
#[derive(Debug, serde::Serialize)]
struct OperatorResponse {
    /// Whether the operation succeeded.
    ok: bool,
    /// Human-readable message.
    message: String,
}

fn operator(state: &AppState) -> Result<&Arc<OperatorState>, ObserverError> {
    state
        .operator_state
        .as_ref()
        .ok_or_else(|| ObserverError::Internal("operator state not available".to_owned()))
}

fn ok(message: impl Into<String>) -> Json<OperatorResponse> {
    Json(OperatorResponse {
        ok: true,
        message: message.into(),
    })
}

// ---------------------------------------------------------------------------
// Loop control
// ---------------------------------------------------------------------------

/// Pause the step loop. State is kept in memory until resumed.
pub async fn pause(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    operator(&state)?.pause();
    Ok(ok("Simulation paused"))
}

/// Resume the step loop after a pause.
pub async fn resume(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    operator(&state)?.resume();
    Ok(ok("Simulation resumed"))
}

/// Trigger a clean shutdown. The loop finishes its current step first;
/// the HTTP server keeps serving the final state.
pub async fn stop(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    operator(&state)?.request_stop();
    Ok(ok("Stop requested -- simulation will end after current step"))
}

/// Change the step interval at runtime.
///
/// Takes effect before the next sleep. Values below 100ms are rejected.
pub async fn set_speed(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SetSpeedRequest>,
) -> Result<impl IntoResponse, ObserverError> {
    operator(&state)?
        .set_step_interval_ms(body.step_interval_ms)
        .map_or_else(
            || {
                Err(ObserverError::InvalidRequest(format!(
                    "step_interval_ms must be at least {MIN_STEP_INTERVAL_MS}"
                )))
            },
            |prev| {
                Ok(Json(serde_json::json!({
                    "ok": true,
                    "message": format!("Step interval changed from {}ms to {}ms", prev, body.step_interval_ms),
                    "previous_interval_ms": prev,
                    "new_interval_ms": body.step_interval_ms,
                })))
            },
        )
}

// ---------------------------------------------------------------------------
// POST /api/operator/directive
// ---------------------------------------------------------------------------

/// Queue a directive. It joins the directive queue before the next step
/// and stays visible to every agent for two steps.
pub async fn submit_directive(
    State(state): State<Arc<AppState>>,
    Json(body): Json<DirectiveRequest>,
) -> Result<impl IntoResponse, ObserverError> {
    if !operator(&state)?.submit_directive(&body.text).await {
        return Err(ObserverError::InvalidRequest(
            "directive text must not be empty".to_owned(),
        ));
    }
    Ok(ok(format!("Directive '{}' queued for next step", body.text.trim())))
}

// ---------------------------------------------------------------------------
// GET /api/operator/status
// ---------------------------------------------------------------------------

/// Return the current step, pause state, speed, limits, queue length, and
/// end reason.
pub async fn status(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    let operator = operator(&state)?;
    let (step, sim_time, agent_count) = {
        let snapshot = state.snapshot.read().await;
        (snapshot.step, snapshot.sim_time.clone(), snapshot.agents.len())
    };
    Ok(Json(operator.status(step, sim_time, agent_count).await))
}
