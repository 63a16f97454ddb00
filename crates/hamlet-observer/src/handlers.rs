//! REST API endpoint handlers for the Observer server.
//!
//! All handlers read from the in-memory [`VillageSnapshot`] via the
//! shared [`AppState`].
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML status page |
//! | `GET` | `/api/status` | Step, simulated time, agent count |
//! | `GET` | `/api/agents` | All agent records |
//! | `GET` | `/api/agents/{name}` | One agent record |
//! | `GET` | `/api/messages` | Message log lines |
//! | `GET` | `/api/directives` | Active directives |
//! | `GET` | `/api/world` | Grid size, layout summary, ASCII map |
//!
//! [`VillageSnapshot`]: crate::state::VillageSnapshot

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse};
use serde::Serialize;

use crate::error::ObserverError;
use crate::state::AppState;

/// Response body for `GET /api/status`.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Completed steps.
    pub step: u64,
    /// Simulated time.
    pub sim_time: String,
    /// Number of agents in the village.
    pub agent_count: usize,
}

// ---------------------------------------------------------------------------
// GET / -- minimal HTML status page
// ---------------------------------------------------------------------------

/// Serve a minimal HTML page showing the current step and API links.
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.snapshot.read().await;
    let step = snapshot.step;
    let sim_time = snapshot.sim_time.clone();
    let agent_count = snapshot.agents.len();
    let message_count = snapshot.messages.len();
    let directive_count = snapshot.directives.len();

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Hamlet Observer</title>
    <style>
        body {{
            background: #0d1117;
            color: #c9d1d9;
            font-family: 'Cascadia Code', 'Fira Code', 'Consolas', monospace;
            padding: 2rem;
            max-width: 800px;
            margin: 0 auto;
        }}
        h1 {{ color: #58a6ff; margin-bottom: 0.25rem; }}
        .metric {{
            display: inline-block;
            background: #161b22;
            border: 1px solid #30363d;
            border-radius: 6px;
            padding: 1rem 1.5rem;
            margin: 0.5rem 0.5rem 0.5rem 0;
            min-width: 120px;
        }}
        .metric .label {{ color: #8b949e; font-size: 0.85rem; }}
        .metric .value {{ color: #58a6ff; font-size: 1.5rem; font-weight: bold; }}
        a {{ color: #58a6ff; text-decoration: none; }}
        ul {{ list-style: none; padding: 0; }}
        li {{ padding: 0.3rem 0; }}
    </style>
</head>
<body>
    <h1>Hamlet Observer</h1>

    <div>
        <div class="metric"><div class="label">Step</div><div class="value">{step}</div></div>
        <div class="metric"><div class="label">Time</div><div class="value">{sim_time}</div></div>
        <div class="metric"><div class="label">Agents</div><div class="value">{agent_count}</div></div>
        <div class="metric"><div class="label">Messages</div><div class="value">{message_count}</div></div>
        <div class="metric"><div class="label">Directives</div><div class="value">{directive_count}</div></div>
    </div>

    <h2>API Endpoints</h2>
    <ul>
        <li><a href="/api/status">/api/status</a></li>
        <li><a href="/api/agents">/api/agents</a></li>
        <li><a href="/api/messages">/api/messages</a></li>
        <li><a href="/api/directives">/api/directives</a></li>
        <li><a href="/api/world">/api/world</a></li>
        <li><a href="/api/operator/status">/api/operator/status</a></li>
        <li><code>ws://host:port/ws/steps</code></li>
    </ul>
</body>
</html>"#
    ))
}

// ---------------------------------------------------------------------------
// GET /api/status
// ---------------------------------------------------------------------------

/// Return the current step, simulated time, and agent count.
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let snapshot = state.snapshot.read().await;
    Json(StatusResponse {
        step: snapshot.step,
        sim_time: snapshot.sim_time.clone(),
        agent_count: snapshot.agents.len(),
    })
}

// ---------------------------------------------------------------------------
// Agents
// ---------------------------------------------------------------------------

/// List every agent record.
pub async fn list_agents(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    let snapshot = state.snapshot.read().await;
    Ok(Json(serde_json::json!({
        "count": snapshot.agents.len(),
        "agents": serde_json::to_value(&snapshot.agents)?,
    })))
}

/// Return one agent record by name.
pub async fn get_agent(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ObserverError> {
    let snapshot = state.snapshot.read().await;
    let agent = snapshot
        .agent(&name)
        .ok_or_else(|| ObserverError::NotFound(format!("agent {name}")))?;
    Ok(Json(serde_json::to_value(agent)?))
}

// ---------------------------------------------------------------------------
// GET /api/messages, /api/directives, /api/world
// ---------------------------------------------------------------------------

/// Return the message log, oldest line first.
pub async fn list_messages(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.snapshot.read().await;
    Json(serde_json::json!({
        "count": snapshot.messages.len(),
        "messages": snapshot.messages,
    }))
}

/// Return the directives still in effect with their remaining steps.
pub async fn list_directives(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    let snapshot = state.snapshot.read().await;
    Ok(Json(serde_json::json!({
        "count": snapshot.directives.len(),
        "directives": serde_json::to_value(&snapshot.directives)?,
    })))
}

/// Return the grid size, layout summary, and ASCII map.
pub async fn get_world(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    let snapshot = state.snapshot.read().await;
    Ok(Json(serde_json::to_value(&snapshot.world)?))
}
