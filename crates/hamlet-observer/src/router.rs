//! Axum router construction for the Observer API.
//!
//! Assembles all routes (REST + `WebSocket`) into a single [`Router`]
//! with CORS middleware enabled for cross-origin dashboard access.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, operator, ws};

/// Build the complete Axum router for the Observer server.
///
/// The router includes:
/// - `GET /` -- minimal HTML status page
/// - `GET /ws/steps` -- `WebSocket` step summary stream
/// - `GET /api/status`, `/api/agents`, `/api/agents/{name}`,
///   `/api/messages`, `/api/directives`, `/api/world` -- read-only state
/// - `/api/operator/*` -- runtime control and directive submission
///
/// CORS allows any origin.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Status page
        .route("/", get(handlers::index))
        // WebSocket
        .route("/ws/steps", get(ws::ws_steps))
        // REST API
        .route("/api/status", get(handlers::get_status))
        .route("/api/agents", get(handlers::list_agents))
        .route("/api/agents/{name}", get(handlers::get_agent))
        .route("/api/messages", get(handlers::list_messages))
        .route("/api/directives", get(handlers::list_directives))
        .route("/api/world", get(handlers::get_world))
        // Operator
        .route("/api/operator/pause", post(operator::pause))
        .route("/api/operator/resume", post(operator::resume))
        .route("/api/operator/stop", post(operator::stop))
        .route("/api/operator/speed", post(operator::set_speed))
        .route("/api/operator/status", get(operator::status))
        .route("/api/operator/directive", post(operator::submit_directive))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
