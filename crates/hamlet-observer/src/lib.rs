//! Observer API server for the Hamlet simulation.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **`WebSocket` endpoint** (`/ws/steps`) streaming step summaries via
//!   [`tokio::sync::broadcast`]
//! - **REST endpoints** for agents, the message log, active directives,
//!   and the village map
//! - **Operator endpoints** for pause, resume, speed, stop, status, and
//!   directive submission
//! - **Minimal HTML page** (`GET /`) with the current step and links
//!
//! REST reads come from an in-memory [`VillageSnapshot`] the engine
//! refreshes after each step, so the observer never holds the
//! simulation itself.
//!
//! [`VillageSnapshot`]: state::VillageSnapshot

pub mod error;
pub mod handlers;
pub mod operator;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use startup::{StartupError, spawn_observer};
pub use state::{AppState, VillageSnapshot, WorldInfo};
