//! Shared application state for the Observer API server.
//!
//! [`AppState`] holds the broadcast channel for step summaries and an
//! in-memory [`VillageSnapshot`] that the REST endpoints serve. The engine
//! refreshes the snapshot after every step.

use std::sync::Arc;

use hamlet_core::agent::Agent;
use hamlet_core::directive::Directive;
use hamlet_core::operator::OperatorState;
use hamlet_core::simulation::Simulation;
use hamlet_core::step::StepSummary;
use hamlet_world::{TileMap, WorldView, describe_layout};
use serde::Serialize;
use tokio::sync::{RwLock, broadcast};

/// Capacity of the broadcast channel for step summaries.
///
/// A subscriber that falls behind by more than this many messages
/// receives [`broadcast::error::RecvError::Lagged`] and skips ahead.
const BROADCAST_CAPACITY: usize = 256;

/// Static description of the village grid.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WorldInfo {
    /// Grid width in tiles.
    pub width: u32,
    /// Grid height in tiles.
    pub height: u32,
    /// Notable features and where they are.
    pub layout_summary: String,
    /// The grid rendered one glyph per tile.
    pub ascii: String,
}

impl WorldInfo {
    /// Describe a tile map.
    pub fn from_map(map: &TileMap) -> Self {
        Self {
            width: map.width(),
            height: map.height(),
            layout_summary: describe_layout(map),
            ascii: map.render_ascii(),
        }
    }
}

/// In-memory copy of the simulation state served by REST endpoints.
#[derive(Debug, Clone, Default, Serialize)]
pub struct VillageSnapshot {
    /// Completed steps.
    pub step: u64,
    /// Simulated time, `YYYY-MM-DD HH:MM`.
    pub sim_time: String,
    /// All agent records in roster order.
    pub agents: Vec<Agent>,
    /// Message log lines, oldest first.
    pub messages: Vec<String>,
    /// Directives still in effect.
    pub directives: Vec<Directive>,
    /// The village grid.
    pub world: WorldInfo,
}

impl VillageSnapshot {
    /// Copy the mutable parts of `sim` into the snapshot. The world
    /// description is left as it is.
    pub fn refresh(&mut self, sim: &Simulation) {
        self.step = sim.step_count();
        self.sim_time = sim.clock.current_time().format("%Y-%m-%d %H:%M").to_string();
        self.agents.clone_from(&sim.agents);
        self.messages = sim.message_log.lines();
        self.directives = sim.directives.iter().cloned().collect();
    }

    /// Look up an agent by name.
    pub fn agent(&self, name: &str) -> Option<&Agent> {
        self.agents.iter().find(|a| a.name == name)
    }
}

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Broadcast sender for step summaries.
    pub tx: broadcast::Sender<StepSummary>,
    /// The current snapshot (refreshed each step).
    pub snapshot: Arc<RwLock<VillageSnapshot>>,
    /// Shared operator control state (present when the simulation is running).
    pub operator_state: Option<Arc<OperatorState>>,
}

impl AppState {
    /// Create application state with an empty snapshot.
    pub fn new() -> Self {
        Self::build(VillageSnapshot::default(), None)
    }

    /// Create application state with operator control attached.
    pub fn with_operator(operator: Arc<OperatorState>, world: WorldInfo) -> Self {
        Self::build(
            VillageSnapshot {
                world,
                ..VillageSnapshot::default()
            },
            Some(operator),
        )
    }

    fn build(snapshot: VillageSnapshot, operator_state: Option<Arc<OperatorState>>) -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            tx,
            snapshot: Arc::new(RwLock::new(snapshot)),
            operator_state,
        }
    }

    /// Subscribe to the step broadcast channel.
    pub fn subscribe(&self) -> broadcast::Receiver<StepSummary> {
        self.tx.subscribe()
    }

    /// Publish a step summary to all connected clients.
    ///
    /// Returns the number of receivers, 0 when nobody is connected.
    pub fn broadcast(&self, summary: &StepSummary) -> usize {
        // send fails only when there are no receivers
        self.tx.send(summary.clone()).unwrap_or(0)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
