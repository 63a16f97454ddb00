//! Context records handed to the planning oracle.
//!
//! A [`StepContext`] is assembled for every agent on every step; a
//! [`DailyContext`] only when the agent's daily plan is stale. Both are
//! plain serializable snapshots so the oracle never touches live state.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::grid::{Position, TileKind};

// ---------------------------------------------------------------------------
// Agent profile
// ---------------------------------------------------------------------------

/// Identity and trait snapshot of one agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AgentProfile {
    /// Unique display name.
    pub name: String,
    /// Occupation, e.g. `Farmer`.
    pub role: String,
    /// Age in years.
    pub age: u32,
    /// Short personality descriptor, e.g. `Grumpy`.
    pub personality: String,
    /// Position at the time the snapshot was taken.
    pub position: Position,
    /// How many tiles the agent can see in every direction.
    pub vision_radius: u32,
}

// ---------------------------------------------------------------------------
// Vision
// ---------------------------------------------------------------------------

/// A non-default tile inside an agent's field of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct VisibleTile {
    /// Where the tile is.
    pub position: Position,
    /// What the tile is.
    pub kind: TileKind,
}

/// Another agent inside the field of view, with what it last said.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct VisibleAgent {
    /// The other agent's name.
    pub name: String,
    /// Where the other agent stands.
    pub position: Position,
    /// The other agent's last committed speech (empty if silent).
    pub speech: String,
}

/// Everything one agent can see this step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct VisibleEntities {
    /// Non-default terrain in row-major order.
    pub tiles: Vec<VisibleTile>,
    /// Other agents in roster order.
    pub agents: Vec<VisibleAgent>,
}

// ---------------------------------------------------------------------------
// Planning contexts
// ---------------------------------------------------------------------------

/// Input for a single micro-step plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct StepContext {
    /// Simulated clock time formatted `HH:MM`.
    pub time: String,
    /// The planning agent.
    pub agent: AgentProfile,
    /// What the agent can currently see.
    pub vision: VisibleEntities,
    /// The agent's previous cleaned plan text or illegal-move feedback.
    pub prev_action_plan: String,
    /// The agent's current daily plan (empty if none yet).
    pub daily_plan: String,
    /// Live operator directive texts in insertion order.
    pub directives: Vec<String>,
}

/// Input for a daily plan refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DailyContext {
    /// Simulated date formatted `YYYY-MM-DD`.
    pub date: String,
    /// Free-text description of the world layout.
    pub layout_summary: String,
    /// The planning agent.
    pub agent: AgentProfile,
    /// The plan being replaced (empty if none).
    pub previous_daily_plan: String,
}
