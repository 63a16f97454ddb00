//! Shared type definitions for the Hamlet village simulation.
//!
//! Every crate in the workspace speaks in these types: the grid vocabulary
//! used by the world, the context records handed to the planning oracle,
//! and the plan payloads it answers with. Types flow downstream to
//! `TypeScript` via `ts-rs` for the observer dashboard.
//!
//! # Modules
//!
//! - [`grid`] -- Tile kinds, positions, and movement directions
//! - [`context`] -- Agent profiles, vision snapshots, and planning contexts
//! - [`plan`] -- Structured plan payloads returned by the oracle

pub mod context;
pub mod grid;
pub mod plan;

// Re-export all public types at crate root for convenience.
pub use context::{
    AgentProfile, DailyContext, StepContext, VisibleAgent, VisibleEntities, VisibleTile,
};
pub use grid::{Direction, Position, TileKind};
pub use plan::{DailyPlan, MicroPlan};
