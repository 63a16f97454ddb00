//! Agent records and roster seeding.
//!
//! An [`Agent`] carries fixed identity traits and the mutable state the
//! step orchestrator touches: position, relationship scores, the daily
//! plan with the date it was made, the previous action plan, and the last
//! committed speech.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use hamlet_types::{AgentProfile, Position};
use hamlet_world::WorldView;
use serde::Serialize;
use tracing::warn;

use crate::config::AgentSeed;

/// Lowest possible relationship score.
pub const RELATIONSHIP_MIN: i32 = -100;

/// Highest possible relationship score.
pub const RELATIONSHIP_MAX: i32 = 100;

/// Errors that can occur while building the roster.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// Two seeds share a name.
    #[error("duplicate agent name: {0}")]
    DuplicateName(String),

    /// A seed has an empty name.
    #[error("agent name must not be empty")]
    EmptyName,

    /// A seed starts outside the world.
    #[error("agent {name} starts outside the world at ({x}, {y})")]
    OutOfBounds {
        /// The offending agent.
        name: String,
        /// Starting column.
        x: i32,
        /// Starting row.
        y: i32,
    },
}

/// One villager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Agent {
    /// Unique display name.
    pub name: String,
    /// Occupation.
    pub role: String,
    /// Age in years.
    pub age: u32,
    /// Personality descriptor.
    pub personality: String,
    /// Current grid position. Always inside the world after a step.
    pub position: Position,
    /// How far the agent can see, in tiles.
    pub vision_radius: u32,
    /// The agent's plan for the current simulated day.
    pub daily_plan: String,
    /// The simulated date `daily_plan` was made for.
    pub daily_plan_date: Option<NaiveDate>,
    /// Cleaned text of the last accepted plan, or illegal-move feedback.
    pub prev_action_plan: String,
    /// The last committed utterance.
    pub speech: String,
    /// Score toward every other agent, keyed by name.
    relationships: BTreeMap<String, i32>,
}

impl Agent {
    /// Build an agent from its seed with no relationships yet.
    pub fn from_seed(seed: &AgentSeed) -> Self {
        Self {
            name: seed.name.clone(),
            role: seed.role.clone(),
            age: seed.age,
            personality: seed.personality.clone(),
            position: Position::new(seed.x, seed.y),
            vision_radius: seed.vision_radius,
            daily_plan: String::new(),
            daily_plan_date: None,
            prev_action_plan: String::new(),
            speech: String::new(),
            relationships: BTreeMap::new(),
        }
    }

    /// Snapshot of identity, traits, and position for planning contexts.
    pub fn profile(&self) -> AgentProfile {
        AgentProfile {
            name: self.name.clone(),
            role: self.role.clone(),
            age: self.age,
            personality: self.personality.clone(),
            position: self.position,
            vision_radius: self.vision_radius,
        }
    }

    /// Whether the daily plan was made for a date other than `today`.
    pub fn needs_daily_plan(&self, today: NaiveDate) -> bool {
        self.daily_plan_date != Some(today)
    }

    /// Score toward `other`, if known.
    pub fn relationship(&self, other: &str) -> Option<i32> {
        self.relationships.get(other).copied()
    }

    /// All relationship scores keyed by the other agent's name.
    pub const fn relationships(&self) -> &BTreeMap<String, i32> {
        &self.relationships
    }

    /// Add `delta` to the score toward `other`, clamped into
    /// [`RELATIONSHIP_MIN`]..=[`RELATIONSHIP_MAX`]. Returns the new score.
    pub fn adjust_relationship(&mut self, other: &str, delta: i32) -> i32 {
        let score = self.relationships.entry(other.to_owned()).or_insert(0);
        *score = score
            .saturating_add(delta)
            .clamp(RELATIONSHIP_MIN, RELATIONSHIP_MAX);
        *score
    }
}

/// Build the roster from seeds, seeding every pair of agents at score 0.
///
/// Names must be unique and non-empty and every agent must start inside
/// the world. Starting on a non-walkable tile is allowed but logged.
///
/// # Errors
///
/// Returns [`AgentError`] on duplicate or empty names, or out-of-bounds starts.
pub fn seed_population(
    seeds: &[AgentSeed],
    world: &dyn WorldView,
) -> Result<Vec<Agent>, AgentError> {
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    for seed in seeds {
        if seed.name.trim().is_empty() {
            return Err(AgentError::EmptyName);
        }
        if !seen.insert(seed.name.as_str()) {
            return Err(AgentError::DuplicateName(seed.name.clone()));
        }
        if !world.in_bounds(seed.x, seed.y) {
            return Err(AgentError::OutOfBounds {
                name: seed.name.clone(),
                x: seed.x,
                y: seed.y,
            });
        }
        if !world.is_walkable(seed.x, seed.y) {
            warn!(agent = %seed.name, x = seed.x, y = seed.y, "Agent starts on a non-walkable tile");
        }
    }

    let mut agents: Vec<Agent> = seeds.iter().map(Agent::from_seed).collect();
    let names: Vec<String> = agents.iter().map(|a| a.name.clone()).collect();
    for agent in &mut agents {
        for other in &names {
            if *other != agent.name {
                agent.relationships.insert(other.clone(), 0);
            }
        }
    }
    Ok(agents)
}
