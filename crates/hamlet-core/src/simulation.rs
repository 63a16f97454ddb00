//! The simulation context owned by the caller.
//!
//! There is no process-wide state: the clock, world, roster, directives,
//! and message log all live in one [`Simulation`] value that the step
//! orchestrator borrows mutably for the duration of a step.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use hamlet_world::WorldView;

use crate::agent::{self, Agent, AgentError};
use crate::clock::{ClockError, SimClock};
use crate::config::{PlanningConfig, SimulationConfig};
use crate::directive::DirectiveQueue;
use crate::message_log::MessageLog;

/// Errors that can occur while building a simulation.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    /// The clock could not be built.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },

    /// The roster could not be built.
    #[error("agent error: {source}")]
    Agent {
        /// The underlying agent error.
        #[from]
        source: AgentError,
    },
}

/// Per-step planning knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepSettings {
    /// Deadline for a single oracle call.
    pub oracle_timeout: Duration,
    /// Upper bound on concurrent oracle calls; zero means unbounded.
    pub max_concurrent_plans: usize,
    /// Relationship change per distinct agent mentioned in speech.
    pub mention_delta: i32,
}

impl StepSettings {
    /// Build settings from the `planning` configuration section.
    pub const fn from_config(config: &PlanningConfig) -> Self {
        Self {
            oracle_timeout: Duration::from_millis(config.oracle_timeout_ms),
            max_concurrent_plans: config.max_concurrent_plans,
            mention_delta: config.mention_delta,
        }
    }
}

impl Default for StepSettings {
    fn default() -> Self {
        Self::from_config(&PlanningConfig::default())
    }
}

/// Everything a step reads and writes.
pub struct Simulation {
    /// The simulated clock.
    pub clock: SimClock,
    /// Read-only world grid, shared with planning tasks.
    pub world: Arc<dyn WorldView>,
    /// The roster, in the fixed order results are applied.
    pub agents: Vec<Agent>,
    /// Active operator directives.
    pub directives: DirectiveQueue,
    /// Recent speech and operator events.
    pub message_log: MessageLog,
    /// Planning knobs.
    pub settings: StepSettings,
    /// Number of steps completed so far.
    step_count: u64,
}

impl Simulation {
    /// Assemble a simulation from already-built parts.
    pub fn new(
        clock: SimClock,
        world: Arc<dyn WorldView>,
        agents: Vec<Agent>,
        settings: StepSettings,
        message_log_capacity: usize,
    ) -> Self {
        Self {
            clock,
            world,
            agents,
            directives: DirectiveQueue::new(),
            message_log: MessageLog::new(message_log_capacity),
            settings,
            step_count: 0,
        }
    }

    /// Build a simulation from configuration over the given world.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError`] if the clock or roster is invalid.
    pub fn from_config(
        config: &SimulationConfig,
        world: Arc<dyn WorldView>,
    ) -> Result<Self, SimulationError> {
        let clock = SimClock::from_config(&config.time)?;
        let agents = agent::seed_population(&config.agents, world.as_ref())?;
        Ok(Self::new(
            clock,
            world,
            agents,
            StepSettings::from_config(&config.planning),
            config.message_log.capacity,
        ))
    }

    /// Look up an agent by name.
    pub fn agent(&self, name: &str) -> Option<&Agent> {
        self.agents.iter().find(|a| a.name == name)
    }

    /// Queue an operator directive. Returns whether it was accepted.
    pub fn add_directive(&mut self, text: &str) -> bool {
        self.directives.add(text, &mut self.message_log)
    }

    /// Number of steps completed so far.
    pub const fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Count one more completed step and return the new count.
    pub(crate) const fn bump_step(&mut self) -> u64 {
        self.step_count = self.step_count.saturating_add(1);
        self.step_count
    }
}

impl fmt::Debug for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("clock", &self.clock)
            .field("world", &format_args!("{}x{}", self.world.width(), self.world.height()))
            .field("agents", &self.agents.len())
            .field("directives", &self.directives.len())
            .field("step_count", &self.step_count)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use hamlet_world::create_town_map;

    use super::*;

    #[test]
    fn from_config_builds_default_village() {
        let world: Arc<dyn WorldView> = Arc::new(create_town_map().unwrap());
        let sim = Simulation::from_config(&SimulationConfig::default(), world).unwrap();
        assert_eq!(sim.agents.len(), 8);
        assert_eq!(sim.step_count(), 0);
        assert_eq!(sim.message_log.capacity(), 20);
        assert_eq!(sim.settings.mention_delta, 5);
        assert!(sim.agent("Ada").is_some());
        assert!(sim.agent("Nobody").is_none());
    }

    #[test]
    fn directive_goes_to_queue_and_log() {
        let world: Arc<dyn WorldView> = Arc::new(create_town_map().unwrap());
        let mut sim = Simulation::from_config(&SimulationConfig::default(), world).unwrap();
        assert!(sim.add_directive("Meet at the beach"));
        assert_eq!(sim.directives.len(), 1);
        assert_eq!(sim.message_log.lines(), vec!["Operator: Meet at the beach"]);
    }
}
