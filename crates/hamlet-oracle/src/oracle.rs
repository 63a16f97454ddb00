//! [`PlanningOracle`] implementations.
//!
//! [`LlmOracle`] renders prompts and sends them to an HTTP backend.
//! [`OfflineOracle`] answers locally with a seeded random walk, for demos
//! and runs without network access. [`VillageOracle`] dispatches between
//! the two so the engine can pick one from configuration.

use std::sync::Mutex;
use std::time::Duration;

use hamlet_core::config::SimulationConfig;
use hamlet_core::oracle::{OracleError, PlanningOracle};
use hamlet_types::{DailyContext, Direction, StepContext};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::config::{BackendType, LlmBackendConfig};
use crate::error::OracleClientError;
use crate::llm::ChatBackend;
use crate::prompt::PromptEngine;

// ---------------------------------------------------------------------------
// LLM oracle
// ---------------------------------------------------------------------------

/// Oracle backed by a remote chat-completions endpoint.
pub struct LlmOracle {
    prompts: PromptEngine,
    backend: ChatBackend,
}

impl LlmOracle {
    /// Create an oracle from a prompt engine and a backend.
    pub const fn new(prompts: PromptEngine, backend: ChatBackend) -> Self {
        Self { prompts, backend }
    }

    /// Endpoint requests are sent to.
    pub fn endpoint(&self) -> &str {
        self.backend.endpoint()
    }
}

impl PlanningOracle for LlmOracle {
    async fn plan_step(&self, ctx: &StepContext) -> Result<String, OracleError> {
        let prompt = self.prompts.render_step(ctx)?;
        let raw = self.backend.complete(&prompt).await?;
        debug!(agent = %ctx.agent.name, model = self.backend.model(), "Micro plan received");
        Ok(raw)
    }

    async fn plan_day(&self, ctx: &DailyContext) -> Result<String, OracleError> {
        let prompt = self.prompts.render_daily(ctx)?;
        let raw = self.backend.complete(&prompt).await?;
        debug!(agent = %ctx.agent.name, model = self.backend.model(), "Daily plan received");
        Ok(raw)
    }
}

// ---------------------------------------------------------------------------
// Offline oracle
// ---------------------------------------------------------------------------

/// Chance in percent that an offline agent greets someone it can see.
const GREETING_CHANCE_PERCENT: u32 = 20;

/// Oracle answering without a network: random directions, occasional
/// greetings to visible neighbours, and a generic daily plan.
///
/// The random stream is seeded, so a run is reproducible as long as the
/// order of calls is.
pub struct OfflineOracle {
    rng: Mutex<StdRng>,
}

impl OfflineOracle {
    /// Create an offline oracle with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn step_reply(&self, ctx: &StepContext) -> String {
        let (direction, greet) = match self.rng.lock() {
            Ok(mut rng) => {
                let pick = rng.random_range(0..Direction::ALL.len());
                let roll = rng.random_range(0..100_u32);
                (Direction::ALL.get(pick).copied(), roll < GREETING_CHANCE_PERCENT)
            }
            Err(_) => (None, false),
        };
        let speech = match ctx.vision.agents.first() {
            Some(other) if greet => format!("Hello, {}!", other.name),
            _ => String::new(),
        };
        serde_json::json!({
            "direction": direction.map(Direction::as_str),
            "speech": speech,
        })
        .to_string()
    }
}

impl PlanningOracle for OfflineOracle {
    async fn plan_step(&self, ctx: &StepContext) -> Result<String, OracleError> {
        Ok(self.step_reply(ctx))
    }

    async fn plan_day(&self, ctx: &DailyContext) -> Result<String, OracleError> {
        Ok(serde_json::json!({
            "daily_plan": format!(
                "{} works as a {} through the morning, takes a walk around the village after lunch, and chats with neighbours in the evening.",
                ctx.agent.name, ctx.agent.role
            )
        })
        .to_string())
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// The oracle selected by configuration.
pub enum VillageOracle {
    /// Remote LLM.
    Llm(LlmOracle),
    /// Local random walk.
    Offline(OfflineOracle),
}

impl PlanningOracle for VillageOracle {
    async fn plan_step(&self, ctx: &StepContext) -> Result<String, OracleError> {
        match self {
            Self::Llm(oracle) => oracle.plan_step(ctx).await,
            Self::Offline(oracle) => oracle.plan_step(ctx).await,
        }
    }

    async fn plan_day(&self, ctx: &DailyContext) -> Result<String, OracleError> {
        match self {
            Self::Llm(oracle) => oracle.plan_day(ctx).await,
            Self::Offline(oracle) => oracle.plan_day(ctx).await,
        }
    }
}

/// Build the oracle described by the `llm` configuration section.
///
/// `world.seed` drives the offline backend; `planning.oracle_timeout_ms`
/// bounds each HTTP request of the remote one.
///
/// # Errors
///
/// Returns [`OracleClientError`] if the backend is unknown, the API key is
/// missing, or the prompt templates cannot be loaded.
pub fn create_oracle(config: &SimulationConfig) -> Result<VillageOracle, OracleClientError> {
    let resolved = LlmBackendConfig::from_llm_config(&config.llm)?;
    if resolved.backend_type == BackendType::Offline {
        let seed = config.world.seed;
        info!(seed, "Using offline planning oracle");
        return Ok(VillageOracle::Offline(OfflineOracle::new(seed)));
    }
    let prompts = PromptEngine::new(&config.llm.templates_dir)?;
    let request_timeout = Duration::from_millis(config.planning.oracle_timeout_ms);
    let backend = ChatBackend::new(&resolved, request_timeout)?;
    info!(
        endpoint = backend.endpoint(),
        model = %resolved.model,
        timeout_ms = config.planning.oracle_timeout_ms,
        "Using LLM planning oracle"
    );
    Ok(VillageOracle::Llm(LlmOracle::new(prompts, backend)))
}
