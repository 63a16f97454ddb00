//! Planning oracle trait and stub implementation.
//!
//! During a step the orchestrator presents each agent with a
//! [`StepContext`] (and, once per simulated day, a [`DailyContext`]) and
//! awaits raw text in response. The [`PlanningOracle`] trait abstracts
//! where that text comes from -- an LLM backend, a scripted source, or a
//! test stub. Responses are parsed by [`crate::parse`]; the oracle itself
//! never touches simulation state.
//!
//! Calls for different agents run concurrently, so implementations must
//! be `Send + Sync` and their futures `Send`.

use std::future::Future;

use hamlet_types::{DailyContext, StepContext};

/// Errors an oracle call can end with.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    /// The call did not finish within the per-call deadline.
    #[error("oracle call timed out (deadline: {deadline_ms}ms)")]
    Timeout {
        /// The deadline in milliseconds.
        deadline_ms: u64,
    },

    /// The backend reported a failure.
    #[error("oracle backend error: {message}")]
    Backend {
        /// Description of the failure.
        message: String,
    },

    /// The planning task panicked.
    #[error("oracle call panicked")]
    Panicked,

    /// The planning task ended without reporting a result.
    #[error("oracle call was lost before reporting a result")]
    Lost,
}

/// A source of raw plan text for agents.
pub trait PlanningOracle: Send + Sync {
    /// Produce a single-step plan for the agent described by `ctx`.
    ///
    /// The expected output is a JSON object with `direction` and `speech`
    /// (optionally wrapped in a Markdown code fence).
    fn plan_step(
        &self,
        ctx: &StepContext,
    ) -> impl Future<Output = Result<String, OracleError>> + Send;

    /// Produce a plan for the simulated day described by `ctx`.
    ///
    /// The expected output is a JSON object with a `daily_plan` string.
    fn plan_day(
        &self,
        ctx: &DailyContext,
    ) -> impl Future<Output = Result<String, OracleError>> + Send;
}

/// A stub oracle with fixed answers.
///
/// Every agent gets the same daily plan and an empty step plan, which the
/// orchestrator treats as "no movement requested".
#[derive(Debug, Clone, Default)]
pub struct StubOracle;

impl StubOracle {
    /// Create a new stub oracle.
    pub const fn new() -> Self {
        Self
    }
}

impl PlanningOracle for StubOracle {
    async fn plan_step(&self, _ctx: &StepContext) -> Result<String, OracleError> {
        Ok("{}".to_owned())
    }

    async fn plan_day(&self, ctx: &DailyContext) -> Result<String, OracleError> {
        Ok(serde_json::json!({
            "daily_plan": format!("{} goes about the day as a {}.", ctx.agent.name, ctx.agent.role)
        })
        .to_string())
    }
}
