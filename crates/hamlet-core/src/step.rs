//! Step cycle: the 5-phase loop that drives the Hamlet village.
//!
//! Each step runs through these phases:
//!
//! 1. **Advance Clock** -- move simulated time forward by one step.
//!
//! 2. **Refresh Daily Plans** -- every agent whose daily plan was made for
//!    another date asks the oracle for a new one. Requests run concurrently.
//!
//! 3. **Dispatch Micro Plans** -- build a [`StepContext`] for every agent
//!    from a consistent pre-step snapshot and ask the oracle for a one-step
//!    plan. Requests run concurrently, bounded by the configured limit, each
//!    under its own deadline.
//!
//! 4. **Apply Results** -- on the calling task, in roster order: parse each
//!    plan, apply legal moves or record illegal-move feedback, log speech,
//!    and update relationships from mentions.
//!
//! 5. **Age Directives** -- decrement directive time-to-live values.
//!
//! A failed, timed-out, or panicking oracle call only affects its own
//! agent, which keeps its previous state for that step.

use std::collections::BTreeMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use hamlet_types::{DailyContext, StepContext};
use hamlet_world::describe_layout;
use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::movement::{self, MoveOutcome};
use crate::oracle::{OracleError, PlanningOracle};
use crate::parse;
use crate::simulation::{Simulation, StepSettings};
use crate::social::{self, RelationshipChange};
use crate::vision;

/// One committed utterance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Utterance {
    /// Who spoke.
    pub speaker: String,
    /// What was said.
    pub text: String,
}

/// Summary of a single step's execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StepSummary {
    /// The step number that was executed, starting at 1.
    pub step: u64,
    /// Simulated time of day after the clock advanced, `HH:MM`.
    pub time: String,
    /// Simulated date after the clock advanced, `YYYY-MM-DD`.
    pub date: String,
    /// Agents whose daily plan was refreshed.
    pub daily_plans_refreshed: Vec<String>,
    /// Agents whose daily plan request failed or came back empty.
    pub daily_plans_failed: Vec<String>,
    /// Agents that made a legal move.
    pub moved: Vec<String>,
    /// Agents whose move was illegal.
    pub rejected_moves: Vec<String>,
    /// Agents whose micro plan failed, timed out, or was malformed.
    pub failed_plans: Vec<String>,
    /// Speech committed this step, in roster order.
    pub utterances: Vec<Utterance>,
    /// Relationship changes caused by mentions.
    pub relationship_changes: Vec<RelationshipChange>,
    /// Number of directives that expired at the end of the step.
    pub directives_expired: usize,
}

/// Execute one complete step of the simulation.
///
/// Never fails as a whole: oracle failures are isolated per agent and
/// reported in the summary.
pub async fn run_step<O>(sim: &mut Simulation, oracle: &Arc<O>) -> StepSummary
where
    O: PlanningOracle + 'static,
{
    // --- Phase 1: Advance Clock ---
    sim.clock.advance();
    let step = sim.bump_step();
    let mut summary = StepSummary {
        step,
        time: sim.clock.time_label(),
        date: sim.clock.date_label(),
        ..StepSummary::default()
    };
    info!(step, time = %summary.time, date = %summary.date, "Step started");

    // --- Phase 2: Refresh Daily Plans ---
    phase_refresh_daily(sim, oracle, &mut summary).await;

    // --- Phase 3: Dispatch Micro Plans ---
    let contexts = build_step_contexts(sim);
    let results = fan_out(oracle, contexts, sim.settings, |oracle, ctx| async move {
        oracle.plan_step(&ctx).await
    })
    .await;

    // --- Phase 4: Apply Results ---
    phase_apply(sim, results, &mut summary);

    // --- Phase 5: Age Directives ---
    summary.directives_expired = sim.directives.age();

    info!(
        step,
        moved = summary.moved.len(),
        rejected = summary.rejected_moves.len(),
        failed = summary.failed_plans.len(),
        utterances = summary.utterances.len(),
        "Step complete"
    );
    summary
}

/// Phase 2: Refresh Daily Plans.
///
/// Only agents whose plan date differs from today are asked. An empty,
/// failed, or missing response keeps the previous plan and its date, so the
/// agent is asked again next step.
async fn phase_refresh_daily<O>(sim: &mut Simulation, oracle: &Arc<O>, summary: &mut StepSummary)
where
    O: PlanningOracle + 'static,
{
    let today = sim.clock.today();
    let date = sim.clock.date_label();
    let layout_summary = describe_layout(sim.world.as_ref());

    let contexts: Vec<(usize, DailyContext)> = sim
        .agents
        .iter()
        .enumerate()
        .filter(|(_, agent)| agent.needs_daily_plan(today))
        .map(|(idx, agent)| {
            (
                idx,
                DailyContext {
                    date: date.clone(),
                    layout_summary: layout_summary.clone(),
                    agent: agent.profile(),
                    previous_daily_plan: agent.daily_plan.clone(),
                },
            )
        })
        .collect();
    if contexts.is_empty() {
        return;
    }
    let requested: Vec<usize> = contexts.iter().map(|(idx, _)| *idx).collect();

    let mut results = fan_out(oracle, contexts, sim.settings, |oracle, ctx| async move {
        oracle.plan_day(&ctx).await
    })
    .await;

    for idx in requested {
        let result = results.remove(&idx).unwrap_or(Err(OracleError::Lost));
        let Some(agent) = sim.agents.get_mut(idx) else {
            continue;
        };
        let outcome = result
            .map_err(|e| e.to_string())
            .and_then(|raw| parse::parse_daily_plan(&raw).map_err(|e| e.to_string()));
        match outcome {
            Ok(plan) if !plan.daily_plan.is_empty() => {
                debug!(agent = %agent.name, %date, "Daily plan refreshed");
                agent.daily_plan = plan.daily_plan;
                agent.daily_plan_date = Some(today);
                summary.daily_plans_refreshed.push(agent.name.clone());
            }
            Ok(_) => {
                warn!(agent = %agent.name, %date, "Daily plan was empty, retrying next step");
                summary.daily_plans_failed.push(agent.name.clone());
            }
            Err(error) => {
                warn!(agent = %agent.name, %date, %error, "Daily plan failed");
                summary.daily_plans_failed.push(agent.name.clone());
            }
        }
    }
}

/// Phase 3 snapshot: one context per agent, all built before any
/// dispatch so every agent sees the same pre-step world.
fn build_step_contexts(sim: &Simulation) -> Vec<(usize, StepContext)> {
    let time = sim.clock.time_label();
    let directives = sim.directives.active_texts();
    sim.agents
        .iter()
        .enumerate()
        .map(|(idx, agent)| {
            (
                idx,
                StepContext {
                    time: time.clone(),
                    agent: agent.profile(),
                    vision: vision::visible_entities(sim.world.as_ref(), &sim.agents, idx),
                    prev_action_plan: agent.prev_action_plan.clone(),
                    daily_plan: agent.daily_plan.clone(),
                    directives: directives.clone(),
                },
            )
        })
        .collect()
}

/// Phase 4: Apply Results.
///
/// Runs serially in roster order so the outcome does not depend on which
/// oracle call finished first.
fn phase_apply(
    sim: &mut Simulation,
    mut results: BTreeMap<usize, Result<String, OracleError>>,
    summary: &mut StepSummary,
) {
    let step = summary.step;
    for idx in 0..sim.agents.len() {
        let result = results.remove(&idx).unwrap_or(Err(OracleError::Lost));
        let Some(agent) = sim.agents.get_mut(idx) else {
            continue;
        };
        let name = agent.name.clone();

        let parsed = match result {
            Ok(raw) => match parse::parse_micro_plan(&raw) {
                Ok(parsed) => parsed,
                Err(error) => {
                    warn!(step, agent = %name, %error, "Malformed micro plan");
                    summary.failed_plans.push(name);
                    continue;
                }
            },
            Err(error) => {
                warn!(step, agent = %name, %error, "Micro plan failed");
                summary.failed_plans.push(name);
                continue;
            }
        };

        match movement::evaluate_move(
            sim.world.as_ref(),
            agent.position,
            parsed.plan.direction.as_deref(),
        ) {
            MoveOutcome::Moved { from, to, direction } => {
                debug!(step, agent = %name, %from, %to, %direction, "Agent moved");
                agent.position = to;
                agent.prev_action_plan = parsed.cleaned;
                agent.speech = parsed.plan.speech.unwrap_or_default();
                summary.moved.push(name.clone());
            }
            MoveOutcome::Rejected { feedback } => {
                debug!(step, agent = %name, %feedback, "Move rejected");
                agent.prev_action_plan = feedback;
                summary.rejected_moves.push(name);
                continue;
            }
        }

        let speech = agent.speech.clone();
        if speech.trim().is_empty() {
            continue;
        }
        sim.message_log.push(Some(&name), speech.as_str());
        summary.relationship_changes.extend(social::propagate_mentions(
            &mut sim.agents,
            idx,
            sim.settings.mention_delta,
        ));
        summary.utterances.push(Utterance {
            speaker: name,
            text: speech,
        });
    }
}

/// Run one oracle call per request concurrently and collect the results
/// keyed by roster index.
///
/// At most `settings.max_concurrent_plans` calls are in flight (zero
/// means all at once). Each call gets its own deadline, which starts once
/// it holds a permit. Panics inside a call are caught and reported as
/// [`OracleError::Panicked`].
async fn fan_out<O, C, F, Fut>(
    oracle: &Arc<O>,
    requests: Vec<(usize, C)>,
    settings: StepSettings,
    call: F,
) -> BTreeMap<usize, Result<String, OracleError>>
where
    O: PlanningOracle + 'static,
    C: Send + 'static,
    F: Fn(Arc<O>, C) -> Fut,
    Fut: Future<Output = Result<String, OracleError>> + Send + 'static,
{
    let mut results = BTreeMap::new();
    if requests.is_empty() {
        return results;
    }

    let permits = match settings.max_concurrent_plans {
        0 => requests.len(),
        limit => limit.min(requests.len()),
    };
    let semaphore = Arc::new(Semaphore::new(permits.max(1)));
    let timeout = settings.oracle_timeout;
    let deadline_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);

    let mut set = JoinSet::new();
    for (idx, ctx) in requests {
        let request = call(Arc::clone(oracle), ctx);
        let semaphore = Arc::clone(&semaphore);
        set.spawn(async move {
            let Ok(_permit) = semaphore.acquire_owned().await else {
                return (idx, Err(OracleError::Lost));
            };
            let guarded = AssertUnwindSafe(tokio::time::timeout(timeout, request))
                .catch_unwind()
                .await;
            let result = match guarded {
                Ok(Ok(result)) => result,
                Ok(Err(_elapsed)) => Err(OracleError::Timeout { deadline_ms }),
                Err(_panic) => Err(OracleError::Panicked),
            };
            (idx, result)
        });
    }

    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((idx, result)) => {
                results.insert(idx, result);
            }
            Err(error) => warn!(%error, "Planning task did not complete"),
        }
    }
    results
}
