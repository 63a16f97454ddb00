//! Simulation loop runner with operator controls.
//!
//! This module provides [`run_simulation`], the top-level async function
//! that drives the step loop with support for:
//!
//! - **Bounded simulation**: stop after `max_steps` or `max_real_time_seconds`
//! - **Pause/resume**: operator can halt and continue the step loop
//! - **Variable speed**: step interval adjustable at runtime
//! - **Directives**: operator text is queued before the next step runs
//! - **Operator stop**: clean stop via REST API
//!
//! The runner wraps the single-step [`run_step`] function and adds the
//! control plane around it.
//!
//! [`run_step`]: crate::step::run_step

use std::sync::Arc;

use tracing::{info, warn};

use crate::operator::{OperatorState, SimulationEndReason};
use crate::oracle::PlanningOracle;
use crate::simulation::Simulation;
use crate::step::{self, StepSummary};

/// Result of the simulation run.
#[derive(Debug)]
pub struct SimulationResult {
    /// The reason the simulation ended.
    pub end_reason: SimulationEndReason,
    /// The last step summary, if any step completed.
    pub final_summary: Option<StepSummary>,
    /// Total number of steps executed by this run.
    pub total_steps: u64,
}

/// Callback invoked after each step completes.
///
/// Implementations can use this to update the observer snapshot and
/// broadcast step summaries.
pub trait StepCallback: Send {
    /// Called after a step completes.
    fn on_step(&mut self, summary: &StepSummary, sim: &Simulation);
}

/// A no-op step callback for testing.
pub struct NoOpCallback;

impl StepCallback for NoOpCallback {
    fn on_step(&mut self, _summary: &StepSummary, _sim: &Simulation) {}
}

/// Run the simulation loop until a termination condition is met.
///
/// Before each step the loop honours pause, stop, and the wall-clock
/// limit, then moves any operator directives into the simulation. After
/// each step it notifies `callback` and checks the step limit.
pub async fn run_simulation<O>(
    sim: &mut Simulation,
    oracle: &Arc<O>,
    operator: &Arc<OperatorState>,
    callback: &mut dyn StepCallback,
) -> SimulationResult
where
    O: PlanningOracle + 'static,
{
    let mut last_summary: Option<StepSummary> = None;
    let mut total_steps: u64 = 0;

    info!(
        max_steps = operator.max_steps(),
        max_real_time_seconds = operator.max_real_time_seconds(),
        step_interval_ms = operator.step_interval_ms(),
        agents = sim.agents.len(),
        "Simulation starting"
    );

    loop {
        // --- Check pause ---
        if operator.is_paused() {
            info!("Simulation paused, waiting for resume...");
            operator.wait_if_paused().await;
            info!("Simulation resumed");
        }

        // --- Check stop request (before step) ---
        if operator.is_stop_requested() {
            info!("Operator stop requested");
            return finish(operator, SimulationEndReason::OperatorStop, last_summary, total_steps);
        }

        // --- Check time limit (before step) ---
        if operator.time_limit_reached() {
            info!(
                max_seconds = operator.max_real_time_seconds(),
                elapsed = operator.elapsed_seconds(),
                "Real-time limit reached"
            );
            return finish(
                operator,
                SimulationEndReason::MaxRealTimeReached,
                last_summary,
                total_steps,
            );
        }

        // --- Apply operator directives ---
        for text in operator.drain_directives().await {
            if sim.add_directive(&text) {
                info!(directive = %text, "Directive queued");
            }
        }

        // --- Execute step ---
        let summary = step::run_step(sim, oracle).await;
        total_steps = total_steps.saturating_add(1);

        // --- Notify callback ---
        callback.on_step(&summary, sim);

        // --- Check step limit (after step) ---
        if operator.step_limit_reached(summary.step) {
            info!(step = summary.step, max_steps = operator.max_steps(), "Step limit reached");
            return finish(
                operator,
                SimulationEndReason::MaxStepsReached,
                Some(summary),
                total_steps,
            );
        }

        last_summary = Some(summary);

        // --- Sleep for step interval ---
        let interval_ms = operator.step_interval_ms();
        if interval_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(interval_ms)).await;
        }
    }
}

fn finish(
    operator: &OperatorState,
    end_reason: SimulationEndReason,
    final_summary: Option<StepSummary>,
    total_steps: u64,
) -> SimulationResult {
    operator.record_end(end_reason);
    SimulationResult {
        end_reason,
        final_summary,
        total_steps,
    }
}

/// Log the simulation end sequence.
///
/// The HTTP server should remain running after this returns.
pub fn log_simulation_end(result: &SimulationResult) {
    info!(
        reason = ?result.end_reason,
        total_steps = result.total_steps,
        final_step = result.final_summary.as_ref().map(|s| s.step),
        "Simulation ended"
    );

    if let Some(ref summary) = result.final_summary {
        info!(
            step = summary.step,
            time = %summary.time,
            date = %summary.date,
            moved = summary.moved.len(),
            utterances = summary.utterances.len(),
            "Final step summary"
        );
    } else {
        warn!("Simulation ended with no steps executed");
    }
}
