//! Operator control state for runtime simulation management.
//!
//! This module provides shared state used by the step loop and the
//! operator REST API. The operator can pause and resume, change the step
//! interval, queue directives for the villagers, and trigger a clean
//! shutdown without stopping the process.
//!
//! # Architecture
//!
//! Control flags use [`std::sync::atomic`] types so the step loop reads
//! them without locks. Queued directives sit behind an async mutex and are
//! drained once per step. The end reason is written once, when the loop
//! returns.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, Notify};

use crate::config::SimulationBoundsConfig;

/// Smallest step interval the operator may set, in milliseconds.
pub const MIN_STEP_INTERVAL_MS: u64 = 100;

/// Reason why the simulation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimulationEndReason {
    /// Reached the configured `max_steps` limit.
    MaxStepsReached,
    /// Reached the configured `max_real_time_seconds` limit.
    MaxRealTimeReached,
    /// An operator issued a stop command.
    OperatorStop,
}

/// Shared operator control state.
///
/// Wrapped in an `Arc` and shared between the step loop and the
/// operator API handlers.
#[derive(Debug)]
pub struct OperatorState {
    /// Whether the simulation is currently paused.
    paused: AtomicBool,

    /// Notification used to wake the step loop when resumed.
    resume_notify: Notify,

    /// Whether a stop has been requested.
    stop_requested: AtomicBool,

    /// Current real-time pause between steps in milliseconds.
    step_interval_ms: AtomicU64,

    /// Wall-clock time when the simulation started.
    started_at: DateTime<Utc>,

    /// Step and wall-clock limits (0 = unlimited).
    bounds: SimulationBoundsConfig,

    /// Directives submitted by the operator, applied before the next step.
    pending_directives: Mutex<Vec<String>>,

    /// Reason the simulation ended, if it has.
    end_reason: OnceLock<SimulationEndReason>,
}

impl OperatorState {
    /// Create a new operator state from configuration.
    pub fn new(step_interval_ms: u64, bounds: &SimulationBoundsConfig) -> Self {
        Self {
            paused: AtomicBool::new(false),
            resume_notify: Notify::new(),
            stop_requested: AtomicBool::new(false),
            step_interval_ms: AtomicU64::new(step_interval_ms),
            started_at: Utc::now(),
            bounds: bounds.clone(),
            pending_directives: Mutex::new(Vec::new()),
            end_reason: OnceLock::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Pause / Resume
    // -----------------------------------------------------------------------

    /// Check whether the simulation is paused.
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// Pause the simulation. The step loop sleeps until resumed.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::Release);
    }

    /// Resume the simulation and wake the step loop.
    pub fn resume(&self) {
        self.paused.store(false, Ordering::Release);
        self.resume_notify.notify_one();
    }

    /// Wait until the simulation is no longer paused.
    ///
    /// Returns immediately if not paused. A stop request also ends the
    /// wait so that a paused simulation can still be shut down.
    pub async fn wait_if_paused(&self) {
        while self.is_paused() && !self.is_stop_requested() {
            self.resume_notify.notified().await;
        }
    }

    // -----------------------------------------------------------------------
    // Stop
    // -----------------------------------------------------------------------

    /// Request a clean simulation stop.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
        self.resume_notify.notify_one();
    }

    /// Check whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    /// Record the reason the simulation ended. Only the first reason is
    /// kept; returns `false` if one was already recorded.
    pub fn record_end(&self, reason: SimulationEndReason) -> bool {
        self.end_reason.set(reason).is_ok()
    }

    /// Get the reason the simulation ended, if it has.
    pub fn end_reason(&self) -> Option<SimulationEndReason> {
        self.end_reason.get().copied()
    }

    // -----------------------------------------------------------------------
    // Step Speed
    // -----------------------------------------------------------------------

    /// Get the current step interval in milliseconds.
    pub fn step_interval_ms(&self) -> u64 {
        self.step_interval_ms.load(Ordering::Acquire)
    }

    /// Set the step interval in milliseconds. Must be at least
    /// [`MIN_STEP_INTERVAL_MS`].
    ///
    /// Returns the previous interval on success, or `None` if the value
    /// was rejected.
    pub fn set_step_interval_ms(&self, ms: u64) -> Option<u64> {
        if ms < MIN_STEP_INTERVAL_MS {
            return None;
        }
        Some(self.step_interval_ms.swap(ms, Ordering::AcqRel))
    }

    // -----------------------------------------------------------------------
    // Boundaries
    // -----------------------------------------------------------------------

    /// Whether `max_steps > 0` and `current_step >= max_steps`.
    pub const fn step_limit_reached(&self, current_step: u64) -> bool {
        self.bounds.max_steps > 0 && current_step >= self.bounds.max_steps
    }

    /// Whether `max_real_time_seconds > 0` and that many wall-clock
    /// seconds have passed since start.
    pub fn time_limit_reached(&self) -> bool {
        let limit = self.bounds.max_real_time_seconds;
        limit > 0 && self.elapsed_seconds() >= limit
    }

    /// Return the wall-clock start time.
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Return elapsed seconds since simulation start.
    pub fn elapsed_seconds(&self) -> u64 {
        let elapsed = Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds();
        u64::try_from(elapsed.max(0)).unwrap_or(u64::MAX)
    }

    /// Get the configured max steps.
    pub const fn max_steps(&self) -> u64 {
        self.bounds.max_steps
    }

    /// Get the configured max real-time seconds.
    pub const fn max_real_time_seconds(&self) -> u64 {
        self.bounds.max_real_time_seconds
    }

    // -----------------------------------------------------------------------
    // Directives
    // -----------------------------------------------------------------------

    /// Queue a directive for the next step. Blank text is rejected.
    pub async fn submit_directive(&self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        self.pending_directives.lock().await.push(text.to_owned());
        true
    }

    /// Drain all queued directives.
    pub async fn drain_directives(&self) -> Vec<String> {
        let mut queue = self.pending_directives.lock().await;
        std::mem::take(&mut *queue)
    }

    /// Number of directives waiting for the next step.
    pub async fn pending_directive_count(&self) -> usize {
        self.pending_directives.lock().await.len()
    }

    // -----------------------------------------------------------------------
    // Status
    // -----------------------------------------------------------------------

    /// Combine the control state with the village's step, simulated time,
    /// and population into one status record.
    pub async fn status(
        &self,
        step: u64,
        sim_time: String,
        agent_count: usize,
    ) -> SimulationStatus {
        SimulationStatus {
            step,
            sim_time,
            paused: self.is_paused(),
            stop_requested: self.is_stop_requested(),
            step_interval_ms: self.step_interval_ms(),
            elapsed_seconds: self.elapsed_seconds(),
            max_steps: self.max_steps(),
            max_real_time_seconds: self.max_real_time_seconds(),
            agent_count,
            pending_directives: self.pending_directive_count().await,
            end_reason: self.end_reason(),
            started_at: self.started_at.to_rfc3339(),
        }
    }
}

/// JSON-serializable status of the simulation for the operator API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationStatus {
    /// Number of completed steps.
    pub step: u64,
    /// Current simulated timestamp, `YYYY-MM-DD HH:MM`.
    pub sim_time: String,
    /// Whether the simulation is paused.
    pub paused: bool,
    /// Whether a stop has been requested.
    pub stop_requested: bool,
    /// Current step interval in milliseconds.
    pub step_interval_ms: u64,
    /// Elapsed wall-clock seconds since start.
    pub elapsed_seconds: u64,
    /// Configured maximum steps (0 = unlimited).
    pub max_steps: u64,
    /// Configured maximum real-time seconds (0 = unlimited).
    pub max_real_time_seconds: u64,
    /// Number of agents in the village.
    pub agent_count: usize,
    /// Operator directives queued for the next step.
    pub pending_directives: usize,
    /// The reason the simulation ended, if applicable.
    pub end_reason: Option<SimulationEndReason>,
    /// RFC 3339 timestamp of when the simulation started.
    pub started_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(max_steps: u64) -> SimulationBoundsConfig {
        SimulationBoundsConfig {
            max_steps,
            max_real_time_seconds: 0,
        }
    }

    #[test]
    fn initial_state_is_running() {
        let state = OperatorState::new(1000, &bounds(0));
        assert!(!state.is_paused());
        assert!(!state.is_stop_requested());
    }

    #[test]
    fn pause_and_resume() {
        let state = OperatorState::new(1000, &bounds(0));
        state.pause();
        assert!(state.is_paused());
        state.resume();
        assert!(!state.is_paused());
    }

    #[test]
    fn set_step_interval() {
        let state = OperatorState::new(1000, &bounds(0));
        assert_eq!(state.set_step_interval_ms(2000), Some(1000));
        assert_eq!(state.step_interval_ms(), 2000);
    }

    #[test]
    fn reject_sub_100ms_interval() {
        let state = OperatorState::new(1000, &bounds(0));
        assert!(state.set_step_interval_ms(50).is_none());
        assert_eq!(state.step_interval_ms(), 1000);
    }

    #[test]
    fn step_limit() {
        assert!(!OperatorState::new(0, &bounds(0)).step_limit_reached(999_999));
        let state = OperatorState::new(0, &bounds(3));
        assert!(!state.step_limit_reached(2));
        assert!(state.step_limit_reached(3));
    }

    #[test]
    fn time_limit_zero_means_unlimited() {
        assert!(!OperatorState::new(0, &bounds(0)).time_limit_reached());
    }

    #[tokio::test]
    async fn directives_are_drained_once() {
        let state = OperatorState::new(0, &bounds(0));
        assert!(state.submit_directive(" Go to the beach ").await);
        assert!(!state.submit_directive("  ").await);
        assert_eq!(state.drain_directives().await, vec!["Go to the beach"]);
        assert!(state.drain_directives().await.is_empty());
    }

    #[test]
    fn first_end_reason_is_kept() {
        let state = OperatorState::new(0, &bounds(0));
        assert_eq!(state.end_reason(), None);
        assert!(state.record_end(SimulationEndReason::OperatorStop));
        assert!(!state.record_end(SimulationEndReason::MaxStepsReached));
        assert_eq!(state.end_reason(), Some(SimulationEndReason::OperatorStop));
    }

    #[tokio::test]
    async fn status_reports_queue_and_limits() {
        let state = OperatorState::new(500, &bounds(144));
        state.pause();
        assert!(state.submit_directive("Meet at the bridge").await);

        let status = state.status(12, "2024-05-01 08:00".to_owned(), 8).await;

        assert_eq!(status.step, 12);
        assert!(status.paused);
        assert_eq!(status.step_interval_ms, 500);
        assert_eq!(status.max_steps, 144);
        assert_eq!(status.agent_count, 8);
        assert_eq!(status.pending_directives, 1);
        assert_eq!(status.end_reason, None);
    }

    #[tokio::test]
    async fn stop_wakes_paused_waiter() {
        let state = std::sync::Arc::new(OperatorState::new(0, &bounds(0)));
        state.pause();
        let waiter = {
            let state = std::sync::Arc::clone(&state);
            tokio::spawn(async move { state.wait_if_paused().await })
        };
        tokio::task::yield_now().await;
        state.request_stop();
        assert!(waiter.await.is_ok());
    }
}
