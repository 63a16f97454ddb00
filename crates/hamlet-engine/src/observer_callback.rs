//! Step callback that updates the Observer API state.
//!
//! After each step the callback broadcasts the [`StepSummary`] to
//! `WebSocket` clients and refreshes the [`VillageSnapshot`].
//!
//! [`VillageSnapshot`]: hamlet_observer::VillageSnapshot

use std::sync::Arc;

use hamlet_core::runner::StepCallback;
use hamlet_core::simulation::Simulation;
use hamlet_core::step::StepSummary;
use hamlet_observer::AppState;
use tracing::debug;

/// Callback that bridges the step loop to the Observer API.
pub struct ObserverCallback {
    state: Arc<AppState>,
}

impl ObserverCallback {
    /// Create a new observer callback backed by the given app state.
    pub const fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }
}

impl StepCallback for ObserverCallback {
    fn on_step(&mut self, summary: &StepSummary, sim: &Simulation) {
        let receivers = self.state.broadcast(summary);
        debug!(step = summary.step, receivers, "Step broadcast sent");

        // try_write keeps the loop from waiting on REST readers; a skipped
        // refresh is caught up on the next step
        match self.state.snapshot.try_write() {
            Ok(mut snap) => snap.refresh(sim),
            Err(_) => debug!(step = summary.step, "Snapshot busy, refresh skipped"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use hamlet_core::config::SimulationConfig;
    use hamlet_world::WorldView;

    use super::*;

    #[tokio::test]
    async fn step_refreshes_snapshot_and_broadcasts() {
        let state = Arc::new(AppState::new());
        let mut rx = state.subscribe();
        let world: Arc<dyn WorldView> = Arc::new(hamlet_world::create_town_map().unwrap());
        let mut sim = Simulation::from_config(&SimulationConfig::default(), world).unwrap();
        sim.add_directive("Meet at the bridge.");

        let mut callback = ObserverCallback::new(Arc::clone(&state));
        let summary = StepSummary {
            step: 1,
            ..StepSummary::default()
        };
        callback.on_step(&summary, &sim);

        assert_eq!(rx.recv().await.unwrap().step, 1);
        let snap = state.snapshot.read().await;
        assert_eq!(snap.agents.len(), 8);
        assert_eq!(snap.directives.len(), 1);
        assert_eq!(snap.messages, vec!["Operator: Meet at the bridge.".to_owned()]);
    }

    #[tokio::test]
    async fn busy_snapshot_is_skipped() {
        let state = Arc::new(AppState::new());
        let world: Arc<dyn WorldView> = Arc::new(hamlet_world::create_town_map().unwrap());
        let sim = Simulation::from_config(&SimulationConfig::default(), world).unwrap();

        let mut callback = ObserverCallback::new(Arc::clone(&state));
        let guard = state.snapshot.read().await;
        callback.on_step(&StepSummary::default(), &sim);
        assert!(guard.agents.is_empty());
    }
}
