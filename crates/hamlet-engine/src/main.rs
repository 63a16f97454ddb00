//! Engine binary for the Hamlet simulation.
//!
//! Wires together configuration, the town map, the villagers, the
//! planning oracle, the observer API, and the step loop, then runs until
//! a termination condition is met.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `hamlet-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Build the town map and seed the villagers
//! 4. Create the planning oracle from the `llm` section
//! 5. Create operator state from simulation bounds
//! 6. Start the observer API
//! 7. Run the simulation loop
//! 8. Log the result and keep the observer serving until Ctrl-C

mod error;
mod observer_callback;

use std::path::Path;
use std::sync::Arc;

use hamlet_core::config::{LoggingConfig, SimulationConfig};
use hamlet_core::operator::OperatorState;
use hamlet_core::runner;
use hamlet_core::simulation::Simulation;
use hamlet_observer::{AppState, ServerConfig, WorldInfo};
use hamlet_world::WorldView;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::observer_callback::ObserverCallback;

/// Configuration file read from the working directory.
const CONFIG_PATH: &str = "hamlet-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if any initialization step fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let (config, from_file) = load_config()?;

    // 2. Initialize structured logging.
    init_logging(&config.logging);
    info!("hamlet-engine starting");
    if !from_file {
        info!(path = CONFIG_PATH, "Config file not found, using defaults");
    }
    info!(
        world_name = %config.world.name,
        seed = config.world.seed,
        step_minutes = config.time.step_minutes,
        oracle_timeout_ms = config.planning.oracle_timeout_ms,
        backend = %config.llm.backend,
        "Configuration loaded"
    );

    // 3. Build the town and seed the villagers.
    let map = hamlet_world::create_town_map().map_err(EngineError::from)?;
    let world_info = WorldInfo::from_map(&map);
    let world: Arc<dyn WorldView> = Arc::new(map);
    let mut sim = Simulation::from_config(&config, world).map_err(EngineError::from)?;
    info!(
        agents = sim.agents.len(),
        start = %sim.clock.current_time(),
        "Village initialized"
    );

    // 4. Create the planning oracle.
    let oracle = Arc::new(hamlet_oracle::create_oracle(&config).map_err(EngineError::from)?);

    // 5. Create operator state.
    let operator = Arc::new(OperatorState::new(
        config.operator.step_interval_ms,
        &config.simulation,
    ));
    info!(
        max_steps = operator.max_steps(),
        max_real_time_seconds = operator.max_real_time_seconds(),
        step_interval_ms = operator.step_interval_ms(),
        "Operator state initialized"
    );

    // 6. Start the observer API.
    let app_state = Arc::new(AppState::with_operator(Arc::clone(&operator), world_info));
    app_state.snapshot.write().await.refresh(&sim);
    let observer_handle = if config.observer.enabled {
        let server = ServerConfig::from_observer_config(&config.observer);
        let handle = hamlet_observer::spawn_observer(server, Arc::clone(&app_state))
            .map_err(EngineError::from)?;
        Some(handle)
    } else {
        info!("Observer API disabled");
        None
    };

    // Ctrl-C during the run ends it cleanly after the current step.
    let interrupt = {
        let operator = Arc::clone(&operator);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Ctrl-C received, stopping after the current step");
                operator.request_stop();
            }
        })
    };

    // 7. Run the simulation.
    let mut callback = ObserverCallback::new(app_state);
    let result = runner::run_simulation(&mut sim, &oracle, &operator, &mut callback).await;

    // 8. Log results.
    runner::log_simulation_end(&result);

    if let Some(handle) = observer_handle {
        if !interrupt.is_finished() {
            interrupt.abort();
            info!("Observer still serving the final state, press Ctrl-C to exit");
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Failed to listen for Ctrl-C");
            }
        }
        handle.abort();
    } else {
        interrupt.abort();
    }

    info!(
        end_reason = ?result.end_reason,
        total_steps = result.total_steps,
        "hamlet-engine shutdown complete"
    );

    Ok(())
}

/// Install the tracing subscriber. `RUST_LOG` wins over the configured
/// level.
fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Load `hamlet-config.yaml` from the working directory, or defaults when
/// it is absent. The flag reports whether the file was read.
fn load_config() -> Result<(SimulationConfig, bool), EngineError> {
    let config_path = Path::new(CONFIG_PATH);
    if config_path.exists() {
        Ok((SimulationConfig::from_file(config_path)?, true))
    } else {
        Ok((SimulationConfig::default(), false))
    }
}
