//! Error types for the engine binary.

/// Top-level error for the engine binary.
///
/// Each variant wraps a subsystem error so `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: hamlet_core::config::ConfigError,
    },

    /// Town map construction failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: hamlet_world::WorldError,
    },

    /// Clock or roster setup failed.
    #[error("simulation error: {source}")]
    Simulation {
        /// The underlying simulation error.
        #[from]
        source: hamlet_core::simulation::SimulationError,
    },

    /// The planning oracle could not be built.
    #[error("oracle error: {source}")]
    Oracle {
        /// The underlying oracle client error.
        #[from]
        source: hamlet_oracle::OracleClientError,
    },

    /// Observer API server failed to start.
    #[error("observer error: {source}")]
    Observer {
        /// The underlying startup error.
        #[from]
        source: hamlet_observer::StartupError,
    },
}
