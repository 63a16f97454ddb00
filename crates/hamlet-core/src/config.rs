//! Configuration loading and typed config structures for the Hamlet simulation.
//!
//! The canonical configuration lives in `hamlet-config.yaml` at the project
//! root. Every section and field has a default, so an empty file (or no
//! file at all) yields a runnable simulation of the starting town.

use std::path::Path;

use serde::Deserialize;
use tracing::warn;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is unusable.
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `hamlet-config.yaml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// World-level settings (name, seed).
    #[serde(default)]
    pub world: WorldConfig,

    /// Simulated clock settings.
    #[serde(default)]
    pub time: TimeConfig,

    /// Planning fan-out and social propagation settings.
    #[serde(default)]
    pub planning: PlanningConfig,

    /// Message log settings.
    #[serde(default)]
    pub message_log: MessageLogConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Planning oracle backend configuration.
    #[serde(default)]
    pub llm: LlmConfig,

    /// Simulation boundary parameters.
    #[serde(default)]
    pub simulation: SimulationBoundsConfig,

    /// Operator control configuration.
    #[serde(default)]
    pub operator: OperatorConfig,

    /// Observer API server configuration.
    #[serde(default)]
    pub observer: ObserverConfig,

    /// Seed roster.
    #[serde(default = "default_agents")]
    pub agents: Vec<AgentSeed>,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `HAMLET_LLM_BACKEND` overrides `llm.backend`
    /// - `HAMLET_LLM_API_URL` overrides `llm.api_url`
    /// - `HAMLET_LLM_MODEL` overrides `llm.model`
    /// - `HAMLET_OBSERVER_PORT` overrides `observer.port`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, then apply env overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config = Self::parse_without_env(yaml)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string, ignoring the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse_without_env(yaml: &str) -> Result<Self, ConfigError> {
        // serde_yml maps an empty document to unit, not to an empty mapping.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that parse but would stall every step.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.planning.oracle_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "planning.oracle_timeout_ms",
                reason: "must be greater than zero",
            });
        }
        Ok(())
    }

    /// Override selected values with environment variables when set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("HAMLET_LLM_BACKEND") {
            self.llm.backend = val;
        }
        if let Ok(val) = std::env::var("HAMLET_LLM_API_URL") {
            self.llm.api_url = val;
        }
        if let Ok(val) = std::env::var("HAMLET_LLM_MODEL") {
            self.llm.model = val;
        }
        if let Ok(val) = std::env::var("HAMLET_OBSERVER_PORT") {
            match val.parse::<u16>() {
                Ok(port) => self.observer.port = port,
                Err(e) => warn!(value = %val, error = %e, "Ignoring invalid HAMLET_OBSERVER_PORT"),
            }
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            time: TimeConfig::default(),
            planning: PlanningConfig::default(),
            message_log: MessageLogConfig::default(),
            logging: LoggingConfig::default(),
            llm: LlmConfig::default(),
            simulation: SimulationBoundsConfig::default(),
            operator: OperatorConfig::default(),
            observer: ObserverConfig::default(),
            agents: default_agents(),
        }
    }
}

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Human-readable simulation name.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Random seed for reproducible offline runs.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            seed: default_seed(),
        }
    }
}

/// Simulated clock configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TimeConfig {
    /// Start timestamp `YYYY-MM-DD HH:MM`; empty means today at 06:00.
    #[serde(default)]
    pub start: String,

    /// Simulated minutes per step.
    #[serde(default = "default_step_minutes")]
    pub step_minutes: u32,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            start: String::new(),
            step_minutes: default_step_minutes(),
        }
    }
}

/// Planning fan-out and social propagation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlanningConfig {
    /// Deadline for a single oracle call in milliseconds.
    #[serde(default = "default_oracle_timeout_ms")]
    pub oracle_timeout_ms: u64,

    /// Upper bound on concurrent oracle calls (0 = one per pending agent).
    #[serde(default)]
    pub max_concurrent_plans: usize,

    /// Relationship change applied per distinct agent mentioned in speech.
    #[serde(default = "default_mention_delta")]
    pub mention_delta: i32,
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            oracle_timeout_ms: default_oracle_timeout_ms(),
            max_concurrent_plans: 0,
            mention_delta: default_mention_delta(),
        }
    }
}

/// Message log configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MessageLogConfig {
    /// Number of most recent entries kept.
    #[serde(default = "default_message_log_capacity")]
    pub capacity: usize,
}

impl Default for MessageLogConfig {
    fn default() -> Self {
        Self {
            capacity: default_message_log_capacity(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON log lines instead of human-readable text.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Planning oracle backend configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LlmConfig {
    /// Backend name: `openai` or `offline`.
    #[serde(default = "default_llm_backend")]
    pub backend: String,

    /// Base API URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,

    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Directory with prompt templates (empty = built-in templates).
    #[serde(default)]
    pub templates_dir: String,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Completion token cap.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            backend: default_llm_backend(),
            api_url: default_api_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            templates_dir: String::new(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

/// Simulation boundary configuration.
///
/// A value of 0 for either field means unlimited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SimulationBoundsConfig {
    /// Maximum number of steps before the simulation ends.
    #[serde(default)]
    pub max_steps: u64,

    /// Maximum wall-clock seconds before the simulation ends.
    #[serde(default)]
    pub max_real_time_seconds: u64,
}

/// Operator control configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OperatorConfig {
    /// Real-time milliseconds slept between steps.
    #[serde(default = "default_step_interval_ms")]
    pub step_interval_ms: u64,
}

impl Default for OperatorConfig {
    fn default() -> Self {
        Self {
            step_interval_ms: default_step_interval_ms(),
        }
    }
}

/// Observer API server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ObserverConfig {
    /// Whether the observer server is started.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Bind address.
    #[serde(default = "default_observer_host")]
    pub host: String,

    /// TCP port.
    #[serde(default = "default_observer_port")]
    pub port: u16,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: default_observer_host(),
            port: default_observer_port(),
        }
    }
}

/// One villager in the seed roster.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AgentSeed {
    /// Unique display name.
    pub name: String,
    /// Occupation.
    pub role: String,
    /// Age in years.
    pub age: u32,
    /// Personality descriptor.
    pub personality: String,
    /// Starting column.
    pub x: i32,
    /// Starting row.
    pub y: i32,
    /// Vision radius in tiles.
    #[serde(default = "default_vision_radius")]
    pub vision_radius: u32,
}

impl AgentSeed {
    /// Build a seed with the default vision radius.
    pub fn new(name: &str, role: &str, age: u32, personality: &str, x: i32, y: i32) -> Self {
        Self {
            name: name.to_owned(),
            role: role.to_owned(),
            age,
            personality: personality.to_owned(),
            x,
            y,
            vision_radius: default_vision_radius(),
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

fn default_world_name() -> String {
    String::from("Hamlet")
}

const fn default_seed() -> u64 {
    42
}

const fn default_step_minutes() -> u32 {
    10
}

const fn default_oracle_timeout_ms() -> u64 {
    30_000
}

const fn default_mention_delta() -> i32 {
    5
}

const fn default_message_log_capacity() -> usize {
    20
}

fn default_log_level() -> String {
    String::from("info")
}

fn default_llm_backend() -> String {
    String::from("openai")
}

fn default_api_url() -> String {
    String::from("https://api.openai.com/v1")
}

fn default_model() -> String {
    String::from("gpt-4o")
}

fn default_api_key_env() -> String {
    String::from("OPENAI_API_KEY")
}

const fn default_temperature() -> f64 {
    0.7
}

const fn default_max_tokens() -> u32 {
    512
}

const fn default_step_interval_ms() -> u64 {
    1000
}

const fn default_true() -> bool {
    true
}

fn default_observer_host() -> String {
    String::from("0.0.0.0")
}

const fn default_observer_port() -> u16 {
    8080
}

const fn default_vision_radius() -> u32 {
    5
}

/// The eight villagers of the starting town, each on a walkable tile.
pub fn default_agents() -> Vec<AgentSeed> {
    vec![
        AgentSeed::new("Ada", "Farmer", 29, "Smart", 2, 2),
        AgentSeed::new("Gus", "Fisherman", 32, "Shy", 8, 2),
        AgentSeed::new("Clara", "Shop Owner", 40, "Friendly", 36, 4),
        AgentSeed::new("Otto", "Shop Owner", 4, "Persuasive", 38, 4),
        AgentSeed::new("Alan", "Farmer", 57, "Grumpy", 3, 17),
        AgentSeed::new("Olive", "Artisan", 30, "Creative", 13, 2),
        AgentSeed::new("Mavis", "Farmer", 25, "Bubbly", 9, 22),
        AgentSeed::new("Finn", "Student", 9, "Hyper", 2, 7),
    ]
}
