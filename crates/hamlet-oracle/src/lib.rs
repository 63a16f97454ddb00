//! Planning oracle clients for the Hamlet simulation.
//!
//! Implements [`hamlet_core::oracle::PlanningOracle`] on top of remote LLM
//! backends and a local offline backend. Each call renders a prompt from
//! the agent's context, sends it to the configured backend, and hands the
//! raw text back to the orchestrator for parsing.
//!
//! # Modules
//!
//! - [`config`] -- Backend selection and API key resolution
//! - [`error`] -- Client error types
//! - [`llm`] -- `OpenAI`-compatible chat-completions client
//! - [`oracle`] -- Oracle implementations and the configuration factory
//! - [`prompt`] -- Prompt templates via `minijinja`

pub mod config;
pub mod error;
pub mod llm;
pub mod oracle;
pub mod prompt;

pub use config::{BackendType, LlmBackendConfig};
pub use error::OracleClientError;
pub use llm::ChatBackend;
pub use oracle::{LlmOracle, OfflineOracle, VillageOracle, create_oracle};
pub use prompt::{PromptEngine, RenderedPrompt};
