//! Error types for the oracle client.
//!
//! Uses `thiserror` for typed errors covering configuration, prompt
//! rendering, and LLM calls. At the [`PlanningOracle`] boundary they are
//! folded into [`OracleError::Backend`].
//!
//! [`PlanningOracle`]: hamlet_core::oracle::PlanningOracle
//! [`OracleError::Backend`]: hamlet_core::oracle::OracleError::Backend

use hamlet_core::oracle::OracleError;

/// Errors that can occur inside the oracle client.
#[derive(Debug, thiserror::Error)]
pub enum OracleClientError {
    /// Failed to load or render a prompt template.
    #[error("template error: {0}")]
    Template(String),

    /// An LLM backend returned an error or was unreachable.
    #[error("LLM backend error: {0}")]
    LlmBackend(String),

    /// Configuration is invalid or missing.
    #[error("config error: {0}")]
    Config(String),

    /// A backend answered with a body that is not the expected JSON.
    #[error("malformed backend response: {0}")]
    Serde(#[from] serde_json::Error),
}

impl From<OracleClientError> for OracleError {
    fn from(err: OracleClientError) -> Self {
        Self::Backend {
            message: err.to_string(),
        }
    }
}
