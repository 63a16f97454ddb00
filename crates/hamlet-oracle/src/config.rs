//! Resolved oracle client configuration.
//!
//! Built from the `llm` section of `hamlet-config.yaml`. The API key is
//! never stored in the file; it is read from the environment variable the
//! section names.

use hamlet_core::config::LlmConfig;

use crate::error::OracleClientError;

/// Supported oracle backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    /// `OpenAI`-compatible chat completions API.
    OpenAi,
    /// Local seeded random walk, no network.
    Offline,
}

impl BackendType {
    /// Parse a backend name. Matching is case-insensitive.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "openai" | "openai-compatible" => Some(Self::OpenAi),
            "offline" => Some(Self::Offline),
            _ => None,
        }
    }
}

/// Configuration for a single LLM backend.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmBackendConfig {
    /// The backend type.
    pub backend_type: BackendType,
    /// Base API URL (e.g. `https://api.openai.com/v1`).
    pub api_url: String,
    /// API key for authentication. Empty for the offline backend.
    pub api_key: String,
    /// Model identifier.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Completion token cap.
    pub max_tokens: u32,
}

impl LlmBackendConfig {
    /// Resolve the `llm` section, reading the API key from the
    /// environment variable named by `api_key_env`.
    ///
    /// # Errors
    ///
    /// Returns [`OracleClientError::Config`] for an unknown backend name,
    /// or a missing API key for a network backend.
    pub fn from_llm_config(config: &LlmConfig) -> Result<Self, OracleClientError> {
        let api_key = std::env::var(&config.api_key_env).unwrap_or_default();
        Self::resolve(config, api_key)
    }

    /// Resolve the `llm` section with an explicit API key.
    ///
    /// # Errors
    ///
    /// See [`from_llm_config`](Self::from_llm_config).
    pub fn resolve(config: &LlmConfig, api_key: String) -> Result<Self, OracleClientError> {
        let backend_type = BackendType::parse(&config.backend).ok_or_else(|| {
            OracleClientError::Config(format!("unknown llm backend {:?}", config.backend))
        })?;
        if backend_type != BackendType::Offline && api_key.trim().is_empty() {
            return Err(OracleClientError::Config(format!(
                "{} is not set",
                config.api_key_env
            )));
        }
        Ok(Self {
            backend_type,
            api_url: config.api_url.trim_end_matches('/').to_owned(),
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }
}
