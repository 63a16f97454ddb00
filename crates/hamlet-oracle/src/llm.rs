//! Chat-completions client for `OpenAI`-compatible endpoints.
//!
//! The rendered system and user prompts go out as two chat messages; the
//! text of the first choice comes back untouched. Pulling a plan out of
//! that text is the orchestrator's job.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{BackendType, LlmBackendConfig};
use crate::error::OracleClientError;
use crate::prompt::RenderedPrompt;

/// Request body for `POST {api_url}/chat/completions`.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f64,
    max_tokens: u32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

/// The parts of a chat-completions response we read.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// HTTP client for one chat-completions endpoint.
///
/// The underlying `reqwest` client carries a request timeout equal to the
/// oracle deadline, so a call abandoned by the orchestrator does not keep
/// its connection open.
pub struct ChatBackend {
    client: reqwest::Client,
    endpoint: String,
    config: LlmBackendConfig,
}

impl ChatBackend {
    /// Build a client for the resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns [`OracleClientError::Config`] for the offline backend, which
    /// has no HTTP transport, or if the HTTP client cannot be built.
    pub fn new(
        config: &LlmBackendConfig,
        request_timeout: Duration,
    ) -> Result<Self, OracleClientError> {
        if config.backend_type != BackendType::OpenAi {
            return Err(OracleClientError::Config(
                "the offline backend has no HTTP transport".to_owned(),
            ));
        }
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| OracleClientError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.api_url),
            config: config.clone(),
        })
    }

    /// Full URL requests are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Model identifier sent with every request.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn request_body<'a>(&'a self, prompt: &'a RenderedPrompt) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        }
    }

    /// Send a prompt and return the text of the first choice.
    ///
    /// # Errors
    ///
    /// Returns [`OracleClientError::LlmBackend`] if the request fails or the
    /// endpoint answers with a non-success status,
    /// [`OracleClientError::Serde`] if the body is not a chat-completions
    /// response.
    pub async fn complete(&self, prompt: &RenderedPrompt) -> Result<String, OracleClientError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(|e| OracleClientError::LlmBackend(format!("request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| OracleClientError::LlmBackend(format!("reading body failed: {e}")))?;
        if !status.is_success() {
            return Err(OracleClientError::LlmBackend(format!(
                "{} returned {status}: {body}",
                self.endpoint
            )));
        }
        first_choice_text(&body)
    }
}

/// Text of `choices[0].message.content` in a chat-completions body.
fn first_choice_text(body: &str) -> Result<String, OracleClientError> {
    let response: ChatResponse = serde_json::from_str(body)?;
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| {
            OracleClientError::LlmBackend("response has no choices[0].message.content".to_owned())
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config(backend_type: BackendType) -> LlmBackendConfig {
        LlmBackendConfig {
            backend_type,
            api_url: "https://api.example.com/v1".to_owned(),
            api_key: "test".to_owned(),
            model: "test-model".to_owned(),
            temperature: 0.7,
            max_tokens: 256,
        }
    }

    #[test]
    fn first_choice_text_reads_content() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"{\"direction\": \"up\", \"speech\": \"Morning!\"}"}}]}"#;
        assert!(first_choice_text(body).unwrap().contains("Morning!"));
    }

    #[test]
    fn missing_choices_is_a_backend_error() {
        let result = first_choice_text(r#"{"error": "rate_limit"}"#);
        assert!(matches!(result, Err(OracleClientError::LlmBackend(_))));

        let result = first_choice_text(r#"{"choices":[{"message":{"content":null}}]}"#);
        assert!(matches!(result, Err(OracleClientError::LlmBackend(_))));
    }

    #[test]
    fn non_json_body_is_a_serde_error() {
        let result = first_choice_text("<html>Bad Gateway</html>");
        assert!(matches!(result, Err(OracleClientError::Serde(_))));
    }

    #[test]
    fn request_body_carries_both_prompts() {
        let backend = ChatBackend::new(&config(BackendType::OpenAi), Duration::from_secs(5)).unwrap();
        let prompt = RenderedPrompt {
            system: "You are Ada.".to_owned(),
            user: "It is 06:10.".to_owned(),
        };
        let json = serde_json::to_value(backend.request_body(&prompt)).unwrap();
        assert_eq!(json["model"], "test-model");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], "You are Ada.");
        assert_eq!(json["messages"][1]["content"], "It is 06:10.");
        assert_eq!(json["response_format"]["type"], "json_object");
        assert_eq!(json["max_tokens"], 256);
    }

    #[test]
    fn endpoint_appends_chat_path() {
        let backend = ChatBackend::new(&config(BackendType::OpenAi), Duration::from_secs(5)).unwrap();
        assert_eq!(backend.endpoint(), "https://api.example.com/v1/chat/completions");
        assert_eq!(backend.model(), "test-model");
    }

    #[test]
    fn offline_has_no_transport() {
        let result = ChatBackend::new(&config(BackendType::Offline), Duration::from_secs(5));
        assert!(matches!(result, Err(OracleClientError::Config(_))));
    }
}
