//! Groq native completion provider.
//!
//! Groq exposes an OpenAI-compatible Chat Completions API at
//! `https://api.groq.com/openai/v1`. This provider sends one request per
//! call with a hard timeout and no retries: a failed call is reported once
//! and the engine decides how to degrade.
//!
//! The key always comes from the caller. There is no environment fallback,
//! so a session only ever uses the key it logged in with.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::llms::base_llm::{extract_completion_text, BaseLLM, BaseLLMState, LLMMessage};
use crate::utilities::errors::GenerationError;

/// Default Groq API base URL.
pub const GROQ_DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Default request timeout in seconds.
pub const GROQ_DEFAULT_TIMEOUT_SECS: u64 = 45;

/// Groq chat completion client.
///
/// `call` builds a private current-thread runtime, so it must run on a
/// thread that is not already driving a tokio runtime (use
/// `tokio::task::spawn_blocking` from async code).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroqCompletion {
    /// Shared base LLM state.
    #[serde(flatten)]
    pub state: BaseLLMState,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Maximum tokens in the response.
    pub max_tokens: Option<u32>,
}

impl GroqCompletion {
    /// Create a new Groq provider.
    ///
    /// # Arguments
    ///
    /// * `model` - Groq model name (e.g., "llama3-70b-8192").
    /// * `api_key` - API key; calls fail with `MissingApiKey` without one.
    /// * `base_url` - Optional custom base URL.
    pub fn new(model: impl Into<String>, api_key: Option<String>, base_url: Option<String>) -> Self {
        let mut state = BaseLLMState::new(model, "groq");
        state.api_key = api_key;
        state.base_url = base_url;

        Self {
            state,
            timeout_secs: GROQ_DEFAULT_TIMEOUT_SECS,
            max_tokens: None,
        }
    }

    /// Set the request timeout.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the sampling temperature.
    pub fn temperature(mut self, temperature: Option<f64>) -> Self {
        self.state.temperature = temperature;
        self
    }

    /// Get the API base URL.
    pub fn api_base_url(&self) -> String {
        self.state
            .base_url
            .clone()
            .unwrap_or_else(|| GROQ_DEFAULT_BASE_URL.to_string())
    }

    /// Build the Chat Completions request body.
    pub fn build_request_body(&self, messages: &[LLMMessage]) -> Value {
        let mut body = serde_json::json!({
            "model": self.state.model,
            "messages": messages,
        });
        if let Some(temp) = self.state.temperature {
            body["temperature"] = serde_json::json!(temp);
        }
        if let Some(max_tokens) = self.max_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }
        body
    }

    fn transport_error(&self, err: reqwest::Error) -> GenerationError {
        if err.is_timeout() {
            GenerationError::Timeout {
                seconds: self.timeout_secs,
            }
        } else {
            GenerationError::Http {
                message: err.to_string(),
            }
        }
    }
}

#[async_trait]
impl BaseLLM for GroqCompletion {
    fn model(&self) -> &str {
        &self.state.model
    }

    fn provider(&self) -> &str {
        &self.state.provider
    }

    fn call(&self, messages: Vec<LLMMessage>) -> Result<String, GenerationError> {
        log::debug!(
            "GroqCompletion.call: model={}, messages={}",
            self.state.model,
            messages.len()
        );
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| GenerationError::Runtime {
                message: e.to_string(),
            })?;
        rt.block_on(self.acall(messages))
    }

    async fn acall(&self, messages: Vec<LLMMessage>) -> Result<String, GenerationError> {
        let api_key = self
            .state
            .api_key
            .as_deref()
            .ok_or(GenerationError::MissingApiKey)?;

        let endpoint = format!("{}/chat/completions", self.api_base_url());
        let body = self.build_request_body(&messages);

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .build()
            .map_err(|e| self.transport_error(e))?;

        let response = client
            .post(&endpoint)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let response_text = response.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            return Err(GenerationError::Api {
                status: status.as_u16(),
                body: response_text.chars().take(500).collect(),
            });
        }

        let response_json: Value =
            serde_json::from_str(&response_text).map_err(|e| GenerationError::Parse {
                message: e.to_string(),
            })?;

        if let Some(usage) = response_json.get("usage") {
            log::debug!(
                "Groq token usage: prompt={}, completion={}, total={}",
                usage.get("prompt_tokens").and_then(|v| v.as_i64()).unwrap_or(0),
                usage.get("completion_tokens").and_then(|v| v.as_i64()).unwrap_or(0),
                usage.get("total_tokens").and_then(|v| v.as_i64()).unwrap_or(0),
            );
        }

        extract_completion_text(&response_json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llms::base_llm::message;

    #[test]
    fn test_new_defaults() {
        let provider = GroqCompletion::new("llama3-70b-8192", Some("gsk_test".into()), None);
        assert_eq!(provider.model(), "llama3-70b-8192");
        assert_eq!(provider.provider(), "groq");
        assert_eq!(provider.api_base_url(), GROQ_DEFAULT_BASE_URL);
        assert_eq!(provider.timeout_secs, GROQ_DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_custom_base_url() {
        let provider = GroqCompletion::new(
            "m",
            Some("k".into()),
            Some("http://localhost:9999/v1".into()),
        );
        assert_eq!(provider.api_base_url(), "http://localhost:9999/v1");
    }

    #[test]
    fn test_build_request_body() {
        let provider = GroqCompletion::new("m", Some("k".into()), None).temperature(Some(0.8));
        let body = provider.build_request_body(&[message("user", "hello")]);
        assert_eq!(body["model"], "m");
        assert_eq!(body["messages"][0]["content"], "hello");
        assert_eq!(body["temperature"], 0.8);
        assert!(body.get("max_tokens").is_none());
    }

    #[test]
    fn test_missing_key_fails_without_network() {
        let provider = GroqCompletion::new("m", None, None);
        assert!(provider.state.api_key.is_none());
        let result = provider.call(vec![message("user", "hi")]);
        assert_eq!(result, Err(GenerationError::MissingApiKey));
    }

    #[test]
    fn test_unreachable_endpoint_is_an_error() {
        let provider = GroqCompletion::new(
            "m",
            Some("gsk_test".into()),
            Some("http://127.0.0.1:9/v1".into()),
        )
        .timeout_secs(2);
        let result = provider.call(vec![message("user", "hi")]);
        assert!(matches!(
            result,
            Err(GenerationError::Http { .. }) | Err(GenerationError::Timeout { .. })
        ));
    }
}
