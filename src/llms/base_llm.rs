//! Base LLM trait.
//!
//! Every chat-completion backend implements [`BaseLLM`]. The engine is
//! synchronous, so `call` is the primary entry point; providers built on an
//! async HTTP client implement `acall` and drive it from `call`.

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utilities::errors::GenerationError;

/// A single chat message: `{"role": ..., "content": ...}`.
pub type LLMMessage = HashMap<String, Value>;

/// Build a chat message.
pub fn message(role: &str, content: &str) -> LLMMessage {
    let mut msg = HashMap::new();
    msg.insert("role".to_string(), Value::String(role.to_string()));
    msg.insert("content".to_string(), Value::String(content.to_string()));
    msg
}

/// Interface for chat-completion backends.
#[async_trait]
pub trait BaseLLM: Send + Sync + fmt::Debug {
    /// Model identifier sent to the provider.
    fn model(&self) -> &str;

    /// Provider name, e.g. `"groq"`.
    fn provider(&self) -> &str;

    /// Call the model and return the completion text (blocking).
    fn call(&self, messages: Vec<LLMMessage>) -> Result<String, GenerationError>;

    /// Async version of [`BaseLLM::call`].
    async fn acall(&self, messages: Vec<LLMMessage>) -> Result<String, GenerationError> {
        let _ = messages;
        Err(GenerationError::Runtime {
            message: format!("Async call not implemented for provider '{}'", self.provider()),
        })
    }
}

/// Configuration shared by provider implementations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseLLMState {
    /// The model identifier/name.
    pub model: String,
    /// Optional temperature.
    pub temperature: Option<f64>,
    /// API key. Never serialized.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Optional base URL override.
    pub base_url: Option<String>,
    /// Provider name.
    pub provider: String,
}

impl BaseLLMState {
    /// Create state for `model` under `provider`.
    pub fn new(model: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature: None,
            api_key: None,
            base_url: None,
            provider: provider.into(),
        }
    }
}

/// Pull the assistant text out of an OpenAI-style chat completion body.
pub fn extract_completion_text(response: &Value) -> Result<String, GenerationError> {
    let content = response
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .ok_or_else(|| GenerationError::Parse {
            message: "no choices[0].message.content in response".to_string(),
        })?;

    match content {
        Value::String(text) if !text.trim().is_empty() => Ok(text.clone()),
        Value::String(_) | Value::Null => Err(GenerationError::EmptyResponse),
        other => Err(GenerationError::Parse {
            message: format!("unexpected content type: {}", other),
        }),
    }
}
