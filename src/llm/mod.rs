//! Model configuration and provider routing.
//!
//! [`LLM`] holds what a session knows about its model: the `provider/model`
//! string, the provider key issued at login, and call parameters. It turns
//! into a concrete [`BaseLLM`] with [`LLM::build`].

use serde::{Deserialize, Serialize};

use crate::llms::base_llm::BaseLLM;
use crate::llms::providers::groq::{GroqCompletion, GROQ_DEFAULT_TIMEOUT_SECS};
use crate::utilities::errors::ConfigError;

/// Providers this crate has a client for.
pub const SUPPORTED_PROVIDERS: &[&str] = &["groq"];

/// Model configuration for one session.
#[derive(Clone, Serialize, Deserialize)]
pub struct LLM {
    /// Model identifier, optionally provider-prefixed (e.g. "groq/llama3-70b-8192").
    pub model: String,
    /// API key for authentication.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Base URL override for the API endpoint.
    pub base_url: Option<String>,
    /// Timeout for API calls in seconds.
    pub timeout: u64,
    /// Temperature parameter for generation.
    pub temperature: Option<f64>,
}

impl std::fmt::Debug for LLM {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LLM")
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl LLM {
    /// Create a new LLM with a model identifier.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            api_key: None,
            base_url: None,
            timeout: GROQ_DEFAULT_TIMEOUT_SECS,
            temperature: None,
        }
    }

    /// Set the API key. Surrounding whitespace is stripped.
    pub fn api_key(mut self, api_key: impl AsRef<str>) -> Self {
        self.api_key = Some(api_key.as_ref().trim().to_string());
        self
    }

    /// Set the base URL.
    pub fn base_url(mut self, base_url: Option<String>) -> Self {
        self.base_url = base_url;
        self
    }

    /// Set the timeout in seconds.
    pub fn timeout(mut self, timeout: u64) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the temperature.
    pub fn temperature(mut self, temperature: Option<f64>) -> Self {
        self.temperature = temperature;
        self
    }

    /// Split the model string into `(provider, model)`. Bare model names
    /// default to Groq.
    pub fn provider_and_model(&self) -> (String, &str) {
        match self.model.split_once('/') {
            Some((provider, model)) => (provider.to_lowercase(), model),
            None => ("groq".to_string(), self.model.as_str()),
        }
    }

    /// Build the provider client for this configuration.
    pub fn build(&self) -> Result<Box<dyn BaseLLM>, ConfigError> {
        let (provider, model) = self.provider_and_model();
        log::debug!("Creating LLM instance: provider={}, model={}", provider, model);

        match provider.as_str() {
            "groq" => Ok(Box::new(
                GroqCompletion::new(model, self.api_key.clone(), self.base_url.clone())
                    .timeout_secs(self.timeout)
                    .temperature(self.temperature),
            )),
            other => Err(ConfigError::UnsupportedProvider {
                provider: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for LLM {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LLM(model={})", self.model)
    }
}
