//! Application configuration loaded from environment variables.

use std::str::FromStr;

use crate::utilities::errors::ConfigError;

/// Default model string. The provider prefix selects the client.
pub const DEFAULT_MODEL: &str = "groq/llama3-70b-8192";

/// Default per-call generation timeout in seconds.
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 45;

/// Default session lifetime in seconds.
pub const DEFAULT_SESSION_TTL_SECS: u64 = 12 * 60 * 60;

/// Default cap on concurrently live sessions.
pub const DEFAULT_MAX_SESSIONS: usize = 1000;

/// Runtime configuration for the server and the sessions it creates.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// HTTP port.
    pub port: u16,
    /// Login username (`DEFAULT_USERNAME`).
    pub username: Option<String>,
    /// Login password (`DEFAULT_PASSWORD`).
    pub password: Option<String>,
    /// Model string, e.g. `groq/llama3-70b-8192`.
    pub model: String,
    /// Override for the provider base URL.
    pub base_url: Option<String>,
    /// Per-call generation timeout in seconds.
    pub llm_timeout_secs: u64,
    /// Optional sampling temperature.
    pub temperature: Option<f64>,
    /// Strip leading "Comment:"-style labels from generated text.
    pub strip_filler: bool,
    /// Sessions older than this many seconds are dropped.
    pub session_ttl_secs: u64,
    /// Logins beyond this many live sessions are refused.
    pub max_sessions: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            username: None,
            password: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: None,
            llm_timeout_secs: DEFAULT_LLM_TIMEOUT_SECS,
            temperature: None,
            strip_filler: false,
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }
}

impl AppConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Ok(Self {
            port: parse_var("PORT", get("PORT"))?.unwrap_or(defaults.port),
            username: get("DEFAULT_USERNAME"),
            password: get("DEFAULT_PASSWORD"),
            model: get("YAPYARD_MODEL").unwrap_or(defaults.model),
            base_url: get("GROQ_BASE_URL"),
            llm_timeout_secs: parse_var("YAPYARD_LLM_TIMEOUT_SECS", get("YAPYARD_LLM_TIMEOUT_SECS"))?
                .unwrap_or(defaults.llm_timeout_secs),
            temperature: parse_var("YAPYARD_TEMPERATURE", get("YAPYARD_TEMPERATURE"))?,
            strip_filler: parse_bool("YAPYARD_STRIP_FILLER", get("YAPYARD_STRIP_FILLER"))?
                .unwrap_or(defaults.strip_filler),
            session_ttl_secs: parse_var("YAPYARD_SESSION_TTL_SECS", get("YAPYARD_SESSION_TTL_SECS"))?
                .unwrap_or(defaults.session_ttl_secs),
            max_sessions: parse_var("YAPYARD_MAX_SESSIONS", get("YAPYARD_MAX_SESSIONS"))?
                .unwrap_or(defaults.max_sessions),
        })
    }
}

fn parse_var<T: FromStr>(key: &'static str, value: Option<String>) -> Result<Option<T>, ConfigError> {
    match value {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}

fn parse_bool(key: &'static str, value: Option<String>) -> Result<Option<bool>, ConfigError> {
    let Some(raw) = value else {
        return Ok(None);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "0" | "false" | "no" | "off" => Ok(Some(false)),
        _ => Err(ConfigError::Invalid { key, value: raw }),
    }
}
