//! Error types for YapYard.
//!
//! Generation failures are soft: the engine logs them and collapses them into
//! placeholder text. Persona resolution failures on the reply path and auth
//! failures are hard and reach the caller.

use thiserror::Error;

/// Failure of a single call to the text generator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenerationError {
    /// No provider key was supplied for the session.
    #[error("Provider API key not set")]
    MissingApiKey,

    /// Transport-level failure (connect, TLS, body read).
    #[error("HTTP error: {message}")]
    Http { message: String },

    /// The provider answered with a non-success status.
    #[error("Provider API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The provider response could not be decoded.
    #[error("Failed to parse provider response: {message}")]
    Parse { message: String },

    /// The provider returned no text.
    #[error("Provider returned an empty completion")]
    EmptyResponse,

    /// The call exceeded the configured timeout.
    #[error("Generation timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// The blocking runtime used to drive the async client could not start.
    #[error("Runtime error: {message}")]
    Runtime { message: String },
}

/// Errors surfaced by the comment engine and the session shell.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    /// The persona asked to reply does not exist in the store.
    #[error("Persona '{name}' not found.")]
    PersonaNotFound { name: String },

    /// A custom persona definition was rejected.
    #[error("Invalid persona: {message}")]
    InvalidPersona { message: String },

    /// The session has no comment at this position.
    #[error("Comment #{index} not found")]
    CommentNotFound { index: usize },
}

/// Errors from the login gate.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// `DEFAULT_USERNAME` / `DEFAULT_PASSWORD` are not configured.
    #[error("Authentication credentials not properly configured")]
    NotConfigured,

    /// The provider key does not have the expected shape.
    #[error("Invalid API key format: must start with '{prefix}' and be at least {min_len} characters")]
    InvalidApiKey { prefix: &'static str, min_len: usize },

    /// Username or password mismatch.
    #[error("Invalid username or password")]
    InvalidCredentials,
}

/// Errors while loading configuration from the environment.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable was set but could not be parsed.
    #[error("Invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },

    /// The model string names a provider with no client.
    #[error("Provider '{provider}' not supported. Supported: groq")]
    UnsupportedProvider { provider: String },
}
