//! LLM backends.
//!
//! - [`base_llm`] - The trait every chat-completion backend implements
//! - [`providers`] - Concrete provider clients

pub mod base_llm;
pub mod providers;

pub use base_llm::{BaseLLM, BaseLLMState, LLMMessage};
