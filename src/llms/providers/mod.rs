//! LLM provider implementations.
//!
//! Each provider implements [`BaseLLM`](crate::llms::base_llm::BaseLLM) and
//! handles authentication, request formatting and error mapping for its API.
//!
//! | Provider | Module |
//! |----------|--------|
//! | Groq | [`groq`] |

pub mod groq;
