//! Generation agents.
//!
//! - [`generator`] - The [`Generator`] capability and its LLM-backed implementation

pub mod generator;

#[cfg(test)]
pub(crate) mod testing;

pub use generator::{Generator, LlmGenerator};
