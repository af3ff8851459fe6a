//! # YapYard
//!
//! A simulated social media comment section. Submit content, pick a panel
//! of personas, and get back short in-character reactions generated by an
//! LLM, with one level of back-and-forth replies and a heat rating for the
//! thread.
//!
//! The crate is laid out like an agent framework: personas are agents
//! (role, goal, backstory), each comment or reply is a [`Task`], and a
//! [`Generator`](agents::Generator) runs the task through an [`LLM`].
//! [`engine`] holds the comment logic; [`session`] and [`server`] wrap it
//! for per-user HTTP access.

pub mod agents;
pub mod auth;
pub mod engine;
pub mod llm;
pub mod llms;
pub mod persona;
pub mod server;
pub mod session;
pub mod task;
pub mod utilities;

pub use engine::{Comment, CommentEngine, Reply};
pub use llm::LLM;
pub use llms::base_llm::BaseLLM;
pub use persona::{Persona, PersonaStore};
pub use session::Session;
pub use task::Task;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
