//! The text generation capability.
//!
//! A [`Generator`] takes a persona and a task and produces text, or fails.
//! The engine treats it as an opaque blocking call. [`LlmGenerator`] is the
//! production implementation: it renders the persona into a system prompt,
//! the task into a user prompt, and sends both to a [`BaseLLM`].

use crate::llms::base_llm::{message, BaseLLM};
use crate::persona::Persona;
use crate::task::Task;
use crate::utilities::errors::GenerationError;

/// Produces persona-voiced text for a task.
pub trait Generator: Send + Sync {
    /// Run `task` as `persona` and return the raw generated text.
    fn generate(&self, persona: &Persona, task: &Task) -> Result<String, GenerationError>;
}

/// Render the persona as a system prompt.
pub fn system_prompt(persona: &Persona) -> String {
    format!(
        "You are {}. {}\n{}\n\nYour personal goal is: {}",
        persona.name, persona.role, persona.backstory, persona.goal
    )
}

/// Render the task as a user prompt.
pub fn task_prompt(task: &Task) -> String {
    format!(
        "{}\n\nThis is the expected criteria for your final answer: {}\n\
         You MUST return the actual complete content as the final answer, not a summary.",
        task.description, task.expected_output
    )
}

/// Generator backed by a chat-completion model.
#[derive(Debug)]
pub struct LlmGenerator {
    llm: Box<dyn BaseLLM>,
}

impl LlmGenerator {
    /// Wrap a model client.
    pub fn new(llm: Box<dyn BaseLLM>) -> Self {
        Self { llm }
    }

    /// Model identifier of the wrapped client.
    pub fn model(&self) -> &str {
        self.llm.model()
    }
}

impl Generator for LlmGenerator {
    fn generate(&self, persona: &Persona, task: &Task) -> Result<String, GenerationError> {
        log::debug!(
            "Generating as '{}' with {}/{}",
            persona.name,
            self.llm.provider(),
            self.llm.model()
        );
        let messages = vec![
            message("system", &system_prompt(persona)),
            message("user", &task_prompt(task)),
        ];
        let text = self.llm.call(messages)?;
        Ok(text.trim().to_string())
    }
}
