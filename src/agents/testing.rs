//! Scripted generators for tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::generator::Generator;
use crate::persona::Persona;
use crate::task::Task;
use crate::utilities::errors::GenerationError;

/// Generator driven by a closure.
pub(crate) struct FnGenerator<F> {
    f: F,
    calls: AtomicUsize,
}

impl<F> FnGenerator<F>
where
    F: Fn(&Persona, &Task) -> Result<String, GenerationError> + Send + Sync,
{
    pub(crate) fn new(f: F) -> Self {
        Self {
            f,
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<F> Generator for FnGenerator<F>
where
    F: Fn(&Persona, &Task) -> Result<String, GenerationError> + Send + Sync,
{
    fn generate(&self, persona: &Persona, task: &Task) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.f)(persona, task)
    }
}

/// Always answers with `text`.
pub(crate) fn fixed(text: &'static str) -> Arc<dyn Generator> {
    Arc::new(FnGenerator::new(move |_, _| Ok(text.to_string())))
}

/// Always fails with a timeout.
pub(crate) fn always_fail() -> Arc<dyn Generator> {
    Arc::new(FnGenerator::new(|_, _| {
        Err(GenerationError::Timeout { seconds: 45 })
    }))
}

/// Answers with `"<persona name>: <first task line>"`.
pub(crate) fn echo() -> Arc<dyn Generator> {
    Arc::new(FnGenerator::new(|persona, task| {
        let first_line = task.description.lines().next().unwrap_or_default();
        Ok(format!("{}: {}", persona.name, first_line))
    }))
}
