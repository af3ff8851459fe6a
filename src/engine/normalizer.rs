//! Bounding user content before it goes into a prompt.
//!
//! Long content is summarised by a dedicated persona. If that fails for any
//! reason the content is shortened at a word boundary instead, so
//! [`ContentNormalizer::normalize`] never fails.

use std::sync::Arc;

use crate::agents::generator::Generator;
use crate::persona::Persona;
use crate::task::Task;
use crate::utilities::string_utils::{char_len, shorten};

/// Content longer than this many characters gets normalised.
pub const DEFAULT_MAX_CHARS: usize = 800;

/// Appended to content shortened by the fallback path.
pub const TRUNCATION_MARKER: &str = "... [truncated]";

/// The persona used to compress long content.
pub fn summarizer_persona() -> Persona {
    Persona::new(
        "Summarizer",
        "Condenses long content",
        "Summarize input into <=200 words while preserving key ideas",
        "Expert at summarizing long text into digestible summaries",
    )
}

/// Summarise-or-truncate normaliser.
#[derive(Clone)]
pub struct ContentNormalizer {
    generator: Arc<dyn Generator>,
    summarizer: Persona,
}

impl ContentNormalizer {
    /// Create a normaliser that summarises through `generator`.
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self {
            generator,
            summarizer: summarizer_persona(),
        }
    }

    /// Normalise with the default bound of [`DEFAULT_MAX_CHARS`].
    pub fn normalize(&self, content: &str) -> String {
        self.normalize_to(content, DEFAULT_MAX_CHARS)
    }

    /// Return `content` unchanged when it has at most `max_chars` characters,
    /// otherwise a summary, otherwise a word-boundary truncation ending in
    /// [`TRUNCATION_MARKER`].
    pub fn normalize_to(&self, content: &str, max_chars: usize) -> String {
        let len = char_len(content);
        if len <= max_chars {
            return content.to_string();
        }

        log::debug!("Content is {} chars (limit {}), summarizing", len, max_chars);
        match self.generator.generate(&self.summarizer, &Task::summarize(content)) {
            Ok(summary) if !summary.trim().is_empty() => summary.trim().to_string(),
            Ok(_) => {
                log::warn!("Summarizer returned empty text, truncating content instead");
                truncate_fallback(content, max_chars)
            }
            Err(e) => {
                log::warn!("Summarization failed, truncating content instead: {}", e);
                truncate_fallback(content, max_chars)
            }
        }
    }
}

/// Deterministic fallback for content over `max_chars`: shorten at a word
/// boundary and always end with [`TRUNCATION_MARKER`], marker included in
/// the bound.
pub fn truncate_fallback(content: &str, max_chars: usize) -> String {
    let budget = max_chars.saturating_sub(char_len(TRUNCATION_MARKER));
    let mut kept = shorten(content, budget, "");
    kept.push_str(TRUNCATION_MARKER);
    kept
}
