//! The comment engine.
//!
//! [`CommentEngine`] turns content plus a persona selection into a batch of
//! comments, and answers a user's reply to one comment. Generation is
//! sequential and blocking: one generator call per slot, in order.
//!
//! Failures are handled in two tiers. A generator failure is a soft error:
//! it is logged and replaced by a placeholder so every slot yields a visible
//! comment. An unknown persona on the reply path is a hard error and reaches
//! the caller as [`EngineError::PersonaNotFound`].

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::normalizer::ContentNormalizer;
use super::sanitizer::CommentSanitizer;
use super::types::{Comment, Reply};
use crate::agents::generator::Generator;
use crate::persona::{Persona, PersonaStore};
use crate::task::Task;
use crate::utilities::errors::{EngineError, GenerationError};

/// Text shown in place of a comment whose generation failed.
pub const COMMENT_PLACEHOLDER: &str = "[Comment generation failed: An error occurred]";

/// Upper bound on comments per batch.
pub const MAX_COMMENTS: usize = 20;

/// Generates comments and replies for one session.
pub struct CommentEngine {
    generator: Arc<dyn Generator>,
    normalizer: ContentNormalizer,
    sanitizer: CommentSanitizer,
    rng: StdRng,
}

impl CommentEngine {
    /// Engine with an entropy-seeded random source.
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self::with_rng(generator, StdRng::from_entropy())
    }

    /// Engine with a fixed seed, for reproducible selection and timestamps.
    pub fn with_seed(generator: Arc<dyn Generator>, seed: u64) -> Self {
        Self::with_rng(generator, StdRng::seed_from_u64(seed))
    }

    /// Engine with the given random source.
    pub fn with_rng(generator: Arc<dyn Generator>, rng: StdRng) -> Self {
        Self {
            normalizer: ContentNormalizer::new(generator.clone()),
            generator,
            sanitizer: CommentSanitizer::default(),
            rng,
        }
    }

    /// Replace the sanitizer.
    pub fn with_sanitizer(mut self, sanitizer: CommentSanitizer) -> Self {
        self.sanitizer = sanitizer;
        self
    }

    /// Generate `count` comments on `content`.
    ///
    /// Authors are drawn uniformly, with replacement, from the distinct
    /// names in `persona_names` that resolve in `store`; unknown names and
    /// repeats are dropped.
    /// An empty pool yields an empty batch. `count` is clamped to
    /// `1..=MAX_COMMENTS`. The result is in generation order.
    pub fn generate_comments(
        &mut self,
        store: &PersonaStore,
        content: &str,
        persona_names: &[String],
        count: usize,
    ) -> Vec<Comment> {
        let mut pool: Vec<&Persona> = Vec::with_capacity(persona_names.len());
        for name in persona_names {
            match store.get(name) {
                Some(persona) if !pool.iter().any(|p| p.name == persona.name) => pool.push(persona),
                Some(_) => {}
                None => log::debug!("Dropping unknown persona '{}' from selection", name),
            }
        }

        if pool.is_empty() {
            log::info!("No valid personas selected, nothing to generate");
            return Vec::new();
        }

        let count = count.clamp(1, MAX_COMMENTS);
        let safe_content = self.normalizer.normalize(content);
        let task = Task::comment(&safe_content);

        let mut comments = Vec::with_capacity(count);
        for slot in 0..count {
            let persona = match pool.choose(&mut self.rng) {
                Some(p) => *p,
                None => break,
            };

            let text = match self.run(persona, &task) {
                Ok(text) => text,
                Err(e) => {
                    log::error!(
                        "Comment {} of {} by '{}' failed: {}",
                        slot + 1,
                        count,
                        persona.name,
                        e
                    );
                    COMMENT_PLACEHOLDER.to_string()
                }
            };

            let minutes = self.rng.gen_range(1..=60);
            comments.push(Comment::new(
                persona.name.clone(),
                text,
                format!("{}m ago", minutes),
            ));
        }

        log::info!("Generated {} comments from a pool of {}", comments.len(), pool.len());
        comments
    }

    /// Generate a reply from `agent_to_reply` to the user's reply on a
    /// comment.
    ///
    /// Fails with [`EngineError::PersonaNotFound`] when the persona does not
    /// resolve; the generator is not called in that case. A generator
    /// failure still returns a [`Reply`], with the failure reason as text.
    pub fn generate_reply(
        &mut self,
        store: &PersonaStore,
        original_content: &str,
        original_comment_author: &str,
        original_comment_text: &str,
        user_reply: &str,
        agent_to_reply: &str,
    ) -> Result<Reply, EngineError> {
        let persona = store
            .get(agent_to_reply)
            .ok_or_else(|| EngineError::PersonaNotFound {
                name: agent_to_reply.to_string(),
            })?;

        let safe_content = self.normalizer.normalize(original_content);
        let task = Task::reply(
            &safe_content,
            original_comment_author,
            original_comment_text,
            user_reply,
            &persona.name,
        );

        let text = match self.run(persona, &task) {
            Ok(text) => text,
            Err(e) => {
                log::error!("Reply by '{}' failed: {}", persona.name, e);
                format!("[Reply generation failed: {}]", e)
            }
        };

        let seconds = self.rng.gen_range(1..=60);
        Ok(Reply {
            author: persona.name.clone(),
            text,
            timestamp: format!("{}s ago", seconds),
        })
    }

    fn run(&self, persona: &Persona, task: &Task) -> Result<String, GenerationError> {
        let raw = self.generator.generate(persona, task)?;
        Ok(self.sanitizer.sanitize(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::testing::{always_fail, echo, fixed, FnGenerator};
    use once_cell::sync::Lazy;
    use regex::Regex;

    static MINUTES_AGO: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([0-9]+)m ago$").unwrap());
    static SECONDS_AGO: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([0-9]+)s ago$").unwrap());

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn in_range(re: &Regex, timestamp: &str) -> bool {
        re.captures(timestamp)
            .and_then(|c| c[1].parse::<u32>().ok())
            .map_or(false, |n| (1..=60).contains(&n))
    }

    #[test]
    fn test_empty_selection_returns_empty() {
        let store = PersonaStore::with_defaults();
        let mut engine = CommentEngine::with_seed(echo(), 1);
        assert!(engine.generate_comments(&store, "content", &[], 5).is_empty());
    }

    #[test]
    fn test_unresolved_selection_returns_empty() {
        let store = PersonaStore::with_defaults();
        let generator = Arc::new(FnGenerator::new(|_, _| Ok("x".to_string())));
        let mut engine = CommentEngine::with_seed(generator.clone(), 1);
        let out = engine.generate_comments(&store, "content", &names(&["Nobody"]), 5);
        assert!(out.is_empty());
        assert_eq!(generator.calls(), 0);
    }

    #[test]
    fn test_single_persona_fills_every_slot() {
        let store = PersonaStore::with_defaults();
        let mut engine = CommentEngine::with_seed(echo(), 7);
        let out = engine.generate_comments(&store, "content", &names(&["The Analyst"]), 4);

        assert_eq!(out.len(), 4);
        for c in &out {
            assert_eq!(c.author, "The Analyst");
            assert!(c.text.starts_with("The Analyst: You are commenting on this content"));
            assert!(in_range(&MINUTES_AGO, &c.timestamp), "bad timestamp {}", c.timestamp);
            assert!(c.replies.is_empty());
        }
    }

    #[test]
    fn test_failures_become_placeholders() {
        let store = PersonaStore::with_defaults();
        let mut engine = CommentEngine::with_seed(always_fail(), 3);
        let out = engine.generate_comments(&store, "content", &names(&["The Critic"]), 3);

        assert_eq!(out.len(), 3);
        for c in &out {
            assert_eq!(c.author, "The Critic");
            assert_eq!(c.text, COMMENT_PLACEHOLDER);
        }
    }

    #[test]
    fn test_unknown_names_are_dropped_from_pool() {
        let store = PersonaStore::with_defaults();
        let mut engine = CommentEngine::with_seed(fixed("ok"), 11);
        let out = engine.generate_comments(
            &store,
            "content",
            &names(&["Ghost", "The Superfan", "Phantom"]),
            10,
        );
        assert_eq!(out.len(), 10);
        assert!(out.iter().all(|c| c.author == "The Superfan"));
    }

    #[test]
    fn test_repeated_names_do_not_weight_selection() {
        let store = PersonaStore::with_defaults();
        let mut with_repeats = CommentEngine::with_seed(echo(), 21);
        let mut distinct = CommentEngine::with_seed(echo(), 21);
        assert_eq!(
            with_repeats.generate_comments(
                &store,
                "content",
                &names(&["The Critic", "The Critic", "The Analyst", "The Critic"]),
                MAX_COMMENTS
            ),
            distinct.generate_comments(
                &store,
                "content",
                &names(&["The Critic", "The Analyst"]),
                MAX_COMMENTS
            )
        );
    }

    #[test]
    fn test_count_is_clamped() {
        let store = PersonaStore::with_defaults();
        let mut engine = CommentEngine::with_seed(fixed("ok"), 5);
        let selection = names(&["The Critic"]);
        assert_eq!(engine.generate_comments(&store, "c", &selection, 0).len(), 1);
        assert_eq!(engine.generate_comments(&store, "c", &selection, 500).len(), MAX_COMMENTS);
    }

    #[test]
    fn test_selection_stays_in_pool() {
        let store = PersonaStore::with_defaults();
        let selection = names(&["The Critic", "The Newcomer"]);
        let mut engine = CommentEngine::with_seed(fixed("ok"), 42);
        let out = engine.generate_comments(&store, "content", &selection, MAX_COMMENTS);
        assert!(out.iter().all(|c| selection.contains(&c.author)));
    }

    #[test]
    fn test_same_seed_same_batch() {
        let store = PersonaStore::with_defaults();
        let selection = names(&["The Critic", "The Expert", "The Internet Troll"]);
        let mut a = CommentEngine::with_seed(echo(), 99);
        let mut b = CommentEngine::with_seed(echo(), 99);
        assert_eq!(
            a.generate_comments(&store, "content", &selection, 8),
            b.generate_comments(&store, "content", &selection, 8)
        );
    }

    #[test]
    fn test_generated_text_is_sanitized() {
        let store = PersonaStore::with_defaults();
        let mut engine = CommentEngine::with_seed(fixed("  \"quoted take\"  "), 2);
        let out = engine.generate_comments(&store, "content", &names(&["The Critic"]), 1);
        assert_eq!(out[0].text, "quoted take");
    }

    #[test]
    fn test_filler_stripping_applies_when_enabled() {
        let store = PersonaStore::with_defaults();
        let mut engine = CommentEngine::with_seed(fixed("Comment: solid"), 2)
            .with_sanitizer(CommentSanitizer::with_filler_stripping(true));
        let out = engine.generate_comments(&store, "content", &names(&["The Critic"]), 1);
        assert_eq!(out[0].text, "solid");
    }

    #[test]
    fn test_long_content_is_normalized_once_per_batch() {
        let store = PersonaStore::with_defaults();
        let generator = Arc::new(FnGenerator::new(|persona, task| {
            if persona.name == "Summarizer" {
                return Ok("short summary".to_string());
            }
            assert!(task.description.contains("\"short summary\""));
            Ok("nice".to_string())
        }));
        let mut engine = CommentEngine::with_seed(generator.clone(), 8);
        let content = "long ".repeat(400);
        let out = engine.generate_comments(&store, &content, &names(&["The Critic"]), 3);
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|c| c.text == "nice"));
        assert_eq!(generator.calls(), 4);
    }

    #[test]
    fn test_reply_from_known_persona() {
        let store = PersonaStore::with_defaults();
        let generator = Arc::new(FnGenerator::new(|persona, task| {
            assert_eq!(persona.name, "The Critic");
            assert!(task.description.contains("Original comment from The Critic: \"meh\""));
            assert!(task.description.contains("User's reply to the original comment: \"why?\""));
            Ok("Because.".to_string())
        }));
        let mut engine = CommentEngine::with_seed(generator, 4);
        let reply = engine
            .generate_reply(&store, "content", "The Critic", "meh", "why?", "The Critic")
            .unwrap();

        assert_eq!(reply.author, "The Critic");
        assert_eq!(reply.text, "Because.");
        assert!(in_range(&SECONDS_AGO, &reply.timestamp), "bad timestamp {}", reply.timestamp);
    }

    #[test]
    fn test_reply_unknown_persona_is_hard_error() {
        let store = PersonaStore::with_defaults();
        let generator = Arc::new(FnGenerator::new(|_, _| Ok("x".to_string())));
        let mut engine = CommentEngine::with_seed(generator.clone(), 4);
        let err = engine
            .generate_reply(&store, "content", "A", "text", "hi", "Nonexistent")
            .unwrap_err();

        assert_eq!(
            err,
            EngineError::PersonaNotFound {
                name: "Nonexistent".to_string()
            }
        );
        assert_eq!(generator.calls(), 0);
    }

    #[test]
    fn test_reply_failure_is_embedded() {
        let store = PersonaStore::with_defaults();
        let mut engine = CommentEngine::with_seed(always_fail(), 4);
        let reply = engine
            .generate_reply(&store, "content", "The Expert", "x", "y", "The Expert")
            .unwrap();

        assert_eq!(reply.author, "The Expert");
        assert_eq!(
            reply.text,
            "[Reply generation failed: Generation timed out after 45s]"
        );
    }

    #[test]
    fn test_reply_uses_custom_persona() {
        let mut store = PersonaStore::with_defaults();
        store
            .spawn_custom_persona("The Philosopher", "Wise", "ask deep questions")
            .unwrap();
        let mut engine = CommentEngine::with_seed(echo(), 4);
        let reply = engine
            .generate_reply(&store, "c", "The Philosopher", "t", "u", "The Philosopher")
            .unwrap();
        assert_eq!(reply.author, "The Philosopher");
    }
}
