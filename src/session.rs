//! Per-user session context.
//!
//! A [`Session`] is created at login and owns everything one user touches:
//! their persona store (built-ins plus the personas they create), the comment
//! engine bound to their provider key, the current comment thread and the
//! content it was generated for. Sessions share no mutable state.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::agents::generator::{Generator, LlmGenerator};
use crate::auth::ProviderKey;
use crate::engine::{
    heat_rating, Comment, CommentEngine, CommentSanitizer, CommentStats, HeatLevel, Reply,
};
use crate::llm::LLM;
use crate::persona::{Persona, PersonaStore};
use crate::utilities::config::AppConfig;
use crate::utilities::errors::{ConfigError, EngineError};
use crate::utilities::string_utils::format_content_preview;

/// Personas selected when a request does not name any.
pub const DEFAULT_SELECTION: [&str; 4] = [
    "The Critic",
    "The Supportive Friend",
    "The Analyst",
    "The Naija Roaster",
];

/// Comments generated when a request does not give a count.
pub const DEFAULT_COMMENT_COUNT: usize = 5;

/// Characters of content shown in a preview.
pub const PREVIEW_CHARS: usize = 200;

/// Default persona selection as owned names.
pub fn default_selection() -> Vec<String> {
    DEFAULT_SELECTION.iter().map(|s| s.to_string()).collect()
}

/// One user's working state.
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    store: PersonaStore,
    engine: CommentEngine,
    comments: Vec<Comment>,
    current_content: String,
}

impl Session {
    /// Build a session whose generator talks to the configured provider
    /// with `key`.
    pub fn new(config: &AppConfig, key: &ProviderKey) -> Result<Self, ConfigError> {
        let llm = LLM::new(config.model.clone())
            .api_key(key.as_str())
            .base_url(config.base_url.clone())
            .timeout(config.llm_timeout_secs)
            .temperature(config.temperature)
            .build()?;
        let generator = LlmGenerator::new(llm);
        log::debug!("Session generator uses model {}", generator.model());

        let engine = CommentEngine::new(Arc::new(generator))
            .with_sanitizer(CommentSanitizer::with_filler_stripping(config.strip_filler));
        Ok(Self::with_engine(engine))
    }

    /// Build a session around an existing generator.
    pub fn with_generator(generator: Arc<dyn Generator>) -> Self {
        Self::with_engine(CommentEngine::new(generator))
    }

    /// Build a session around an existing engine.
    pub fn with_engine(engine: CommentEngine) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            store: PersonaStore::with_defaults(),
            engine,
            comments: Vec::new(),
            current_content: String::new(),
        }
    }

    pub fn store(&self) -> &PersonaStore {
        &self.store
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn current_content(&self) -> &str {
        &self.current_content
    }

    /// Short preview of the current content.
    pub fn content_preview(&self) -> String {
        format_content_preview(&self.current_content, PREVIEW_CHARS)
    }

    /// Create or replace a custom persona in this session.
    pub fn spawn_persona(&mut self, name: &str, tone: &str, goal: &str) -> Result<Persona, EngineError> {
        self.store.spawn_custom_persona(name, tone, goal)
    }

    /// Generate a fresh thread for `content`, replacing the previous one.
    pub fn generate(&mut self, content: &str, persona_names: &[String], count: usize) -> &[Comment] {
        self.current_content = content.to_string();
        self.comments = self
            .engine
            .generate_comments(&self.store, content, persona_names, count);
        &self.comments
    }

    /// Reply to comment `index` as the user. The comment's author answers,
    /// the answer is appended to the comment and the user's text is kept as
    /// its `user_reply`.
    pub fn reply(&mut self, index: usize, user_reply: &str) -> Result<Reply, EngineError> {
        let comment = self
            .comments
            .get(index)
            .ok_or(EngineError::CommentNotFound { index })?;
        let author = comment.author.clone();
        let comment_text = comment.text.clone();

        let reply = self.engine.generate_reply(
            &self.store,
            &self.current_content,
            &author,
            &comment_text,
            user_reply,
            &author,
        )?;

        let comment = &mut self.comments[index];
        comment.push_reply(reply.clone());
        comment.set_user_reply(user_reply);
        Ok(reply)
    }

    /// Save a reply draft on comment `index` without generating an answer.
    pub fn set_user_reply(&mut self, index: usize, text: &str) -> Result<(), EngineError> {
        let comment = self
            .comments
            .get_mut(index)
            .ok_or(EngineError::CommentNotFound { index })?;
        comment.set_user_reply(text);
        Ok(())
    }

    /// Drop the thread and the content it belongs to.
    pub fn clear(&mut self) {
        self.comments.clear();
        self.current_content.clear();
    }

    pub fn heat(&self) -> u8 {
        heat_rating(&self.comments)
    }

    pub fn heat_level(&self) -> HeatLevel {
        HeatLevel::from_score(self.heat())
    }

    pub fn stats(&self) -> CommentStats {
        CommentStats::from_comments(&self.comments)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("created_at", &self.created_at)
            .field("comments", &self.comments.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::testing::{always_fail, echo, fixed};
    use crate::engine::COMMENT_PLACEHOLDER;

    #[test]
    fn test_default_selection_resolves() {
        let session = Session::with_generator(echo());
        for name in DEFAULT_SELECTION {
            assert!(session.store().contains(name), "{} missing", name);
        }
    }

    #[test]
    fn test_generate_replaces_thread() {
        let mut session = Session::with_generator(fixed("hot take"));
        session.generate("first", &default_selection(), 3);
        assert_eq!(session.comments().len(), 3);

        session.generate("second", &default_selection(), DEFAULT_COMMENT_COUNT);
        assert_eq!(session.comments().len(), DEFAULT_COMMENT_COUNT);
        assert_eq!(session.current_content(), "second");
    }

    #[test]
    fn test_reply_appends_and_records_user_reply() {
        let mut session = Session::with_generator(fixed("sure"));
        session.generate("content", &["The Critic".to_string()], 1);

        let reply = session.reply(0, "really?").unwrap();
        assert_eq!(reply.author, "The Critic");
        session.reply(0, "and again?").unwrap();

        let comment = &session.comments()[0];
        assert_eq!(comment.replies.len(), 2);
        assert_eq!(comment.user_reply.as_deref(), Some("and again?"));
    }

    #[test]
    fn test_reply_to_missing_comment() {
        let mut session = Session::with_generator(fixed("x"));
        assert_eq!(
            session.reply(3, "hi"),
            Err(EngineError::CommentNotFound { index: 3 })
        );
    }

    #[test]
    fn test_reply_after_author_removed() {
        let mut session = Session::with_generator(fixed("x"));
        session.spawn_persona("Ghost", "Cold", "haunt").unwrap();
        session.generate("content", &["Ghost".to_string()], 1);
        session.store.clear();

        assert_eq!(
            session.reply(0, "hi"),
            Err(EngineError::PersonaNotFound {
                name: "Ghost".to_string()
            })
        );
        // The comment itself is untouched.
        assert!(session.comments()[0].replies.is_empty());
        assert!(session.comments()[0].user_reply.is_none());
    }

    #[test]
    fn test_set_user_reply_and_clear() {
        let mut session = Session::with_generator(always_fail());
        session.generate("content", &default_selection(), 2);
        assert!(session.comments().iter().all(|c| c.text == COMMENT_PLACEHOLDER));

        session.set_user_reply(1, "draft").unwrap();
        assert_eq!(session.comments()[1].user_reply.as_deref(), Some("draft"));

        session.clear();
        assert!(session.comments().is_empty());
        assert_eq!(session.current_content(), "");
        assert_eq!(session.heat(), 0);
        assert_eq!(session.stats(), CommentStats::default());
    }

    #[test]
    fn test_custom_persona_in_selection() {
        let mut session = Session::with_generator(echo());
        session.spawn_persona("The Philosopher", "Wise", "ask deep questions").unwrap();
        let out = session.generate("content", &["The Philosopher".to_string()], 2);
        assert!(out.iter().all(|c| c.author == "The Philosopher"));
    }

    #[test]
    fn test_new_builds_provider_generator() {
        let key = crate::auth::validate_api_key(&format!("gsk_{}", "k".repeat(40))).unwrap();
        assert!(Session::new(&AppConfig::default(), &key).is_ok());

        let config = AppConfig {
            model: "nowhere/model".to_string(),
            ..AppConfig::default()
        };
        assert!(matches!(
            Session::new(&config, &key),
            Err(ConfigError::UnsupportedProvider { .. })
        ));
    }

    #[test]
    fn test_preview() {
        let mut session = Session::with_generator(fixed("x"));
        session.generate(&"y".repeat(300), &[], 1);
        assert_eq!(session.content_preview().chars().count(), PREVIEW_CHARS + 3);
    }
}
