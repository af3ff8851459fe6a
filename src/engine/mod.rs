//! Comment generation engine.
//!
//! Normalises content, drives the generator once per comment slot, cleans
//! the results and scores the batch.

pub mod comment_engine;
pub mod heat;
pub mod normalizer;
pub mod sanitizer;
pub mod types;

pub use comment_engine::{CommentEngine, COMMENT_PLACEHOLDER, MAX_COMMENTS};
pub use heat::{heat_rating, toxicity_level, CommentStats, HeatLevel};
pub use normalizer::{ContentNormalizer, DEFAULT_MAX_CHARS, TRUNCATION_MARKER};
pub use sanitizer::{CommentSanitizer, MAX_COMMENT_CHARS};
pub use types::{Comment, Reply};
