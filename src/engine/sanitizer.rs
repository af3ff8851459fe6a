//! Deterministic cleanup of raw generated text.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::utilities::string_utils::truncate_chars;

/// Hard cap on comment and reply length, in characters.
pub const MAX_COMMENT_CHARS: usize = 600;

/// Leading labels models sometimes put before the actual comment. Only
/// stripped when filler stripping is enabled.
pub const FILLER_PREFIXES: [&str; 4] = ["Here's my comment:", "Comment:", "My response:", "Response:"];

static FILLER_PREFIX: Lazy<Regex> = Lazy::new(|| {
    let alternatives = FILLER_PREFIXES
        .iter()
        .map(|p| regex::escape(p))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)^(?:{})\s*", alternatives)).unwrap()
});

/// Cleans generated text before it becomes a comment or reply.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommentSanitizer {
    /// Remove one leading filler label such as `"Comment:"`.
    pub strip_filler: bool,
}

impl CommentSanitizer {
    /// Sanitizer with filler stripping off.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sanitizer with filler stripping set to `strip_filler`.
    pub fn with_filler_stripping(strip_filler: bool) -> Self {
        Self { strip_filler }
    }

    /// Trim, unwrap one layer of surrounding double quotes, cap at
    /// [`MAX_COMMENT_CHARS`] characters.
    pub fn sanitize(&self, raw: &str) -> String {
        let mut text = raw.trim();

        if self.strip_filler {
            if let Some(m) = FILLER_PREFIX.find(text) {
                text = text[m.end()..].trim_start();
            }
        }

        if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
            text = &text[1..text.len() - 1];
        }

        truncate_chars(text, MAX_COMMENT_CHARS)
    }
}

/// [`CommentSanitizer::sanitize`] with default settings.
pub fn sanitize(raw: &str) -> String {
    CommentSanitizer::new().sanitize(raw)
}
