//! String utility functions.

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Collapse every run of whitespace into a single space and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text.trim(), " ").into_owned()
}

/// Number of characters (not bytes) in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Keep at most `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}

/// Shorten `text` to fit in `width` characters, breaking at word boundaries.
///
/// Whitespace is collapsed first. If the collapsed text fits it is returned
/// as-is; otherwise as many whole words as possible are kept and
/// `placeholder` is appended so the result is at most `width` characters.
/// When not even the first word fits, that word is cut mid-way.
pub fn shorten(text: &str, width: usize, placeholder: &str) -> String {
    let collapsed = collapse_whitespace(text);
    if char_len(&collapsed) <= width {
        return collapsed;
    }

    let budget = width.saturating_sub(char_len(placeholder));
    let mut kept = String::new();
    let mut kept_len = 0;

    for word in collapsed.split(' ') {
        let word_len = char_len(word);
        let needed = if kept.is_empty() { word_len } else { word_len + 1 };
        if kept_len + needed > budget {
            break;
        }
        if !kept.is_empty() {
            kept.push(' ');
        }
        kept.push_str(word);
        kept_len += needed;
    }

    if kept.is_empty() {
        kept = truncate_chars(&collapsed, budget);
    }

    kept.push_str(placeholder);
    kept
}

/// Preview of user content for display: unchanged when short, otherwise the
/// first `max_length` characters followed by `...`.
pub fn format_content_preview(content: &str, max_length: usize) -> String {
    if char_len(content) <= max_length {
        return content.to_string();
    }
    format!("{}...", truncate_chars(content, max_length))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \n\t b  c "), "a b c");
    }

    #[test]
    fn test_truncate_chars_multibyte() {
        assert_eq!(truncate_chars("héllo wörld", 4), "héll");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }

    #[test]
    fn test_shorten_fits() {
        assert_eq!(shorten("hello   world", 20, "..."), "hello world");
    }

    #[test]
    fn test_shorten_breaks_at_word_boundary() {
        let out = shorten("the quick brown fox jumps", 18, "...");
        assert_eq!(out, "the quick brown...");
        assert!(char_len(&out) <= 18);
    }

    #[test]
    fn test_shorten_hard_cuts_single_long_word() {
        let out = shorten(&"x".repeat(50), 10, "...");
        assert_eq!(out, "xxxxxxx...");
    }

    #[test]
    fn test_format_content_preview() {
        assert_eq!(format_content_preview("short", 200), "short");
        assert_eq!(format_content_preview("abcdef", 3), "abc...");
    }
}
