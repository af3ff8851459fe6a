//! Heat rating for a comment batch.
//!
//! A crude 0 to 10 intensity score from comment length and a fixed list of
//! emotional markers, bucketed into four display levels.

use serde::{Deserialize, Serialize};

use super::types::Comment;
use crate::utilities::string_utils::char_len;

/// Substrings that raise a comment's heat, matched case-insensitively.
/// `"!!!"` also contains `"!"`, so it counts twice.
pub const EMOTIONAL_MARKERS: [&str; 9] =
    ["amazing", "terrible", "love", "hate", "wow", "omg", "wtf", "!", "!!!"];

const LONG_COMMENT_CHARS: usize = 100;
const MAX_COMMENT_HEAT: u32 = 5;
const MAX_HEAT: u8 = 10;

fn comment_heat(text: &str) -> u32 {
    let mut heat = 1;
    if char_len(text) > LONG_COMMENT_CHARS {
        heat += 1;
    }
    let lowered = text.to_lowercase();
    heat += EMOTIONAL_MARKERS
        .iter()
        .filter(|marker| lowered.contains(**marker))
        .count() as u32;
    heat.min(MAX_COMMENT_HEAT)
}

/// Score a batch from 0 (empty) to 10.
///
/// Each comment scores 1 to 5; the batch score is the mean times two,
/// floored and capped at 10.
pub fn heat_rating(comments: &[Comment]) -> u8 {
    if comments.is_empty() {
        return 0;
    }
    let total: u32 = comments.iter().map(|c| comment_heat(&c.text)).sum();
    let scaled = (total as f64 / comments.len() as f64 * 2.0).floor();
    (scaled as u8).min(MAX_HEAT)
}

/// Display band for a heat score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeatLevel {
    Mild,
    Medium,
    Spicy,
    Savage,
}

impl HeatLevel {
    /// Band for `score`: up to 2 Mild, up to 5 Medium, up to 8 Spicy, else Savage.
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=2 => HeatLevel::Mild,
            3..=5 => HeatLevel::Medium,
            6..=8 => HeatLevel::Spicy,
            _ => HeatLevel::Savage,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HeatLevel::Mild => "Mild",
            HeatLevel::Medium => "Medium",
            HeatLevel::Spicy => "Spicy",
            HeatLevel::Savage => "Savage",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            HeatLevel::Mild => "😊",
            HeatLevel::Medium => "🔥",
            HeatLevel::Spicy => "🌶️",
            HeatLevel::Savage => "💀",
        }
    }
}

impl std::fmt::Display for HeatLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.icon(), self.label())
    }
}

/// Label for a heat score.
pub fn toxicity_level(score: u8) -> &'static str {
    HeatLevel::from_score(score).label()
}

/// Summary numbers for a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CommentStats {
    pub total_comments: usize,
    /// Mean text length in characters, rounded down. 0 for an empty batch.
    pub avg_comment_length: usize,
}

impl CommentStats {
    pub fn from_comments(comments: &[Comment]) -> Self {
        if comments.is_empty() {
            return Self::default();
        }
        let total_len: usize = comments.iter().map(|c| char_len(&c.text)).sum();
        Self {
            total_comments: comments.len(),
            avg_comment_length: total_len / comments.len(),
        }
    }
}
