//! Generation tasks handed to a persona.
//!
//! A [`Task`] is a natural-language description plus a hint of the expected
//! output, the same pair a crew task carries. The constructors here build the
//! three tasks the engine needs: summarise long content, comment on content,
//! reply to a user.

use serde::{Deserialize, Serialize};

/// A unit of work for the generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// What the persona is asked to do.
    pub description: String,
    /// Clear definition of the expected outcome.
    pub expected_output: String,
}

impl Task {
    /// Create a task.
    pub fn new(description: impl Into<String>, expected_output: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            expected_output: expected_output.into(),
        }
    }

    /// Compress `content` into at most 200 words.
    pub fn summarize(content: &str) -> Self {
        Self::new(
            format!("Summarize this text into <=200 words:\n\n{}", content),
            "Concise summary of the text",
        )
    }

    /// React to `content` with a short in-character social media comment.
    pub fn comment(content: &str) -> Self {
        let description = format!(
            "You are commenting on this content: \"{content}\"\n\n\
             Write a short realistic social media comment that reflects your personality and goals.\n\
             The comment should be:\n\
             - Authentic to your character\n\
             - 1-3 sentences long\n\
             - Written in casual social media style\n\
             - Engaging and realistic\n\n\
             Do not include any meta-commentary or explanations, just write the comment \
             as if you're responding directly to the content."
        );
        Self::new(
            description,
            "A single social media comment responding to the content",
        )
    }

    /// Answer the user's reply to a comment, in character.
    pub fn reply(
        content: &str,
        comment_author: &str,
        comment_text: &str,
        user_reply: &str,
        persona_name: &str,
    ) -> Self {
        let description = format!(
            "You are participating in a social media discussion.\n\
             Original content: \"{content}\"\n\
             Original comment from {comment_author}: \"{comment_text}\"\n\
             User's reply to the original comment: \"{user_reply}\"\n\n\
             Your task is to generate a realistic social media reply from your persona \
             ({persona_name}) to the user's reply.\n\
             The reply should be:\n\
             - Authentic to your character and consistent with your previous comment (if any).\n\
             - 1-2 sentences long.\n\
             - Written in casual social media style.\n\
             - Engaging and realistic.\n\
             - Directly address the user's reply.\n\n\
             Do not include any meta-commentary or explanations, just write the reply \
             as if you're responding directly to the user."
        );
        Self::new(
            description,
            "A single social media reply to the user's comment",
        )
    }
}
