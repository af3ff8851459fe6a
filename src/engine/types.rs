//! Comment and reply records produced by the engine.

use serde::{Deserialize, Serialize};

/// A persona's answer to a user reply. Replies do not nest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    /// Name of the persona that wrote it.
    pub author: String,
    /// Sanitized text, or the failure notice.
    pub text: String,
    /// Cosmetic relative time, e.g. `"12s ago"`.
    pub timestamp: String,
}

/// One generated top-level comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Name of the persona that wrote it. Display-only once created.
    pub author: String,
    /// Sanitized, length-capped text.
    pub text: String,
    /// Cosmetic relative time, e.g. `"7m ago"`.
    pub timestamp: String,
    /// Persona replies, oldest first. Append-only.
    #[serde(default)]
    pub replies: Vec<Reply>,
    /// Latest reply the user wrote to this comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_reply: Option<String>,
}

impl Comment {
    /// Create a comment with no replies.
    pub fn new(
        author: impl Into<String>,
        text: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            author: author.into(),
            text: text.into(),
            timestamp: timestamp.into(),
            replies: Vec::new(),
            user_reply: None,
        }
    }

    /// Append a persona reply.
    pub fn push_reply(&mut self, reply: Reply) {
        self.replies.push(reply);
    }

    /// Record the user's reply draft.
    pub fn set_user_reply(&mut self, text: impl Into<String>) {
        self.user_reply = Some(text.into());
    }
}
