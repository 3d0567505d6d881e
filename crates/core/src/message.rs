//! Chat message domain types.
//!
//! These are the value objects that flow through the whole engine:
//! the caller seeds a history → the loop streams a completion → thought and
//! observation messages are appended → the history goes back upstream.

use serde::{Deserialize, Serialize};

/// The role of a message sender in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// The end user
    User,
    /// The AI assistant
    Assistant,
    /// System instructions and tool observations
    System,
}

/// A single message in a conversation history.
///
/// Deliberately the exact wire shape the relay accepts and the upstream
/// chat-completions API consumes: role plus content, nothing else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who sent this message
    pub role: ChatRole,

    /// The text content
    pub content: String,
}

impl ChatMessage {
    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }

    /// Create a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    /// Wrap a tool result as an `Observation:` system message.
    ///
    /// The loop always appends observations in this exact shape so the model
    /// can correlate them with its preceding `Action:` line.
    pub fn observation(result_json: impl AsRef<str>) -> Self {
        Self::system(format!("Observation: {}", result_json.as_ref()))
    }
}
