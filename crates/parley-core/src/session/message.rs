//! Conversation message types.
//!
//! This module contains types for representing messages in a
//! conversation, including roles, the in-progress pending message,
//! and the fixed notice texts the engine substitutes on quota and
//! failure outcomes.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reserved id of the single in-progress assistant message.
///
/// Finalized messages always carry a fresh UUID v4, so this nil UUID
/// can never collide with one of them.
pub const PENDING_MESSAGE_ID: &str = "00000000-0000-0000-0000-000000000000";

/// Notice appended when the free message quota is exhausted.
pub const QUOTA_NOTICE: &str =
    "You've reached the free message limit. Create an account to keep the conversation going.";

/// Notice appended when response generation fails.
pub const GENERATION_FAILURE_NOTICE: &str =
    "Something went wrong while generating a response. Please try again.";

/// Represents the author of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageRole {
    /// Message from the user.
    User,
    /// Message from the assistant (including notices).
    Assistant,
}

/// A single message in a conversation.
///
/// Each message has a role, content, and an RFC 3339 timestamp. The
/// `pending` flag marks the one message whose content is still
/// growing; it is cleared by replacing the message on finalization,
/// never by mutating it in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique message id (UUID format).
    pub id: String,
    /// The role of the message author.
    pub role: MessageRole,
    /// The content of the message.
    pub content: String,
    /// Timestamp when the message was created (ISO 8601 format).
    pub created_at: String,
    /// Whether this is the in-progress placeholder message.
    #[serde(default)]
    pub pending: bool,
}

impl ChatMessage {
    /// Creates a user message with a fresh id and the current time.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: MessageRole::User,
            content: content.into(),
            created_at: Utc::now().to_rfc3339(),
            pending: false,
        }
    }

    /// Creates a finalized assistant message with a fresh id and the
    /// current time. Used for notices as well as canned content.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: MessageRole::Assistant,
            content: content.into(),
            created_at: Utc::now().to_rfc3339(),
            pending: false,
        }
    }

    /// Creates the pending placeholder message with the reserved id
    /// and empty content.
    pub fn pending() -> Self {
        Self {
            id: PENDING_MESSAGE_ID.to_string(),
            role: MessageRole::Assistant,
            content: String::new(),
            created_at: Utc::now().to_rfc3339(),
            pending: true,
        }
    }

    /// Creates the finalized assistant message that replaces a pending
    /// one, keeping the pending message's timestamp so the reply stays
    /// anchored to the original submission.
    pub fn finalized(content: impl Into<String>, created_at: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: MessageRole::Assistant,
            content: content.into(),
            created_at,
            pending: false,
        }
    }
}
