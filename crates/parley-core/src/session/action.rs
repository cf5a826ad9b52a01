//! Discrete actions applied to a session.
//!
//! Conversation state is never spliced ad hoc; every mutation goes
//! through `SessionState::apply` with one of these actions, so the
//! single-pending-message and single-in-flight invariants are
//! checkable preconditions.

use serde::{Deserialize, Serialize};

/// An action applied to [`SessionState`](super::SessionState).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionAction {
    /// Append a user message and bump the counter.
    Submit { text: String },
    /// Append the quota notice and mark the session blocked.
    Block { notice: String },
    /// Enter the requesting phase; the thinking indicator turns on.
    BeginRequest,
    /// The generator resolved; append the pending placeholder and
    /// start streaming.
    BeginStream,
    /// Replace the pending message's content with the rendered prefix;
    /// the first tick clears the thinking indicator.
    TokenTick { rendered: String },
    /// All tokens delivered; enter the settling phase.
    Settle,
    /// Replace the pending message with a finalized assistant message
    /// carrying the exact original response.
    Finalize { content: String },
    /// Generation failed; drop any pending message and append the
    /// failure notice.
    Fail { notice: String },
    /// Discard the whole session and start a new conversation.
    Reset,
}

impl SessionAction {
    /// Short action name used in errors and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Submit { .. } => "submit",
            Self::Block { .. } => "block",
            Self::BeginRequest => "begin_request",
            Self::BeginStream => "begin_stream",
            Self::TokenTick { .. } => "token_tick",
            Self::Settle => "settle",
            Self::Finalize { .. } => "finalize",
            Self::Fail { .. } => "fail",
            Self::Reset => "reset",
        }
    }
}
