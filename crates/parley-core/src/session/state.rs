//! Session state and reducer.
//!
//! `SessionState` is the single owner of the conversation: the ordered
//! message list, the stream phase, the user-message counter, and the
//! thinking/blocked flags. All mutation goes through [`SessionState::apply`],
//! which rejects actions whose preconditions do not hold.

use super::action::SessionAction;
use super::message::ChatMessage;
use crate::error::{ParleyError, Result};
use serde::{Deserialize, Serialize};

/// Phase of the incremental-reveal state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamPhase {
    /// No submission in flight; new submissions are admitted.
    #[default]
    Idle,
    /// The generator has been invoked; no pending message exists yet.
    Requesting,
    /// Tokens are being revealed into the pending message.
    Streaming,
    /// All tokens delivered; waiting out the settle delay.
    Settling,
}

impl StreamPhase {
    fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Requesting => "requesting",
            Self::Streaming => "streaming",
            Self::Settling => "settling",
        }
    }
}

/// Read-only view of the session handed to the UI collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    /// Conversation messages in insertion order.
    pub messages: Vec<ChatMessage>,
    /// True while the thinking indicator should be shown (from the
    /// generator call until the first revealed token).
    pub is_requesting: bool,
    /// True once the quota has blocked a submission.
    pub is_blocked: bool,
}

/// Conversation state for a single assistant session.
///
/// # Invariants
///
/// - At most one pending message exists, and it is always last.
/// - `user_message_count` equals the number of `User` messages and
///   never decreases short of a full reset.
/// - A finalized message is never mutated again.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    messages: Vec<ChatMessage>,
    phase: StreamPhase,
    user_message_count: u32,
    thinking: bool,
    blocked: bool,
}

impl SessionState {
    /// Creates an empty idle session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Conversation messages in insertion order.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Current phase of the reveal state machine.
    pub fn phase(&self) -> StreamPhase {
        self.phase
    }

    /// Number of user-authored messages in this session.
    pub fn user_message_count(&self) -> u32 {
        self.user_message_count
    }

    /// Whether the thinking indicator is active.
    pub fn is_thinking(&self) -> bool {
        self.thinking
    }

    /// Whether the quota has blocked this session.
    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    /// The pending message, if a stream is revealing one.
    pub fn pending_message(&self) -> Option<&ChatMessage> {
        self.messages.last().filter(|m| m.pending)
    }

    /// Produces the read-only view for rendering.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            messages: self.messages.clone(),
            is_requesting: self.thinking,
            is_blocked: self.blocked,
        }
    }

    /// Applies an action, checking its preconditions first.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty submission and
    /// `IllegalTransition` when the action is not admissible in the
    /// current phase. State is untouched on error.
    pub fn apply(&mut self, action: SessionAction) -> Result<()> {
        let name = action.name();
        match action {
            SessionAction::Submit { text } => {
                self.require_phase(StreamPhase::Idle, name)?;
                if text.trim().is_empty() {
                    return Err(ParleyError::invalid_input("empty submission"));
                }
                self.messages.push(ChatMessage::user(text));
                self.user_message_count += 1;
                Ok(())
            }
            SessionAction::Block { notice } => {
                self.require_phase(StreamPhase::Idle, name)?;
                self.messages.push(ChatMessage::assistant(notice));
                self.blocked = true;
                Ok(())
            }
            SessionAction::BeginRequest => {
                self.require_phase(StreamPhase::Idle, name)?;
                self.phase = StreamPhase::Requesting;
                self.thinking = true;
                Ok(())
            }
            SessionAction::BeginStream => {
                self.require_phase(StreamPhase::Requesting, name)?;
                if self.pending_message().is_some() {
                    return Err(ParleyError::internal("a pending message already exists"));
                }
                self.messages.push(ChatMessage::pending());
                self.phase = StreamPhase::Streaming;
                Ok(())
            }
            SessionAction::TokenTick { rendered } => {
                self.require_phase(StreamPhase::Streaming, name)?;
                // No-op without a pending message, per the store contract.
                if let Some(message) = self.messages.last_mut().filter(|m| m.pending) {
                    message.content = rendered;
                }
                self.thinking = false;
                Ok(())
            }
            SessionAction::Settle => {
                self.require_phase(StreamPhase::Streaming, name)?;
                self.phase = StreamPhase::Settling;
                Ok(())
            }
            SessionAction::Finalize { content } => {
                self.require_phase(StreamPhase::Settling, name)?;
                let pending = self
                    .take_pending()
                    .ok_or_else(|| ParleyError::internal("finalize without a pending message"))?;
                self.messages
                    .push(ChatMessage::finalized(content, pending.created_at));
                self.phase = StreamPhase::Idle;
                self.thinking = false;
                Ok(())
            }
            SessionAction::Fail { notice } => {
                match self.phase() {
                    StreamPhase::Requesting | StreamPhase::Streaming | StreamPhase::Settling => {}
                    StreamPhase::Idle => {
                        return Err(ParleyError::IllegalTransition {
                            phase: StreamPhase::Idle.name(),
                            action: name,
                        });
                    }
                }
                self.take_pending();
                self.messages.push(ChatMessage::assistant(notice));
                self.phase = StreamPhase::Idle;
                self.thinking = false;
                Ok(())
            }
            SessionAction::Reset => {
                *self = Self::new();
                Ok(())
            }
        }
    }

    fn require_phase(&self, expected: StreamPhase, action: &'static str) -> Result<()> {
        if self.phase() == expected {
            Ok(())
        } else {
            Err(ParleyError::IllegalTransition {
                phase: self.phase().name(),
                action,
            })
        }
    }

    /// Removes and returns the pending message, if any.
    fn take_pending(&mut self) -> Option<ChatMessage> {
        if self.messages.last().is_some_and(|m| m.pending) {
            self.messages.pop()
        } else {
            None
        }
    }

    /// Debug check that the counter matches the message list.
    #[cfg(test)]
    fn counter_is_consistent(&self) -> bool {
        let users = self
            .messages
            .iter()
            .filter(|m| m.role == super::message::MessageRole::User)
            .count();
        users as u32 == self.user_message_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::message::{MessageRole, PENDING_MESSAGE_ID};

    fn submitted(text: &str) -> SessionState {
        let mut state = SessionState::new();
        state
            .apply(SessionAction::Submit {
                text: text.to_string(),
            })
            .unwrap();
        state
    }

    fn streaming(text: &str) -> SessionState {
        let mut state = submitted(text);
        state.apply(SessionAction::BeginRequest).unwrap();
        state.apply(SessionAction::BeginStream).unwrap();
        state
    }

    #[test]
    fn submit_appends_a_user_message_and_counts_it() {
        let state = submitted("hello");
        assert_eq!(state.messages().len(), 1);
        assert_eq!(state.messages()[0].role, MessageRole::User);
        assert_eq!(state.user_message_count(), 1);
        assert!(state.counter_is_consistent());
    }

    #[test]
    fn empty_submission_is_invalid_and_changes_nothing() {
        let mut state = SessionState::new();
        let err = state
            .apply(SessionAction::Submit {
                text: "   ".to_string(),
            })
            .unwrap_err();
        assert!(err.is_invalid_input());
        assert!(state.messages().is_empty());
        assert_eq!(state.user_message_count(), 0);
    }

    #[test]
    fn submit_is_refused_outside_idle() {
        let mut state = submitted("first");
        state.apply(SessionAction::BeginRequest).unwrap();
        let err = state
            .apply(SessionAction::Submit {
                text: "second".to_string(),
            })
            .unwrap_err();
        assert!(err.is_illegal_transition());
        assert_eq!(state.user_message_count(), 1);
    }

    #[test]
    fn block_appends_the_notice_without_counting_it() {
        let mut state = submitted("over the limit");
        state
            .apply(SessionAction::Block {
                notice: "please register".to_string(),
            })
            .unwrap();
        assert!(state.is_blocked());
        assert_eq!(state.messages().len(), 2);
        assert_eq!(state.messages()[1].role, MessageRole::Assistant);
        assert_eq!(state.user_message_count(), 1);
        assert!(state.counter_is_consistent());
    }

    #[test]
    fn begin_stream_creates_exactly_one_pending_message() {
        let state = streaming("hi");
        let pending = state.pending_message().unwrap();
        assert_eq!(pending.id, PENDING_MESSAGE_ID);
        assert!(pending.content.is_empty());
        assert_eq!(state.phase(), StreamPhase::Streaming);
    }

    #[test]
    fn begin_stream_requires_the_requesting_phase() {
        let mut state = submitted("hi");
        let err = state.apply(SessionAction::BeginStream).unwrap_err();
        assert!(err.is_illegal_transition());
    }

    #[test]
    fn token_tick_grows_the_pending_message_and_clears_thinking() {
        let mut state = streaming("hi");
        assert!(state.is_thinking());
        state
            .apply(SessionAction::TokenTick {
                rendered: "partial".to_string(),
            })
            .unwrap();
        assert!(!state.is_thinking());
        assert_eq!(state.pending_message().unwrap().content, "partial");
        state
            .apply(SessionAction::TokenTick {
                rendered: "partial answer".to_string(),
            })
            .unwrap();
        assert_eq!(state.pending_message().unwrap().content, "partial answer");
    }

    #[test]
    fn finalize_replaces_the_pending_message_with_a_fresh_id() {
        let mut state = streaming("hi");
        let pending_stamp = state.pending_message().unwrap().created_at.clone();
        state
            .apply(SessionAction::TokenTick {
                rendered: "full".to_string(),
            })
            .unwrap();
        state.apply(SessionAction::Settle).unwrap();
        state
            .apply(SessionAction::Finalize {
                content: "full  answer".to_string(),
            })
            .unwrap();

        assert_eq!(state.phase(), StreamPhase::Idle);
        assert!(state.pending_message().is_none());
        let last = state.messages().last().unwrap();
        assert_ne!(last.id, PENDING_MESSAGE_ID);
        // Exact original response, not the re-joined accumulator.
        assert_eq!(last.content, "full  answer");
        assert_eq!(last.created_at, pending_stamp);
    }

    #[test]
    fn finalize_requires_the_settling_phase() {
        let mut state = streaming("hi");
        let err = state
            .apply(SessionAction::Finalize {
                content: "too early".to_string(),
            })
            .unwrap_err();
        assert!(err.is_illegal_transition());
    }

    #[test]
    fn fail_drops_the_pending_message_and_appends_the_notice() {
        let mut state = streaming("hi");
        state
            .apply(SessionAction::Fail {
                notice: "generation failed".to_string(),
            })
            .unwrap();
        assert_eq!(state.phase(), StreamPhase::Idle);
        assert!(state.pending_message().is_none());
        assert!(!state.is_thinking());
        let last = state.messages().last().unwrap();
        assert_eq!(last.content, "generation failed");
        assert_eq!(last.role, MessageRole::Assistant);
    }

    #[test]
    fn fail_before_any_pending_message_still_recovers() {
        let mut state = submitted("hi");
        state.apply(SessionAction::BeginRequest).unwrap();
        state
            .apply(SessionAction::Fail {
                notice: "generation failed".to_string(),
            })
            .unwrap();
        assert_eq!(state.phase(), StreamPhase::Idle);
        assert_eq!(state.messages().len(), 2);
    }

    #[test]
    fn reset_discards_the_whole_session() {
        let mut state = streaming("hi");
        state.apply(SessionAction::Reset).unwrap();
        assert_eq!(state, SessionState::new());
        assert_eq!(state.user_message_count(), 0);
    }

    #[test]
    fn snapshot_reflects_thinking_and_blocked_flags() {
        let mut state = submitted("hi");
        state.apply(SessionAction::BeginRequest).unwrap();
        let snap = state.snapshot();
        assert!(snap.is_requesting);
        assert!(!snap.is_blocked);
        assert_eq!(snap.messages.len(), 1);
    }
}
