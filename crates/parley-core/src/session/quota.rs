//! Free-tier admission policy.

use serde::{Deserialize, Serialize};

/// Outcome of a quota check for one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuotaDecision {
    /// The submission may proceed to generation.
    Allowed,
    /// The submission is blocked; the session requires registration.
    Blocked,
}

/// Admission policy for user submissions.
///
/// The limit is monotonic: once a session is exhausted it stays
/// exhausted until the whole session is reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaPolicy {
    /// Maximum number of user messages before registration is
    /// required.
    pub limit: u32,
}

impl QuotaPolicy {
    /// Creates a policy with the given message limit.
    pub fn new(limit: u32) -> Self {
        Self { limit }
    }

    /// Evaluates admission for a submission.
    ///
    /// `user_message_count` must already include the message being
    /// submitted, and the call must happen synchronously at submit
    /// time, before any asynchronous work is scheduled, so overlapping
    /// submissions cannot race past the limit.
    pub fn evaluate(&self, user_message_count: u32) -> QuotaDecision {
        if user_message_count >= self.limit {
            QuotaDecision::Blocked
        } else {
            QuotaDecision::Allowed
        }
    }
}
