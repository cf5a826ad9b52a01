//! Session domain module.
//!
//! This module contains the conversation state for a single assistant
//! session and the rules for mutating it.
//!
//! # Module Structure
//!
//! - `message`: Conversation message types (`MessageRole`, `ChatMessage`)
//! - `action`: Discrete actions applied to the session (`SessionAction`)
//! - `state`: Session state, reducer, and UI snapshot (`SessionState`)
//! - `quota`: Free-tier admission policy (`QuotaPolicy`)

mod action;
mod message;
mod quota;
mod state;

// Re-export public API
pub use action::SessionAction;
pub use message::{
    ChatMessage, GENERATION_FAILURE_NOTICE, MessageRole, PENDING_MESSAGE_ID, QUOTA_NOTICE,
};
pub use quota::{QuotaDecision, QuotaPolicy};
pub use state::{SessionSnapshot, SessionState, StreamPhase};
