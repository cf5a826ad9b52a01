//! Domain layer for the parley conversational session engine.
//!
//! This crate owns everything that can be described without a runtime:
//! conversation messages, the session state and its reducer, the
//! free-tier quota policy, engine configuration, and the shared error
//! type. The async orchestration lives in `parley-engine`.

pub mod config;
pub mod error;
pub mod session;

// Re-export common error type
pub use error::ParleyError;
