//! Error types for the parley engine.

use thiserror::Error;

/// A shared error type for the parley crates.
///
/// This provides typed, structured error variants with automatic
/// conversion from common error types via the `From` trait.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParleyError {
    /// The submitted input was rejected before any state change
    /// (empty or whitespace-only text).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A session action was applied in a phase that does not admit it.
    /// This includes submitting while a stream is already in flight.
    #[error("illegal session transition: {action} while {phase}")]
    IllegalTransition {
        phase: &'static str,
        action: &'static str,
    },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("internal error: {0}")]
    Internal(String),
}

impl ParleyError {
    /// Creates an InvalidInput error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is an InvalidInput error
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    /// Check if this is an IllegalTransition error
    pub fn is_illegal_transition(&self) -> bool {
        matches!(self, Self::IllegalTransition { .. })
    }
}

impl From<toml::de::Error> for ParleyError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// A type alias for `Result<T, ParleyError>`.
pub type Result<T> = std::result::Result<T, ParleyError>;
