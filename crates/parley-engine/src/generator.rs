//! The opaque response-generation collaborator.

use async_trait::async_trait;
use thiserror::Error;

/// Failure reported by a [`ResponseGenerator`].
///
/// The engine treats every generator failure the same way: the
/// in-flight request is aborted and a fixed notice is appended to the
/// conversation. There is no automatic retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("response generation failed: {message}")]
pub struct GenerationError {
    message: String,
}

impl GenerationError {
    /// Creates an error with the given backend message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Produces a complete response string for a prompt.
///
/// How the response is generated is out of scope for the engine; this
/// trait is the whole contract.
#[async_trait]
pub trait ResponseGenerator: Send + Sync {
    /// Generates a complete response for the given prompt text.
    ///
    /// # Errors
    ///
    /// Returns a [`GenerationError`] when the backend fails for any
    /// reason.
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}
