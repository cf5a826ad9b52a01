//! The registration-gate collaborator.

use async_trait::async_trait;

/// Opens the registration flow when the free quota is exhausted.
///
/// Fire and forget: the engine consumes no return value, and the gate
/// is re-opened on every blocked submission rather than de-duplicated.
#[async_trait]
pub trait RegistrationGate: Send + Sync {
    /// Opens the registration flow.
    async fn open(&self);
}
