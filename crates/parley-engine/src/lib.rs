//! Orchestration layer for the parley conversational session engine.
//!
//! This crate drives the domain state in `parley-core`: it accepts
//! submissions, enforces the quota gate, invokes the opaque response
//! generator, and reveals the response incrementally on a timer. The
//! UI collaborator only calls [`SessionController::submit`] and reads
//! [`SessionSnapshot`](parley_core::session::SessionSnapshot)s.

mod controller;
mod generator;
mod registration;
mod stream;

pub use controller::{SessionController, SubmitOutcome};
pub use generator::{GenerationError, ResponseGenerator};
pub use registration::RegistrationGate;
