//! Session orchestration.

use crate::generator::ResponseGenerator;
use crate::registration::RegistrationGate;
use crate::stream::StreamRenderer;
use parley_core::config::EngineConfig;
use parley_core::error::Result;
use parley_core::session::{
    QUOTA_NOTICE, QuotaDecision, QuotaPolicy, SessionAction, SessionSnapshot, SessionState,
    StreamPhase,
};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time;

/// Outcome of a [`SessionController::submit`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The submission was admitted and a generation request is in
    /// flight.
    Accepted,
    /// The quota blocked the submission; the notice was appended and
    /// the registration gate was scheduled. No generator call is made.
    Blocked,
    /// The submission had no effect (empty text, or a stream already
    /// in flight).
    Ignored,
}

/// Orchestrates one conversational session.
///
/// `SessionController` is responsible for:
/// - Admitting or refusing submissions (one in flight at a time)
/// - Enforcing the quota gate before any asynchronous work
/// - Invoking the response generator and driving the stream renderer
/// - Owning every spawned task so teardown cannot leak a timer into a
///   discarded session
///
/// # Thread Safety
///
/// Session state lives behind `Arc<RwLock<_>>`; the quota check and
/// the user-message append happen under one write guard, so
/// overlapping submissions cannot race past the limit.
pub struct SessionController {
    /// Conversation state shared with the stream task.
    state: Arc<RwLock<SessionState>>,
    config: EngineConfig,
    quota: QuotaPolicy,
    generator: Arc<dyn ResponseGenerator>,
    registration: Arc<dyn RegistrationGate>,
    /// Handle of the in-flight generation/stream task, if any.
    stream_task: Mutex<Option<JoinHandle<()>>>,
    /// Handles of pending registration-gate timers.
    gate_timers: Mutex<Vec<JoinHandle<()>>>,
}

impl SessionController {
    /// Creates a controller for a fresh session.
    pub fn new(
        config: EngineConfig,
        generator: Arc<dyn ResponseGenerator>,
        registration: Arc<dyn RegistrationGate>,
    ) -> Self {
        let quota = QuotaPolicy::new(config.message_limit);
        Self {
            state: Arc::new(RwLock::new(SessionState::new())),
            config,
            quota,
            generator,
            registration,
            stream_task: Mutex::new(None),
            gate_timers: Mutex::new(Vec::new()),
        }
    }

    /// Submits a user utterance.
    ///
    /// The busy check, the user-message append, and the quota check
    /// all happen under one state lock before any asynchronous work is
    /// scheduled. A blocked submission still appends the user message
    /// and the quota notice, and re-schedules the registration gate.
    ///
    /// # Errors
    ///
    /// Only reducer invariant violations surface as errors; empty
    /// input and mid-stream submissions are reported as
    /// [`SubmitOutcome::Ignored`].
    pub async fn submit(&self, text: impl Into<String>) -> Result<SubmitOutcome> {
        let text = text.into();
        let mut state = self.state.write().await;

        if state.phase() != StreamPhase::Idle {
            tracing::debug!(target: "parley::controller", "submission ignored: stream in flight");
            return Ok(SubmitOutcome::Ignored);
        }

        match state.apply(SessionAction::Submit { text: text.clone() }) {
            Ok(()) => {}
            Err(err) if err.is_invalid_input() => {
                tracing::debug!(target: "parley::controller", "submission ignored: {err}");
                return Ok(SubmitOutcome::Ignored);
            }
            Err(err) => return Err(err),
        }

        let count = state.user_message_count();
        if self.quota.evaluate(count) == QuotaDecision::Blocked {
            state.apply(SessionAction::Block {
                notice: QUOTA_NOTICE.to_string(),
            })?;
            drop(state);
            tracing::info!(
                target: "parley::controller",
                user_messages = count,
                "quota exhausted, scheduling registration gate"
            );
            self.schedule_registration_gate().await;
            return Ok(SubmitOutcome::Blocked);
        }

        state.apply(SessionAction::BeginRequest)?;
        drop(state);
        self.spawn_stream(text).await;
        Ok(SubmitOutcome::Accepted)
    }

    /// Read-only view of the session for rendering.
    pub async fn snapshot(&self) -> SessionSnapshot {
        self.state.read().await.snapshot()
    }

    /// Whether a new submission would currently be admitted.
    pub async fn is_idle(&self) -> bool {
        self.state.read().await.phase() == StreamPhase::Idle
    }

    /// Discards the session and starts a new conversation.
    ///
    /// Any in-flight stream task and any pending registration timer
    /// are aborted first, so no continuation can mutate the reset
    /// state.
    ///
    /// # Errors
    ///
    /// Never fails in practice; `Reset` has no precondition.
    pub async fn reset(&self) -> Result<()> {
        self.abort_tasks().await;
        self.state.write().await.apply(SessionAction::Reset)
    }

    /// Waits for the in-flight stream task, if any, to run to
    /// completion or failure.
    pub async fn wait_until_idle(&self) {
        let handle = self.stream_task.lock().await.take();
        if let Some(handle) = handle {
            // Abort errors only occur on teardown; nothing to surface.
            let _ = handle.await;
        }
    }

    /// Waits for every scheduled registration-gate timer to fire.
    pub async fn wait_for_registration_gate(&self) {
        let timers = std::mem::take(&mut *self.gate_timers.lock().await);
        for handle in timers {
            let _ = handle.await;
        }
    }

    async fn spawn_stream(&self, prompt: String) {
        let generator = Arc::clone(&self.generator);
        let renderer = StreamRenderer::new(Arc::clone(&self.state), &self.config);
        let handle = tokio::spawn(async move {
            match generator.generate(&prompt).await {
                Ok(response) => {
                    if let Err(err) = renderer.reveal(response).await {
                        tracing::error!(target: "parley::stream", "stream stopped: {err}");
                    }
                }
                Err(err) => {
                    tracing::warn!(target: "parley::stream", "generation failed: {err}");
                    if let Err(err) = renderer.fail().await {
                        tracing::error!(target: "parley::stream", "failure recovery stopped: {err}");
                    }
                }
            }
        });
        *self.stream_task.lock().await = Some(handle);
    }

    async fn schedule_registration_gate(&self) {
        let gate = Arc::clone(&self.registration);
        let delay = self.config.registration_delay();
        let handle = tokio::spawn(async move {
            time::sleep(delay).await;
            gate.open().await;
        });
        let mut timers = self.gate_timers.lock().await;
        timers.retain(|t| !t.is_finished());
        timers.push(handle);
    }

    async fn abort_tasks(&self) {
        if let Some(handle) = self.stream_task.lock().await.take() {
            handle.abort();
        }
        for handle in self.gate_timers.lock().await.drain(..) {
            handle.abort();
        }
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        if let Ok(mut guard) = self.stream_task.try_lock() {
            if let Some(handle) = guard.take() {
                handle.abort();
            }
        }
        if let Ok(mut guard) = self.gate_timers.try_lock() {
            for handle in guard.drain(..) {
                handle.abort();
            }
        }
    }
}
