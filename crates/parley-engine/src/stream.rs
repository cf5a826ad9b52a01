//! Incremental reveal of a complete response.
//!
//! The generator returns the full response in one piece; the renderer
//! replays it into the session token by token on a repeating timer,
//! then finalizes after a short settle delay. The interval ticker is
//! owned by the reveal loop and dropped on every exit path.

use parley_core::config::EngineConfig;
use parley_core::session::{GENERATION_FAILURE_NOTICE, SessionAction, SessionState};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::{self, Instant};

/// Splits a response into reveal units on outer whitespace.
///
/// Interior whitespace never splits a token; runs of whitespace
/// between tokens act as a single separator.
pub(crate) fn tokenize(response: &str) -> Vec<&str> {
    response.split_whitespace().collect()
}

/// Drives the `Streaming`/`Settling` phases for one response.
pub(crate) struct StreamRenderer {
    state: Arc<RwLock<SessionState>>,
    tick_interval: Duration,
    settle_delay: Duration,
}

impl StreamRenderer {
    pub(crate) fn new(state: Arc<RwLock<SessionState>>, config: &EngineConfig) -> Self {
        Self {
            state,
            tick_interval: config.tick_interval(),
            settle_delay: config.settle_delay(),
        }
    }

    /// Reveals `response` into the session and finalizes it.
    ///
    /// Creates the pending message, ticks one token per interval (the
    /// first token lands one full interval after streaming begins),
    /// waits out the settle delay, then finalizes with the exact
    /// original string so no join or whitespace drift can creep in.
    ///
    /// # Errors
    ///
    /// Propagates reducer errors; these indicate the session was
    /// mutated out from under the stream and the task should stop.
    pub(crate) async fn reveal(&self, response: String) -> parley_core::error::Result<()> {
        self.state.write().await.apply(SessionAction::BeginStream)?;

        let tokens = tokenize(&response);
        if !tokens.is_empty() {
            let mut ticker =
                time::interval_at(Instant::now() + self.tick_interval, self.tick_interval);
            let mut rendered = String::new();
            for token in &tokens {
                ticker.tick().await;
                if !rendered.is_empty() {
                    rendered.push(' ');
                }
                rendered.push_str(token);
                self.state.write().await.apply(SessionAction::TokenTick {
                    rendered: rendered.clone(),
                })?;
            }
        }

        self.state.write().await.apply(SessionAction::Settle)?;
        time::sleep(self.settle_delay).await;
        self.state
            .write()
            .await
            .apply(SessionAction::Finalize { content: response })?;
        tracing::debug!(target: "parley::stream", "response finalized");
        Ok(())
    }

    /// Degrades a failed generation to the fixed failure notice.
    pub(crate) async fn fail(&self) -> parley_core::error::Result<()> {
        self.state.write().await.apply(SessionAction::Fail {
            notice: GENERATION_FAILURE_NOTICE.to_string(),
        })
    }
}
