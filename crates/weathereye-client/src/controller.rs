//! Single-session owner for digest streams.
//!
//! UI code that renders one narration feed should go through a
//! [`DigestController`] rather than holding sessions directly: it refuses a
//! second start while a stream is live, so two read loops never append to
//! the same display.

use std::fmt;

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::client::GatewayClient;
use crate::digest::{DigestSession, SessionOutcome, wait_outcome};
use crate::error::{BrokerError, BrokerResult};

/// State of the controller's session slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestStatus {
    /// No session has been started, or the last one was stopped.
    Idle,
    /// A session is reading.
    Streaming,
    /// The last session ended on its own and has not been replaced.
    Finished,
}

impl fmt::Display for DigestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Streaming => write!(f, "Streaming"),
            Self::Finished => write!(f, "Finished"),
        }
    }
}

/// Owns at most one live digest session.
///
/// The session stays in the slot until it is stopped or replaced, so
/// waiting on it never frees the slot for a second reader.
///
/// # Example
///
/// ```ignore
/// let controller = DigestController::new(client);
/// controller.start(url, |event| println!("{event}"), |err| eprintln!("{err}")).await?;
/// let second = controller.start(url, |_| {}, |_| {}).await;
/// assert!(matches!(second, Err(BrokerError::SessionActive)));
/// controller.stop().await?;
/// ```
pub struct DigestController {
    client: GatewayClient,
    /// Internal state protected by async mutex.
    state: Mutex<SlotState>,
}

#[derive(Default)]
struct SlotState {
    /// Bumped on every start; lets `stop` tell its session from a newer one.
    generation: u64,
    session: Option<DigestSession>,
}

impl DigestController {
    /// Create a controller with an empty session slot.
    pub fn new(client: GatewayClient) -> Self {
        Self {
            client,
            state: Mutex::new(SlotState::default()),
        }
    }

    /// Start a session unless one is still streaming.
    ///
    /// A session that already ended on its own is replaced.
    pub async fn start<M, E>(
        &self,
        stream_url: &str,
        on_message: M,
        on_error: E,
    ) -> BrokerResult<()>
    where
        M: FnMut(String) + Send + 'static,
        E: FnOnce(String) + Send + 'static,
    {
        let mut state = self.state.lock().await;

        if state.session.as_ref().is_some_and(|s| !s.is_finished()) {
            debug!("Refusing to start a second digest session");
            return Err(BrokerError::SessionActive);
        }

        state.generation += 1;
        state.session = Some(self.client.start_digest(stream_url, on_message, on_error));
        info!(stream_url, generation = state.generation, "Digest session started");
        Ok(())
    }

    /// Stop the current session and wait for its read loop to exit.
    ///
    /// The slot is cleared once the loop has ended. A session that had
    /// already finished reports its own outcome rather than `Cancelled`.
    pub async fn stop(&self) -> BrokerResult<SessionOutcome> {
        let (generation, outcome) = {
            let state = self.state.lock().await;
            let session = state
                .session
                .as_ref()
                .ok_or(BrokerError::NoActiveSession)?;
            session.stop();
            (state.generation, session.subscribe())
        };

        let outcome = wait_outcome(outcome).await;

        let mut state = self.state.lock().await;
        if state.generation == generation {
            state.session = None;
        }
        info!(outcome = %outcome, "Digest session stopped");
        Ok(outcome)
    }

    /// Wait for the current session to end.
    ///
    /// The session stays in the slot, so it can still be stopped meanwhile
    /// and a new start is refused until it has ended.
    pub async fn wait(&self) -> BrokerResult<SessionOutcome> {
        let outcome = self
            .state
            .lock()
            .await
            .session
            .as_ref()
            .map(DigestSession::subscribe)
            .ok_or(BrokerError::NoActiveSession)?;

        Ok(wait_outcome(outcome).await)
    }

    /// Current state of the session slot.
    pub async fn status(&self) -> DigestStatus {
        match self.state.lock().await.session.as_ref() {
            None => DigestStatus::Idle,
            Some(session) if session.is_finished() => DigestStatus::Finished,
            Some(_) => DigestStatus::Streaming,
        }
    }
}

impl fmt::Debug for DigestController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DigestController")
            .field("gateway_url", &self.client.config().gateway_url())
            .finish_non_exhaustive()
    }
}
