//! Cancellable digest streaming sessions.
//!
//! A session is one spawned read loop plus the [`CancellationToken`] that
//! aborts it. Cancelling drops the in-flight response, which closes the
//! connection; it is never reported through the error callback.

use std::fmt;

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use reqwest::RequestBuilder;
use serde_json::Value;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use weathereye_core::ErrorField;

use crate::sse::SseLineDecoder;

/// How a digest session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Upstream closed the stream.
    Completed,
    /// The caller stopped the session.
    Cancelled,
    /// The stream failed; the message was passed to the error callback.
    Failed(String),
}

impl fmt::Display for SessionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => write!(f, "Completed"),
            Self::Cancelled => write!(f, "Cancelled"),
            Self::Failed(message) => write!(f, "Failed: {message}"),
        }
    }
}

/// Handle to a running digest stream.
///
/// Dropping the handle stops the session.
#[must_use = "dropping a DigestSession stops the stream"]
pub struct DigestSession {
    cancel: CancellationToken,
    /// Set once by the read loop when it ends.
    outcome: watch::Receiver<Option<SessionOutcome>>,
}

impl DigestSession {
    /// Spawn the read loop for `request` and return its handle at once.
    ///
    /// Must be called from within a Tokio runtime.
    pub(crate) fn spawn<M, E>(request: RequestBuilder, on_message: M, on_error: E) -> Self
    where
        M: FnMut(String) + Send + 'static,
        E: FnOnce(String) + Send + 'static,
    {
        // The token exists before any I/O so the caller can always stop.
        let cancel = CancellationToken::new();
        let (outcome_tx, outcome) = watch::channel(None);

        let token = cancel.clone();
        tokio::spawn(async move {
            let outcome = run_session(request, token, on_message, on_error).await;
            let _ = outcome_tx.send(Some(outcome));
        });

        Self { cancel, outcome }
    }

    /// Abort the stream. Safe to call any number of times.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// Clone of the session's cancellation token.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Whether the read loop has ended.
    pub fn is_finished(&self) -> bool {
        // A closed channel without an outcome means the task died.
        self.outcome.borrow().is_some() || self.outcome.has_changed().is_err()
    }

    /// Wait for the read loop to end. Any number of callers may wait.
    pub async fn wait(&self) -> SessionOutcome {
        wait_outcome(self.subscribe()).await
    }

    /// Receiver that observes the session's outcome without owning it.
    pub(crate) fn subscribe(&self) -> watch::Receiver<Option<SessionOutcome>> {
        self.outcome.clone()
    }
}

impl Drop for DigestSession {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl fmt::Debug for DigestSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DigestSession")
            .field("cancelled", &self.cancel.is_cancelled())
            .field("finished", &self.is_finished())
            .finish()
    }
}

/// Wait until a session publishes its outcome.
pub(crate) async fn wait_outcome(
    mut outcome: watch::Receiver<Option<SessionOutcome>>,
) -> SessionOutcome {
    match outcome.wait_for(Option::is_some).await {
        Ok(published) => (*published)
            .clone()
            .unwrap_or_else(|| SessionOutcome::Failed("Digest task ended".to_string())),
        Err(_) => SessionOutcome::Failed("Digest task ended without an outcome".to_string()),
    }
}

/// Drive one session to its end and fire at most one terminal callback.
async fn run_session<M, E>(
    request: RequestBuilder,
    cancel: CancellationToken,
    mut on_message: M,
    on_error: E,
) -> SessionOutcome
where
    M: FnMut(String) + Send,
    E: FnOnce(String) + Send,
{
    let outcome = tokio::select! {
        biased;
        () = cancel.cancelled() => SessionOutcome::Cancelled,
        outcome = open_and_read(request, &mut on_message) => outcome,
    };

    match &outcome {
        SessionOutcome::Completed => info!("Digest stream closed by upstream"),
        SessionOutcome::Cancelled => debug!("Digest stream stopped by caller"),
        SessionOutcome::Failed(message) => {
            warn!("Digest stream failed: {message}");
            on_error(message.clone());
        }
    }
    outcome
}

/// Send the request, reject failed statuses, then pump the body.
async fn open_and_read<M>(request: RequestBuilder, on_message: &mut M) -> SessionOutcome
where
    M: FnMut(String) + Send,
{
    let response = match request.send().await {
        Ok(response) => response,
        Err(e) => return SessionOutcome::Failed(e.to_string()),
    };

    let status = response.status();
    if !status.is_success() {
        let message = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|body| error_message(&body))
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
        return SessionOutcome::Failed(message);
    }

    debug!("Digest stream open");
    pump_events(response.bytes_stream(), on_message).await
}

/// Feed every chunk through a fresh decoder, delivering events as lines
/// complete. The next chunk is not awaited until the callback has seen every
/// event of the current one.
pub(crate) async fn pump_events<S, E, M>(stream: S, on_message: &mut M) -> SessionOutcome
where
    S: Stream<Item = Result<Bytes, E>>,
    E: fmt::Display,
    M: FnMut(String),
{
    let mut decoder = SseLineDecoder::new();
    let mut stream = std::pin::pin!(stream);

    while let Some(chunk) = stream.next().await {
        match chunk {
            Ok(bytes) => {
                for event in decoder.feed(&bytes) {
                    on_message(event);
                }
            }
            Err(e) => return SessionOutcome::Failed(e.to_string()),
        }
    }

    if decoder.pending() > 0 {
        debug!(
            pending = decoder.pending(),
            "Discarding unterminated line at end of stream"
        );
    }
    SessionOutcome::Completed
}

/// Message from the `error` field of a gateway body, if there is one.
pub(crate) fn error_message(body: &Value) -> Option<String> {
    body.get("error")
        .filter(|e| !e.is_null())
        .map(|e| ErrorField::from_value(e.clone()).message())
}
