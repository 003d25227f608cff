//! Digest command handler.

use anyhow::{Result, bail};
use weathereye_client::{GatewayClient, SessionOutcome};

use super::cancel_on_ctrl_c;

/// Execute the digest command.
///
/// Prints each narration event on its own line until upstream closes the
/// stream or the user presses Ctrl-C.
pub async fn execute(client: &GatewayClient, stream_url: &str) -> Result<()> {
    // Failures are reported once, through the session outcome.
    let session = client.start_digest(stream_url, |event| println!("{event}"), |_| {});
    cancel_on_ctrl_c(session.cancellation_token());

    finish(session.wait().await)
}

/// Map how the session ended to the command's result.
fn finish(outcome: SessionOutcome) -> Result<()> {
    match outcome {
        SessionOutcome::Completed => {
            eprintln!("Stream ended");
            Ok(())
        }
        SessionOutcome::Cancelled => Ok(()),
        SessionOutcome::Failed(message) => bail!("Digest failed: {message}"),
    }
}
