//! Monitor command handler.

use anyhow::Result;
use weathereye_client::GatewayClient;

/// Execute the monitor command.
pub async fn execute(
    client: &GatewayClient,
    stream_url: &str,
    condition: &str,
    webhook_url: &str,
) -> Result<()> {
    let handle = client
        .start_monitor(stream_url, condition, webhook_url)
        .await?;
    println!("Job {} ({})", handle.job_id, handle.status);
    println!("Notifications go to {webhook_url}");
    Ok(())
}
