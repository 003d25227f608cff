//! Check command handler.

use anyhow::Result;
use weathereye_client::{GatewayClient, SingleCheckResult};

/// Execute the check command.
pub async fn execute(client: &GatewayClient, stream_url: &str, condition: &str) -> Result<()> {
    let result = client.check_once(stream_url, condition).await?;
    println!("{}", render(condition, &result));
    Ok(())
}

fn render(condition: &str, result: &SingleCheckResult) -> String {
    let verdict = if result.triggered { "YES" } else { "NO" };
    format!(
        "{condition}: {verdict}\n{}\n({} ms)",
        result.explanation, result.latency_ms
    )
}
