//! CLI entry point.

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use weathereye_cli::{Cli, Commands, handlers};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables before clap reads its `env` fallbacks
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.default_log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Serve {
            host,
            port,
            upstream_url,
            api_key,
        } => {
            let config = handlers::serve::build_config(host, port, upstream_url, api_key);
            handlers::serve::execute(config).await?;
        }
        Commands::Check {
            stream_url,
            condition,
            gateway,
        } => {
            handlers::check::execute(&gateway.client()?, &stream_url, &condition).await?;
        }
        Commands::Monitor {
            stream_url,
            condition,
            webhook_url,
            gateway,
        } => {
            handlers::monitor::execute(&gateway.client()?, &stream_url, &condition, &webhook_url)
                .await?;
        }
        Commands::Digest {
            stream_url,
            gateway,
        } => {
            handlers::digest::execute(&gateway.client()?, &stream_url).await?;
        }
    }

    Ok(())
}
