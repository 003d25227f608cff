//! Root CLI parser and global options.

use clap::Parser;

use crate::commands::Commands;

/// Command-line interface for the WeatherEye gateway.
#[derive(Parser)]
#[command(name = "weathereye")]
#[command(about = "Run and query the WeatherEye video-analysis gateway")]
#[command(version)]
pub struct Cli {
    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Default log filter when `RUST_LOG` is unset.
    pub const fn default_log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}
