//! Scribe application binary - composition root.
//!
//! One executable, two bot front-ends selected on the command line:
//! - `scribe brief`: the feature-brief bot (sessions, voice notes, Markdown
//!   briefs)
//! - `scribe time`: the server-time bot
//!
//! Both read credentials from the environment and talk to Telegram via
//! long polling.

mod brief;
mod cli;
mod timebot;

use clap::Parser;

use scribe_core::config::ScribeConfig;

use crate::cli::{Cli, Mode};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting Scribe v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();

    // Config. A missing credential is fatal at startup, never at runtime.
    let config = match ScribeConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Configuration error");
            return Err(e.into());
        }
    };

    match cli.mode {
        Mode::Brief => brief::run(config).await?,
        Mode::Time => timebot::run(config).await?,
    }

    Ok(())
}
