//! Command-line interface.

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "scribe", version, about = "Telegram bots for feature briefs and server time")]
pub struct Cli {
    #[command(subcommand)]
    pub mode: Mode,
}

/// Which bot front-end to run.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum Mode {
    /// Run the feature-brief bot (dialogue, voice notes, Markdown briefs).
    Brief,
    /// Run the server-time bot (replies to any message with the current time).
    Time,
}
