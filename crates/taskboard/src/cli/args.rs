//! Command-line arguments.

use clap::{Parser, Subcommand};

/// Follow a shared task board from the terminal.
#[derive(Debug, Parser)]
#[command(name = "taskboard", version, about)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Connect to the relay and print the board as it changes.
    Watch {
        /// Project to follow (defaults to the saved project).
        #[arg(short, long, env = "TASKBOARD_PROJECT")]
        project: Option<String>,

        /// Name announced to other members (defaults to the saved name).
        #[arg(short, long, env = "TASKBOARD_MEMBER")]
        name: Option<String>,

        /// Use the local development relay for this run.
        #[arg(long)]
        local: bool,

        /// Only show tasks whose title or description contains this text.
        #[arg(short, long, default_value = "")]
        filter: String,
    },

    /// Show or change saved settings.
    Config {
        /// Project to follow by default.
        #[arg(long)]
        project: Option<String>,

        /// Member name to announce.
        #[arg(long)]
        name: Option<String>,

        /// Remote relay URL.
        #[arg(long)]
        server: Option<String>,

        /// Local development relay URL.
        #[arg(long)]
        local_url: Option<String>,

        /// Prefer the local relay (`true`/`false`).
        #[arg(long)]
        use_local: Option<bool>,

        /// Seconds between reconnect attempts.
        #[arg(long)]
        interval: Option<u64>,

        /// Show the current configuration.
        #[arg(long)]
        show: bool,
    },
}
