//! Command dispatch.

mod args;
mod config;
mod render;
mod watch;

use clap::Parser;
use taskboard_core::config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use args::{Cli, Commands};

/// Parse arguments and run the selected command.
pub fn run_cli() {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskboard=info,taskboard_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };

    let ok = match cli.command {
        Commands::Watch {
            project,
            name,
            local,
            filter,
        } => watch::handle_watch(config, project, name, local, filter),
        Commands::Config {
            project,
            name,
            server,
            local_url,
            use_local,
            interval,
            show,
        } => config::handle_config(
            &config,
            config::ConfigChanges {
                project,
                name,
                server,
                local_url,
                use_local,
                interval,
            },
            show,
        ),
    };

    if !ok {
        std::process::exit(1);
    }
}
