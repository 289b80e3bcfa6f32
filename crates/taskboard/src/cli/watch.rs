//! `taskboard watch`: follow the board until interrupted.
//!
//! Reads simple commands from stdin while connected:
//! `connect`, `disconnect`, `project <id> [name]`, `filter [text]`,
//! `status`, `quit`.

use std::sync::Arc;

use taskboard_core::config::Config;
use taskboard_core::session::Session;
use taskboard_core::sync::{BoardClient, BoardClientConfig, BoardHandle, TokioConnector};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::render::TerminalView;

/// A line typed by the user.
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Connect,
    Disconnect,
    Project { id: String, name: Option<String> },
    Filter(String),
    Status,
    Quit,
    Help,
}

impl Input {
    fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();
        match word {
            "" => None,
            "connect" => Some(Self::Connect),
            "disconnect" => Some(Self::Disconnect),
            "project" => {
                let (id, name) = rest.split_once(' ').unwrap_or((rest, ""));
                let name = name.trim();
                Some(Self::Project {
                    id: id.to_string(),
                    name: (!name.is_empty()).then(|| name.to_string()),
                })
            }
            "filter" => Some(Self::Filter(rest.to_string())),
            "status" => Some(Self::Status),
            "quit" | "exit" => Some(Self::Quit),
            _ => Some(Self::Help),
        }
    }
}

const HELP: &str = "Commands: connect | disconnect | project <id> [name] | filter [text] | status | quit";

/// Handle the watch command. Returns `false` on failure.
pub fn handle_watch(
    mut config: Config,
    project: Option<String>,
    name: Option<String>,
    local: bool,
    filter: String,
) -> bool {
    if local {
        config.use_local = true;
    }
    if project.is_some() {
        config.project_id = project;
    }
    if name.is_some() {
        config.member_name = name;
    }

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create Tokio runtime: {}", e);
            return false;
        }
    };

    match runtime.block_on(run_watch(config, filter)) {
        Ok(()) => true,
        Err(e) => {
            eprintln!("Error: {}", e);
            false
        }
    }
}

async fn run_watch(mut config: Config, filter: String) -> taskboard_core::Result<()> {
    let client_config = BoardClientConfig::from_config(&config)?;
    let session = Session::new(
        config.project_id.clone().unwrap_or_default(),
        config.member_name.clone().unwrap_or_default(),
        config.platform.clone(),
    );

    println!("Watching task board...");
    println!("  Relay: {}", client_config.endpoint);
    println!("  Project: {}", display_or_none(session.project_id()));
    println!("  Member: {}", display_or_none(session.member_name()));
    println!("  {}", HELP);
    println!();

    let view = Arc::new(TerminalView::new(filter));
    let (client, handle) =
        BoardClient::new(client_config, session, TokioConnector, view.clone());
    let client_task = tokio::spawn(client.run());
    handle.connect();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    // stdin closed: keep watching until ctrl-c.
                    Ok(None) => {
                        let _ = tokio::signal::ctrl_c().await;
                        break;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to read stdin: {}", e);
                        let _ = tokio::signal::ctrl_c().await;
                        break;
                    }
                };
                let Some(input) = Input::parse(&line) else {
                    continue;
                };
                if input == Input::Quit {
                    break;
                }
                apply_input(input, &handle, &view, &mut config).await;
            }
        }
    }

    println!("Shutting down...");
    handle.shutdown();
    if let Err(e) = client_task.await {
        tracing::error!("Board client task failed: {}", e);
    }
    println!("Watch stopped.");
    Ok(())
}

async fn apply_input(input: Input, handle: &BoardHandle, view: &TerminalView, config: &mut Config) {
    match input {
        Input::Connect => handle.connect(),
        Input::Disconnect => handle.disconnect(),
        Input::Project { id, name } => {
            let name = name.or_else(|| config.member_name.clone()).unwrap_or_default();
            handle.switch_project(id.clone(), name.clone());

            config.project_id = (!id.is_empty()).then_some(id);
            config.member_name = (!name.is_empty()).then_some(name);
            if let Err(e) = config.save() {
                tracing::warn!("Failed to remember project selection: {}", e);
            }
        }
        Input::Filter(text) => view.set_filter(text),
        Input::Status => match handle.snapshot().await {
            Some(snapshot) => {
                println!(
                    "{} | project {} | client {} | {} tasks | editor {}{}",
                    snapshot.connection,
                    display_or_none(snapshot.session.project_id()),
                    snapshot.session.client_id(),
                    snapshot.board.tasks.len(),
                    if snapshot.board.editor_online {
                        "online"
                    } else {
                        "offline"
                    },
                    if snapshot.reconnect_scheduled {
                        " | retrying"
                    } else {
                        ""
                    }
                );
            }
            None => println!("Client is not running."),
        },
        Input::Help => println!("{}", HELP),
        Input::Quit => {}
    }
}

fn display_or_none(value: &str) -> &str {
    if value.is_empty() { "(none)" } else { value }
}
