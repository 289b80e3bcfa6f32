//! Board client: the single owner of session, connection and board state.
//!
//! `BoardClient` runs as one task. User actions arrive through a cloneable
//! [`BoardHandle`]; socket reports and retry ticks arrive on an internal
//! channel. Each event is handled to completion before the next one, so the
//! store and presence roster are never observed mid-update.
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use taskboard_core::config::Config;
//! use taskboard_core::session::Session;
//! use taskboard_core::sync::{BoardClient, BoardClientConfig, TokioConnector};
//!
//! let config = Config::load()?;
//! let session = Session::new("P1", "Ada", &config.platform);
//! let (client, handle) = BoardClient::new(
//!     BoardClientConfig::from_config(&config)?,
//!     session,
//!     TokioConnector,
//!     Arc::new(|event| println!("{event:?}")),
//! );
//! tokio::spawn(client.run());
//! handle.connect();
//! ```

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, oneshot};

use super::connection::{ConnectionManager, InternalEvent, SocketOutcome};
use super::envelope::OutgoingEnvelope;
use super::events::{BoardEvent, BoardEventHandler, ConnectionState};
use super::presence::PresenceEntry;
use super::router::{BoardState, MessageRouter};
use super::store::SyncSnapshot;
use super::transport::TransportConnector;
use crate::config::Config;
use crate::error::ConfigError;
use crate::session::Session;

/// Status line shown when there is no project to sync.
pub const SELECT_PROJECT_MESSAGE: &str = "Select a project to start syncing.";

/// Configuration for the board client.
#[derive(Debug, Clone)]
pub struct BoardClientConfig {
    /// Relay WebSocket URL.
    pub endpoint: String,
    /// Fixed interval between reconnect attempts.
    pub reconnect_interval: Duration,
}

impl BoardClientConfig {
    /// Endpoint and retry interval from persisted [`Config`].
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            endpoint: config.endpoint()?,
            reconnect_interval: config.reconnect_interval(),
        })
    }
}

/// Point-in-time copy of everything the client holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSnapshot {
    /// Current session identity.
    pub session: Session,
    /// Connection state.
    pub connection: ConnectionState,
    /// Whether a retry timer is live.
    pub reconnect_scheduled: bool,
    /// Board contents and editor liveness.
    pub board: SyncSnapshot,
    /// Other connected clients.
    pub others: Vec<PresenceEntry>,
    /// When the board was last replaced.
    pub last_synced_at: Option<DateTime<Utc>>,
}

enum Command {
    Connect,
    Disconnect,
    SwitchProject {
        project_id: String,
        member_name: String,
    },
    Snapshot(oneshot::Sender<ClientSnapshot>),
    Shutdown,
}

/// Cloneable handle for driving a running [`BoardClient`].
///
/// All methods are fire-and-forget except [`BoardHandle::snapshot`].
/// Once the client has stopped, commands are silently dropped.
#[derive(Clone)]
pub struct BoardHandle {
    commands: mpsc::UnboundedSender<Command>,
}

impl BoardHandle {
    /// Connect, unless already connected. Always allowed from `Error`.
    pub fn connect(&self) {
        self.send(Command::Connect);
    }

    /// Stop retrying and close the connection.
    pub fn disconnect(&self) {
        self.send(Command::Disconnect);
    }

    /// Select another project (or none, with an empty id).
    pub fn switch_project(&self, project_id: impl Into<String>, member_name: impl Into<String>) {
        self.send(Command::SwitchProject {
            project_id: project_id.into(),
            member_name: member_name.into(),
        });
    }

    /// Stop the client, closing any connection.
    pub fn shutdown(&self) {
        self.send(Command::Shutdown);
    }

    /// Current client state, or `None` once the client has stopped.
    pub async fn snapshot(&self) -> Option<ClientSnapshot> {
        let (tx, rx) = oneshot::channel();
        self.commands.send(Command::Snapshot(tx)).ok()?;
        rx.await.ok()
    }

    /// Whether the client is still running.
    pub fn is_running(&self) -> bool {
        !self.commands.is_closed()
    }

    fn send(&self, command: Command) {
        if self.commands.send(command).is_err() {
            log::debug!("[BoardHandle] Client stopped; command dropped");
        }
    }
}

/// Live, project-scoped view of the shared task board.
pub struct BoardClient<C: TransportConnector> {
    session: Session,
    connection: ConnectionManager<C>,
    router: MessageRouter,
    state: BoardState,
    handler: Arc<dyn BoardEventHandler>,
    commands: mpsc::UnboundedReceiver<Command>,
    internal: mpsc::UnboundedReceiver<InternalEvent>,
}

impl<C: TransportConnector> BoardClient<C> {
    /// Create a client in `Disconnected` and a handle to drive it.
    ///
    /// Nothing happens until [`BoardClient::run`] is polled and
    /// [`BoardHandle::connect`] is called.
    pub fn new(
        config: BoardClientConfig,
        session: Session,
        connector: C,
        handler: Arc<dyn BoardEventHandler>,
    ) -> (Self, BoardHandle) {
        let (commands_tx, commands) = mpsc::unbounded_channel();
        let (internal_tx, internal) = mpsc::unbounded_channel();
        let connection = ConnectionManager::new(
            Arc::new(connector),
            config.endpoint,
            config.reconnect_interval,
            internal_tx,
        );

        let client = Self {
            session,
            connection,
            router: MessageRouter::new(),
            state: BoardState::new(),
            handler,
            commands,
            internal,
        };
        (
            client,
            BoardHandle {
                commands: commands_tx,
            },
        )
    }

    /// Process events until shut down or every handle is dropped.
    pub async fn run(mut self) {
        log::info!(
            "[BoardClient] Started (client {}, project {:?})",
            self.session.client_id(),
            self.session.project_id()
        );

        loop {
            tokio::select! {
                biased;
                command = self.commands.recv() => match command {
                    Some(Command::Shutdown) | None => break,
                    Some(command) => self.handle_command(command),
                },
                Some(event) = self.internal.recv() => self.handle_internal(event),
            }
        }

        let state = self.connection.disconnect();
        self.emit_state(state);
        log::info!("[BoardClient] Client loop exited");
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Connect => {
                let state = self.connection.connect();
                self.emit_state(state);
            }
            Command::Disconnect => {
                let state = self.connection.disconnect();
                self.emit_state(state);
            }
            Command::SwitchProject {
                project_id,
                member_name,
            } => self.switch_project(project_id, member_name),
            Command::Snapshot(reply) => {
                let _ = reply.send(self.snapshot());
            }
            Command::Shutdown => {}
        }
    }

    fn handle_internal(&mut self, event: InternalEvent) {
        match event {
            InternalEvent::ReconnectTick(ticket) => {
                let state = self.connection.handle_tick(ticket);
                self.emit_state(state);
            }
            InternalEvent::Socket { socket, event } => {
                match self.connection.handle_socket(socket, event) {
                    SocketOutcome::Opened => {
                        self.emit_state(Some(ConnectionState::Connected));
                        self.announce();
                    }
                    SocketOutcome::Frame(frame) => {
                        for event in self.router.route(&frame, &self.session, &mut self.state) {
                            self.handler.on_event(event);
                        }
                    }
                    SocketOutcome::StateChanged(state) => self.emit_state(Some(state)),
                    SocketOutcome::None => {}
                }
            }
        }
    }

    /// Join and request a snapshot for the current project, or ask for one.
    fn announce(&mut self) {
        if !self.session.has_project() {
            log::info!("[BoardClient] No project selected; not requesting sync");
            self.emit(BoardEvent::StatusMessage(SELECT_PROJECT_MESSAGE.to_string()));
            return;
        }

        let mut outgoing = Vec::with_capacity(2);
        if !self.session.member_name().is_empty() {
            outgoing.push(OutgoingEnvelope::member_join(&self.session));
        }
        outgoing.push(OutgoingEnvelope::request_sync(&self.session));

        for envelope in outgoing {
            if let Err(e) = self.connection.send(envelope.to_frame()) {
                log::error!("[BoardClient] Failed to send {}: {}", envelope.kind, e);
                return;
            }
        }
        log::info!(
            "[BoardClient] Requested sync for project {}",
            self.session.project_id()
        );
    }

    fn switch_project(&mut self, project_id: String, member_name: String) {
        let changed = self.session.switch_project(project_id, member_name);

        if changed {
            log::info!(
                "[BoardClient] Switched to project {:?}",
                self.session.project_id()
            );
            let was_online = self.state.store.editor_online();
            self.state.clear();
            self.emit(BoardEvent::BoardChanged {
                tasks: Vec::new(),
                cached: false,
            });
            self.emit(BoardEvent::PresenceChanged(Vec::new()));
            if was_online {
                self.emit(BoardEvent::EditorLivenessChanged(false));
            }
        }

        if self.connection.is_open() {
            self.announce();
        } else if !self.session.has_project() {
            self.emit(BoardEvent::StatusMessage(SELECT_PROJECT_MESSAGE.to_string()));
        }
    }

    fn snapshot(&self) -> ClientSnapshot {
        ClientSnapshot {
            session: self.session.clone(),
            connection: self.connection.state(),
            reconnect_scheduled: self.connection.reconnect_scheduled(),
            board: self.state.store.snapshot().clone(),
            others: self.state.presence.others().to_vec(),
            last_synced_at: self.state.store.last_synced_at(),
        }
    }

    fn emit_state(&self, state: Option<ConnectionState>) {
        if let Some(state) = state {
            self.emit(BoardEvent::ConnectionStateChanged {
                state,
                display_endpoint: state.display_endpoint(self.connection.endpoint()),
            });
        }
    }

    fn emit(&self, event: BoardEvent) {
        self.handler.on_event(event);
    }
}
