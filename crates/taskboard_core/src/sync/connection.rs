//! Connection lifecycle state machine.
//!
//! `ConnectionManager` owns at most one socket and at most one retry timer.
//! Each socket runs in its own task and reports back over the client's
//! internal channel, tagged with a [`SocketId`]; events from a socket that
//! has since been replaced or detached are ignored.
//!
//! ```text
//!                 connect()
//!  Disconnected ─────────────▶ Connecting ──open──▶ Connected
//!       ▲  ▲                      │  ▲                  │
//!       │  └───────close──────────┘  │ connect()        │ close
//!       │                            │                  ▼
//!       │        disconnect()      Error ◀──error── (any socket)
//!       └──────────────────────────────
//! ```
//!
//! Two rules are easy to break:
//! - An error is never downgraded to `Disconnected` by the close that follows it.
//! - `disconnect()` cancels the retry timer and detaches the socket first, so
//!   the resulting close cannot schedule another attempt.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::events::ConnectionState;
use super::reconnect::{ReconnectPolicy, ReconnectTicket};
use super::transport::{SyncTransport, TransportConnector, TransportError, WsMessage};

/// Identifies one socket for the lifetime of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SocketId(u64);

/// Something a socket task observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocketEvent {
    /// The connection is open.
    Opened,
    /// A text frame arrived.
    Frame(String),
    /// The socket failed. Always followed by `Closed`.
    Failed(TransportError),
    /// The socket is gone.
    Closed,
}

/// Events produced inside the client: socket reports and timer ticks.
#[derive(Debug)]
pub enum InternalEvent {
    /// Report from a socket task.
    Socket {
        /// Which socket.
        socket: SocketId,
        /// What happened.
        event: SocketEvent,
    },
    /// The retry timer fired.
    ReconnectTick(ReconnectTicket),
}

/// What the owner has to do after a socket event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocketOutcome {
    /// The current socket just opened; state is now `Connected`.
    Opened,
    /// A frame from the current socket, ready for routing.
    Frame(String),
    /// The state changed to this.
    StateChanged(ConnectionState),
    /// Nothing to do.
    None,
}

enum Outbound {
    Frame(String),
    Close,
}

struct SocketHandle {
    id: SocketId,
    open: bool,
    outgoing: mpsc::UnboundedSender<Outbound>,
    task: JoinHandle<()>,
}

impl SocketHandle {
    /// Close gracefully when open, otherwise abort the pending connect.
    fn shut_down(self) {
        if self.open {
            let _ = self.outgoing.send(Outbound::Close);
        } else {
            self.task.abort();
        }
    }
}

/// Runs the connection state machine for one relay endpoint.
pub struct ConnectionManager<C: TransportConnector> {
    connector: Arc<C>,
    endpoint: String,
    interval: Duration,
    state: ConnectionState,
    socket: Option<SocketHandle>,
    next_socket: u64,
    reconnect: ReconnectPolicy,
    events: mpsc::UnboundedSender<InternalEvent>,
}

impl<C: TransportConnector> ConnectionManager<C> {
    /// New manager in `Disconnected`. Socket and timer reports go to `events`.
    pub fn new(
        connector: Arc<C>,
        endpoint: impl Into<String>,
        interval: Duration,
        events: mpsc::UnboundedSender<InternalEvent>,
    ) -> Self {
        Self {
            connector,
            endpoint: endpoint.into(),
            interval,
            state: ConnectionState::Disconnected,
            socket: None,
            next_socket: 0,
            reconnect: ReconnectPolicy::new(),
            events,
        }
    }

    /// Current state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Relay endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Whether a socket exists and is open.
    pub fn is_open(&self) -> bool {
        self.socket.as_ref().is_some_and(|s| s.open)
    }

    /// Whether a retry timer is live.
    pub fn reconnect_scheduled(&self) -> bool {
        self.reconnect.is_scheduled()
    }

    /// Open a new socket unless one is already open.
    ///
    /// Any socket still connecting is replaced. The retry timer keeps
    /// running until the new socket opens. Returns the new state when the
    /// call started a connection.
    pub fn connect(&mut self) -> Option<ConnectionState> {
        if self.is_open() {
            return None;
        }
        if let Some(previous) = self.socket.take() {
            previous.shut_down();
        }

        self.next_socket += 1;
        let id = SocketId(self.next_socket);
        let (outgoing, outgoing_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_socket(
            Arc::clone(&self.connector),
            self.endpoint.clone(),
            id,
            outgoing_rx,
            self.events.clone(),
        ));
        self.socket = Some(SocketHandle {
            id,
            open: false,
            outgoing,
            task,
        });

        log::info!("[ConnectionManager] Connecting to {}", self.endpoint);
        self.state = ConnectionState::Connecting;
        Some(self.state)
    }

    /// Cancel the retry timer and close the socket.
    ///
    /// The socket is detached before it closes, so its close event is
    /// ignored and no further attempt is scheduled until `connect()`.
    pub fn disconnect(&mut self) -> Option<ConnectionState> {
        if self.reconnect.cancel() {
            log::debug!("[ConnectionManager] Reconnect timer cancelled");
        }
        if let Some(socket) = self.socket.take() {
            log::info!("[ConnectionManager] Disconnecting");
            socket.shut_down();
        }
        self.transition(ConnectionState::Disconnected)
    }

    /// Queue a text frame on the open socket.
    pub fn send(&self, frame: String) -> Result<(), TransportError> {
        match &self.socket {
            Some(socket) if socket.open => socket
                .outgoing
                .send(Outbound::Frame(frame))
                .map_err(|_| TransportError::Closed),
            _ => Err(TransportError::Closed),
        }
    }

    /// Apply a timer tick. Returns the new state if it started a connection.
    ///
    /// A socket still connecting is left to finish its handshake; only a
    /// tick with no socket at all starts a new attempt.
    pub fn handle_tick(&mut self, ticket: ReconnectTicket) -> Option<ConnectionState> {
        if !self.reconnect.accepts(ticket) {
            log::trace!("[ConnectionManager] Ignoring stale reconnect tick");
            return None;
        }
        if self.socket.is_some() {
            log::debug!("[ConnectionManager] Handshake still pending; skipping reconnect tick");
            return None;
        }
        log::info!("[ConnectionManager] Attempting reconnect");
        self.connect()
    }

    /// Apply a report from a socket task.
    pub fn handle_socket(&mut self, id: SocketId, event: SocketEvent) -> SocketOutcome {
        let Some(socket) = self.socket.as_mut().filter(|s| s.id == id) else {
            log::trace!("[ConnectionManager] Ignoring {:?} from stale socket", event);
            return SocketOutcome::None;
        };

        match event {
            SocketEvent::Opened => {
                socket.open = true;
                if self.reconnect.cancel() {
                    log::debug!("[ConnectionManager] Reconnect timer cleared");
                }
                log::info!("[ConnectionManager] Connected to {}", self.endpoint);
                self.state = ConnectionState::Connected;
                SocketOutcome::Opened
            }
            SocketEvent::Frame(text) => SocketOutcome::Frame(text),
            SocketEvent::Failed(error) => {
                log::error!("[ConnectionManager] Core link failure: {}", error);
                self.transition(ConnectionState::Error)
                    .map_or(SocketOutcome::None, SocketOutcome::StateChanged)
            }
            SocketEvent::Closed => {
                self.socket = None;
                let changed = if self.state != ConnectionState::Error {
                    self.transition(ConnectionState::Disconnected)
                } else {
                    None
                };
                self.schedule_reconnect();
                changed.map_or(SocketOutcome::None, SocketOutcome::StateChanged)
            }
        }
    }

    fn schedule_reconnect(&mut self) {
        let events = self.events.clone();
        let scheduled = self.reconnect.schedule(self.interval, move |ticket| {
            let _ = events.send(InternalEvent::ReconnectTick(ticket));
        });
        if scheduled {
            log::info!(
                "[ConnectionManager] Reconnecting every {}s",
                self.interval.as_secs_f32()
            );
        }
    }

    fn transition(&mut self, next: ConnectionState) -> Option<ConnectionState> {
        if self.state == next {
            return None;
        }
        self.state = next;
        Some(next)
    }
}

impl<C: TransportConnector> Drop for ConnectionManager<C> {
    fn drop(&mut self) {
        self.reconnect.cancel();
        if let Some(socket) = self.socket.take() {
            socket.shut_down();
        }
    }
}

/// Socket task: connect, then pump frames both ways until either side closes.
async fn run_socket<C: TransportConnector>(
    connector: Arc<C>,
    url: String,
    id: SocketId,
    mut outgoing: mpsc::UnboundedReceiver<Outbound>,
    events: mpsc::UnboundedSender<InternalEvent>,
) {
    let emit = |event| {
        let _ = events.send(InternalEvent::Socket { socket: id, event });
    };

    let mut transport = match connector.connect(&url).await {
        Ok(transport) => transport,
        Err(e) => {
            emit(SocketEvent::Failed(e));
            emit(SocketEvent::Closed);
            return;
        }
    };
    emit(SocketEvent::Opened);

    loop {
        tokio::select! {
            msg = transport.recv() => match msg {
                Some(Ok(WsMessage::Text(text))) => emit(SocketEvent::Frame(text)),
                Some(Ok(WsMessage::Close)) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    emit(SocketEvent::Failed(e));
                    break;
                }
            },
            out = outgoing.recv() => match out {
                Some(Outbound::Frame(text)) => {
                    if let Err(e) = transport.send_text(text).await {
                        emit(SocketEvent::Failed(e));
                        break;
                    }
                }
                Some(Outbound::Close) | None => {
                    let _ = transport.close().await;
                    break;
                }
            },
        }
    }

    emit(SocketEvent::Closed);
}
