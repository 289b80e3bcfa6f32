//! Relay synchronization for the task board.
//!
//! One [`BoardClient`] per process owns the connection, the synchronized
//! board and the presence roster. Frames are decoded into [`Envelope`]s,
//! filtered by project and target, and applied by the [`MessageRouter`].
//! Every observable change is published as a [`BoardEvent`].

mod client;
mod connection;
mod envelope;
mod events;
mod presence;
mod reconnect;
mod router;
mod store;
mod task;
#[cfg(all(not(target_arch = "wasm32"), feature = "native-sync"))]
mod tokio_transport;
mod transport;

pub use client::{
    BoardClient, BoardClientConfig, BoardHandle, ClientSnapshot, SELECT_PROJECT_MESSAGE,
};
pub use connection::{ConnectionManager, InternalEvent, SocketEvent, SocketId, SocketOutcome};
pub use envelope::{
    Envelope, EnvelopeType, INITIAL_SYNC_LABEL, OutgoingEnvelope, Sender, TaskSyncPayload,
};
pub use events::{BoardEvent, BoardEventHandler, ConnectionState};
pub use presence::{PresenceEntry, PresenceTracker};
pub use reconnect::{ReconnectPolicy, ReconnectTicket};
pub use router::{BoardState, MessageRouter, NO_TASKS_MESSAGE, Routed, Skip};
pub use store::{SyncSnapshot, SyncStateStore};
pub use task::{Link, Task, TaskPriority, TaskStatus};
#[cfg(all(not(target_arch = "wasm32"), feature = "native-sync"))]
pub use tokio_transport::{TokioConnector, TokioTransport};
pub use transport::{SyncTransport, TransportConnector, TransportError, WsMessage};
