//! Events published by the board client to the presentation layer.
//!
//! # Usage
//!
//! ```ignore
//! use taskboard_core::sync::{BoardEvent, BoardEventHandler};
//!
//! struct Printer;
//! impl BoardEventHandler for Printer {
//!     fn on_event(&self, event: BoardEvent) {
//!         match event {
//!             BoardEvent::ConnectionStateChanged { state, display_endpoint } => {
//!                 println!("{state}: {display_endpoint}")
//!             }
//!             BoardEvent::StatusMessage(text) => println!("{text}"),
//!             _ => {}
//!         }
//!     }
//! }
//! ```

use super::presence::PresenceEntry;
use super::task::Task;

/// Connection lifecycle state. Exactly one value at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// No socket, or the last one closed.
    #[default]
    Disconnected,
    /// A socket is being opened.
    Connecting,
    /// The socket is open.
    Connected,
    /// The socket reported an error.
    Error,
}

impl ConnectionState {
    /// Lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Error => "error",
        }
    }

    /// Human-readable endpoint line for this state.
    pub fn display_endpoint(self, endpoint: &str) -> String {
        match self {
            Self::Connected => format!("Connected to Cluster • {endpoint}"),
            Self::Connecting => "Bridging connection...".to_string(),
            Self::Error => format!("Cluster Link Error • {endpoint}"),
            Self::Disconnected => format!("Systems offline • {endpoint}"),
        }
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Events emitted by the board client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    /// The connection state machine moved.
    ConnectionStateChanged {
        /// New state.
        state: ConnectionState,
        /// Endpoint line to show alongside it.
        display_endpoint: String,
    },
    /// A snapshot replaced the board.
    BoardChanged {
        /// Tasks in delivery order.
        tasks: Vec<Task>,
        /// Whether the snapshot is a replay.
        cached: bool,
    },
    /// The set of other connected clients changed.
    PresenceChanged(Vec<PresenceEntry>),
    /// Editor liveness flipped.
    EditorLivenessChanged(bool),
    /// Text for the status line.
    StatusMessage(String),
}

/// Receives [`BoardEvent`]s.
///
/// Called from the client's owning task, in order, one event at a time.
/// Implementations should return quickly.
pub trait BoardEventHandler: Send + Sync {
    /// Called when an event occurs.
    fn on_event(&self, event: BoardEvent);
}

impl<F> BoardEventHandler for F
where
    F: Fn(BoardEvent) + Send + Sync,
{
    fn on_event(&self, event: BoardEvent) {
        self(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_endpoint() {
        let url = "wss://relay.example.com";
        assert_eq!(
            ConnectionState::Connected.display_endpoint(url),
            "Connected to Cluster • wss://relay.example.com"
        );
        assert_eq!(
            ConnectionState::Connecting.display_endpoint(url),
            "Bridging connection..."
        );
        assert_eq!(
            ConnectionState::Error.display_endpoint(url),
            "Cluster Link Error • wss://relay.example.com"
        );
        assert_eq!(
            ConnectionState::Disconnected.display_endpoint(url),
            "Systems offline • wss://relay.example.com"
        );
    }

    #[test]
    fn test_closure_handler() {
        let seen = std::sync::Mutex::new(Vec::new());
        let handler = |event: BoardEvent| seen.lock().unwrap().push(event);
        handler.on_event(BoardEvent::EditorLivenessChanged(true));
        assert_eq!(
            seen.lock().unwrap().as_slice(),
            &[BoardEvent::EditorLivenessChanged(true)]
        );
    }
}
