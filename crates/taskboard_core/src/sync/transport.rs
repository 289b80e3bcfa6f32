//! Transport abstraction for relay connections.
//!
//! This module defines the `SyncTransport` trait that provides a unified
//! interface over a single WebSocket-style connection, plus the
//! `TransportConnector` that opens them:
//!
//! - **Native (CLI)**: `TokioConnector` with tokio-tungstenite
//! - **Tests / embedders**: any in-memory connector implementing the traits
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────┐    ┌────────────────────┐
//! │ TokioConnector     │    │ in-memory          │
//! │ (tokio-tungstenite)│    │ connector          │
//! │ #[cfg(native-sync)]│    │ (tests)            │
//! └─────────┬──────────┘    └─────────┬──────────┘
//!           │                         │
//!           └────────────┬────────────┘
//!                        ▼
//!           ┌──────────────────────┐
//!           │   BoardClient<C>     │
//!           │   - Connection state │
//!           │   - Reconnection     │
//!           │   - Message routing  │
//!           └──────────────────────┘
//! ```

use thiserror::Error;

/// A frame received from, or sent to, the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WsMessage {
    /// UTF-8 text frame. Envelopes always travel as text.
    Text(String),
    /// Binary frame; the relay protocol does not use these.
    Binary(Vec<u8>),
    /// The peer closed the connection.
    Close,
}

/// Failure at the socket level.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The socket could not be opened.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
    /// Writing a frame failed.
    #[error("send failed: {0}")]
    SendFailed(String),
    /// The connection is closed.
    #[error("connection closed")]
    Closed,
    /// Anything else reported by the underlying socket.
    #[error("transport error: {0}")]
    Other(String),
}

/// One open connection to the relay.
#[async_trait::async_trait]
pub trait SyncTransport: Send {
    /// Send a text frame.
    async fn send_text(&mut self, text: String) -> Result<(), TransportError>;

    /// Receive the next frame. `None` means the stream ended.
    async fn recv(&mut self) -> Option<Result<WsMessage, TransportError>>;

    /// Close the connection.
    async fn close(&mut self) -> Result<(), TransportError>;
}

/// Opens [`SyncTransport`]s to a URL.
#[async_trait::async_trait]
pub trait TransportConnector: Send + Sync + 'static {
    /// The transport type produced.
    type Transport: SyncTransport + 'static;

    /// Open a connection.
    async fn connect(&self, url: &str) -> Result<Self::Transport, TransportError>;
}
