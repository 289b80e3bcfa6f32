//! Relay transport over tokio-tungstenite.
//!
//! The relay only speaks text frames. Control frames are handled here:
//! pings are answered (tungstenite queues the pong, we flush it) and pongs
//! are dropped, so callers of [`SyncTransport::recv`] only see data frames
//! and the close.

use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};

use super::transport::{SyncTransport, TransportConnector, TransportError, WsMessage};

type WsStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

/// One relay connection backed by tokio-tungstenite.
pub struct TokioTransport {
    ws: WsStream,
    url: String,
}

impl TokioTransport {
    /// Open a WebSocket to `url` (`ws://` or `wss://`).
    pub async fn connect(url: &str) -> Result<Self, TransportError> {
        let (ws, response) = connect_async(url).await.map_err(handshake_error)?;
        log::debug!(
            "[TokioTransport] Upgraded {} (HTTP {})",
            url,
            response.status()
        );
        Ok(Self {
            ws,
            url: url.to_string(),
        })
    }
}

#[async_trait::async_trait]
impl SyncTransport for TokioTransport {
    async fn send_text(&mut self, text: String) -> Result<(), TransportError> {
        self.ws
            .send(Message::Text(text.into()))
            .await
            .map_err(|e| match e {
                WsError::ConnectionClosed | WsError::AlreadyClosed => TransportError::Closed,
                other => TransportError::SendFailed(other.to_string()),
            })
    }

    async fn recv(&mut self) -> Option<Result<WsMessage, TransportError>> {
        loop {
            let message = match self.ws.next().await? {
                Ok(message) => message,
                Err(WsError::ConnectionClosed | WsError::AlreadyClosed) => return None,
                Err(e) => return Some(Err(TransportError::Other(e.to_string()))),
            };

            match message {
                Message::Text(text) => return Some(Ok(WsMessage::Text(text.to_string()))),
                Message::Binary(data) => return Some(Ok(WsMessage::Binary(data.to_vec()))),
                Message::Close(frame) => {
                    if let Some(frame) = frame {
                        log::info!(
                            "[TokioTransport] {} closed: {} {}",
                            self.url,
                            frame.code,
                            frame.reason
                        );
                    }
                    return Some(Ok(WsMessage::Close));
                }
                Message::Ping(_) => {
                    if let Err(e) = self.ws.flush().await {
                        log::debug!("[TokioTransport] Failed to answer ping: {}", e);
                    }
                }
                Message::Pong(_) | Message::Frame(_) => {}
            }
        }
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        match self.ws.close(None).await {
            Ok(()) | Err(WsError::ConnectionClosed | WsError::AlreadyClosed) => Ok(()),
            Err(e) => Err(TransportError::Other(e.to_string())),
        }
    }
}

fn handshake_error(error: WsError) -> TransportError {
    let reason = match error {
        WsError::Http(response) => format!("relay refused upgrade (HTTP {})", response.status()),
        WsError::Url(e) => format!("unusable relay URL: {e}"),
        other => other.to_string(),
    };
    TransportError::ConnectionFailed(reason)
}

/// Opens [`TokioTransport`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioConnector;

#[async_trait::async_trait]
impl TransportConnector for TokioConnector {
    type Transport = TokioTransport;

    async fn connect(&self, url: &str) -> Result<TokioTransport, TransportError> {
        TokioTransport::connect(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_tungstenite::tungstenite::error::UrlError;

    #[test]
    fn test_handshake_error_names_bad_url() {
        let error = handshake_error(WsError::Url(UrlError::UnsupportedUrlScheme));
        match error {
            TransportError::ConnectionFailed(reason) => {
                assert!(reason.starts_with("unusable relay URL"), "{reason}")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_connect_rejects_non_websocket_scheme() {
        let result = TokioConnector.connect("ftp://relay.example.com").await;
        assert!(matches!(result, Err(TransportError::ConnectionFailed(_))));
    }
}
