//! [`Connector`] and [`Session`] over `tokio-tungstenite`.

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, trace};

use super::{Connector, Session};
use crate::error::{Error, Result};

/// Opens client sessions with `tokio_tungstenite::connect_async`.
///
/// `wss://` endpoints require the `tls-rustls` feature.
#[derive(Debug, Clone, Copy, Default)]
pub struct WsConnector;

impl WsConnector {
    /// Create a connector.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Connector for WsConnector {
    type Session = WsSession;

    async fn connect(&self, endpoint: &str) -> Result<WsSession> {
        let (stream, response) = connect_async(endpoint)
            .await
            .map_err(|e| Error::Connection(format!("{endpoint}: {e}")))?;
        debug!(endpoint, status = %response.status(), "websocket handshake complete");
        Ok(WsSession::new(stream))
    }
}

/// A client session over a TCP (optionally TLS) stream.
///
/// Dropping the session drops the socket, so a round trip that is cancelled
/// mid-flight still releases its connection.
pub struct WsSession {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    closed: bool,
}

impl WsSession {
    fn new(stream: WebSocketStream<MaybeTlsStream<TcpStream>>) -> Self {
        Self {
            stream,
            closed: false,
        }
    }
}

impl std::fmt::Debug for WsSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WsSession")
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Session for WsSession {
    async fn send_text(&mut self, text: String) -> Result<()> {
        if self.closed {
            return Err(Error::ConnectionClosed(None));
        }
        self.stream.send(Message::Text(text)).await?;
        Ok(())
    }

    async fn recv_text(&mut self) -> Result<String> {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => return Ok(text),
                Some(Ok(Message::Close(frame))) => {
                    self.closed = true;
                    return Err(Error::ConnectionClosed(frame.map(|f| u16::from(f.code))));
                }
                Some(Ok(other)) => {
                    // Pings are answered by tungstenite on the next read or write.
                    trace!(len = other.len(), "skipping non-text frame");
                }
                Some(Err(e)) => return Err(e.into()),
                None => {
                    self.closed = true;
                    return Err(Error::ConnectionClosed(None));
                }
            }
        }
    }

    async fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        match self.stream.close(None).await {
            Ok(()) => {}
            Err(WsError::ConnectionClosed | WsError::AlreadyClosed) => return Ok(()),
            Err(e) => return Err(e.into()),
        }

        // Drain until the peer's close frame completes the handshake.
        while let Some(msg) = self.stream.next().await {
            match msg {
                Ok(Message::Close(_)) | Err(_) => break,
                Ok(_) => {}
            }
        }
        Ok(())
    }
}
