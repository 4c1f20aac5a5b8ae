//! Transport seam between the round trip and a WebSocket client.
//!
//! A [`Connector`] opens sessions; a [`Session`] moves text frames and closes.
//! The round trip depends only on these two traits, so tests substitute
//! in-memory implementations and production uses [`WsConnector`].
//!
//! ## Ordering
//!
//! A session buffers inbound frames from the moment `connect` returns. A
//! reply that arrives before [`Session::recv_text`] is awaited is therefore
//! never lost, which is what lets the round trip arm its reply handler before
//! sending.

mod websocket;

pub use websocket::{WsConnector, WsSession};

use async_trait::async_trait;

use crate::error::Result;

/// Opens WebSocket sessions.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Session type produced by this connector.
    type Session: Session;

    /// Open a session to `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`](crate::Error::Connection) if the session
    /// cannot be established.
    async fn connect(&self, endpoint: &str) -> Result<Self::Session>;
}

/// An open WebSocket session.
#[async_trait]
pub trait Session: Send {
    /// Send one text frame.
    async fn send_text(&mut self, text: String) -> Result<()>;

    /// Wait for the next inbound text frame.
    ///
    /// Non-text frames are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConnectionClosed`](crate::Error::ConnectionClosed)
    /// with the peer's close code if the peer closes first, or a connection
    /// error if the transport fails.
    async fn recv_text(&mut self) -> Result<String>;

    /// Run the close handshake.
    ///
    /// Calling this on a session that is already closed succeeds.
    async fn close(&mut self) -> Result<()>;
}
