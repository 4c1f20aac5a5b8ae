//! Companion WebSocket server used as the load target.
//!
//! In [`ReplyMode::Echo`] every data frame is sent back verbatim. In
//! [`ReplyMode::Canned`] the server pushes one fixed text frame as soon as the
//! session opens and afterwards only logs what the client sends.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::http::StatusCode;
use tracing::{debug, info, warn};

use crate::config::{ReplyMode, ServerConfig};
use crate::error::Result;

/// Prefix of the frame sent in canned mode.
pub const CANNED_PREFIX: &str = "响应：";

/// Build the canned reply: the prefix followed by `size` filler characters.
#[must_use]
pub fn canned_reply(size: usize) -> String {
    let mut reply = String::with_capacity(CANNED_PREFIX.len() + size);
    reply.push_str(CANNED_PREFIX);
    reply.extend(std::iter::repeat_n('a', size));
    reply
}

/// A bound echo server.
#[derive(Debug)]
pub struct EchoServer {
    listener: TcpListener,
    path: Arc<str>,
    mode: ReplyMode,
}

impl EchoServer {
    /// Bind the listening socket.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`](crate::Error::Io) if the address cannot be bound.
    pub async fn bind(config: ServerConfig) -> Result<Self> {
        let listener = TcpListener::bind(&config.listen).await?;
        Ok(Self {
            listener,
            path: Arc::from(config.path),
            mode: config.mode,
        })
    }

    /// Address the server is listening on.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`](crate::Error::Io) if the socket address is unavailable.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept sessions until the process exits.
    pub async fn serve(self) -> Result<()> {
        self.serve_until(std::future::pending()).await
    }

    /// Accept sessions until `shutdown` resolves.
    ///
    /// Sessions already in flight keep running on their own tasks.
    pub async fn serve_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let addr = self.local_addr()?;
        info!(%addr, path = %self.path, mode = ?self.mode, "echo server listening");

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                () = &mut shutdown => {
                    info!(%addr, "echo server shutting down");
                    return Ok(());
                }
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        let path = Arc::clone(&self.path);
                        let mode = self.mode;
                        tokio::spawn(async move {
                            if let Err(e) = handle_connection(stream, peer, path, mode).await {
                                debug!(%peer, error = %e, "session ended with error");
                            }
                        });
                    }
                    Err(e) => warn!(error = %e, "accept failed"),
                },
            }
        }
    }
}

async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    path: Arc<str>,
    mode: ReplyMode,
) -> Result<()> {
    let check_path = |req: &Request, resp: Response| -> std::result::Result<Response, ErrorResponse> {
        if req.uri().path() == &*path {
            Ok(resp)
        } else {
            let mut err = ErrorResponse::new(Some(format!(
                "no websocket endpoint at {}",
                req.uri().path()
            )));
            *err.status_mut() = StatusCode::NOT_FOUND;
            Err(err)
        }
    };

    let mut ws = accept_hdr_async(stream, check_path).await?;
    info!(%peer, "session opened");

    if let ReplyMode::Canned { size } = mode {
        ws.send(Message::Text(canned_reply(size))).await?;
    }

    // After a close frame the stream keeps yielding until the close reply is
    // flushed, then ends.
    while let Some(msg) = ws.next().await {
        match msg? {
            msg @ (Message::Text(_) | Message::Binary(_)) => {
                info!(%peer, len = msg.len(), "received frame");
                if let Message::Text(ref text) = msg {
                    debug!(%peer, body = %text, "frame body");
                }
                if mode == ReplyMode::Echo {
                    ws.send(msg).await?;
                }
            }
            Message::Close(frame) => {
                debug!(%peer, ?frame, "close received");
            }
            _ => {}
        }
    }

    info!(%peer, "session closed");
    Ok(())
}
