//! Echo server on a random port for integration tests.

use std::net::SocketAddr;

use echoload::{EchoServer, ReplyMode, ServerConfig};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

pub struct TestServer {
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<echoload::Result<()>>,
}

impl TestServer {
    /// Spawn an echoing server.
    pub async fn spawn() -> (Self, SocketAddr) {
        Self::spawn_with(ReplyMode::Echo).await
    }

    /// Spawn a server with the given reply mode on `127.0.0.1:0`.
    pub async fn spawn_with(mode: ReplyMode) -> (Self, SocketAddr) {
        let config = ServerConfig::new()
            .with_listen("127.0.0.1:0")
            .with_mode(mode);
        let server = EchoServer::bind(config).await.unwrap();
        let addr = server.local_addr().unwrap();

        let (shutdown, rx) = oneshot::channel();
        let handle = tokio::spawn(server.serve_until(async {
            let _ = rx.await;
        }));

        (Self { shutdown, handle }, addr)
    }

    /// Endpoint URL for `addr` on the default path.
    pub fn endpoint(addr: SocketAddr) -> String {
        format!("ws://{addr}/ws")
    }

    pub async fn shutdown(self) {
        let _ = self.shutdown.send(());
        self.handle.await.unwrap().unwrap();
    }
}
