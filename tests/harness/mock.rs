//! In-memory connectors with scripted peer behavior.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use echoload::{Connector, Error, Result, Session};
use tokio::sync::mpsc;

/// How the simulated peer behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    /// Echo every text frame verbatim.
    Echo,
    /// Accept frames and never reply.
    Silent,
    /// Fail every connect attempt.
    Refuse,
    /// Never finish connecting.
    Hang,
    /// Close the session instead of replying.
    CloseBeforeReply,
    /// Fail the send.
    BrokenPipe,
}

/// Shared record of what the connector and its sessions observed.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    sent: Arc<Mutex<Vec<String>>>,
    connects: Arc<AtomicUsize>,
    closes: Arc<AtomicUsize>,
    drops: Arc<AtomicUsize>,
}

impl Recorder {
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    /// Number of sessions released, whether closed first or not.
    pub fn drops(&self) -> usize {
        self.drops.load(Ordering::SeqCst)
    }
}

pub struct MockConnector {
    behavior: Behavior,
    recorder: Recorder,
}

impl MockConnector {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            recorder: Recorder::default(),
        }
    }

    pub fn recorder(&self) -> Recorder {
        self.recorder.clone()
    }
}

pub struct MockSession {
    behavior: Behavior,
    tx: mpsc::UnboundedSender<String>,
    rx: mpsc::UnboundedReceiver<String>,
    recorder: Recorder,
}

#[async_trait]
impl Connector for MockConnector {
    type Session = MockSession;

    async fn connect(&self, endpoint: &str) -> Result<MockSession> {
        self.recorder.connects.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            Behavior::Refuse => Err(Error::Connection(format!("{endpoint}: connection refused"))),
            Behavior::Hang => std::future::pending().await,
            behavior => {
                let (tx, rx) = mpsc::unbounded_channel();
                Ok(MockSession {
                    behavior,
                    tx,
                    rx,
                    recorder: self.recorder.clone(),
                })
            }
        }
    }
}

impl Drop for MockSession {
    fn drop(&mut self) {
        self.recorder.drops.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Session for MockSession {
    async fn send_text(&mut self, text: String) -> Result<()> {
        if self.behavior == Behavior::BrokenPipe {
            return Err(Error::Connection("broken pipe".into()));
        }
        self.recorder.sent.lock().unwrap().push(text.clone());
        if self.behavior == Behavior::Echo {
            // Queued before recv_text is awaited; the reply must not be lost.
            let _ = self.tx.send(text);
        }
        Ok(())
    }

    async fn recv_text(&mut self) -> Result<String> {
        if self.behavior == Behavior::CloseBeforeReply {
            return Err(Error::ConnectionClosed(Some(1001)));
        }
        // `tx` lives as long as the session, so a silent peer pends here.
        self.rx.recv().await.ok_or(Error::ConnectionClosed(None))
    }

    async fn close(&mut self) -> Result<()> {
        self.recorder.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
