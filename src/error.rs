//! Error types for payload generation and echo round trips.
//!
//! Every failure of a round trip is returned to the caller untouched; nothing
//! in this crate retries or recovers locally.

use thiserror::Error;

/// Result type alias for round-trip operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while generating payloads or driving a round trip.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// A caller-supplied value was rejected (negative size, bad endpoint).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The transport failed to establish or maintain the session.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The peer closed the session before a reply arrived, with the close
    /// code from its close frame if it sent one.
    #[error("Connection closed by peer{}", close_code_suffix(.0))]
    ConnectionClosed(Option<u16>),

    /// No reply arrived within the iteration deadline.
    #[error("Timed out after {elapsed_ms} ms while {phase}")]
    Timeout {
        /// What the round trip was doing when the deadline elapsed.
        phase: &'static str,
        /// Time spent in the iteration, in milliseconds.
        elapsed_ms: u64,
    },

    /// The envelope could not be serialized.
    #[error("Encode error: {0}")]
    Encode(String),

    /// The random source failed to produce bytes.
    #[error("Entropy source failure: {0}")]
    Entropy(String),

    /// The reply differed from the envelope that was sent.
    #[error("Echo mismatch: sent {sent} bytes, received {received} bytes")]
    EchoMismatch {
        /// Length of the sent envelope.
        sent: usize,
        /// Length of the received reply.
        received: usize,
    },

    /// I/O error outside an established session.
    #[error("I/O error: {0}")]
    Io(String),

    /// One or more iterations of a sequential run failed.
    #[error("{failed} of {total} iterations failed")]
    IterationsFailed {
        /// Number of failed iterations.
        failed: u32,
        /// Number of iterations attempted.
        total: u32,
    },
}

fn close_code_suffix(code: &Option<u16>) -> String {
    match code {
        Some(code) => format!(" (close code {code})"),
        None => String::new(),
    }
}

impl Error {
    /// Check if this error is a transport-level failure.
    #[must_use]
    pub const fn is_connection_error(&self) -> bool {
        matches!(self, Error::Connection(_) | Error::ConnectionClosed(_))
    }

    /// Check if this error is a deadline expiry.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Encode(err.to_string())
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for Error {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        use tokio_tungstenite::tungstenite::Error as WsError;
        match err {
            WsError::ConnectionClosed => Error::ConnectionClosed(None),
            // AlreadyClosed means this side used the socket after closing it.
            other => Error::Connection(other.to_string()),
        }
    }
}

impl From<getrandom::Error> for Error {
    fn from(err: getrandom::Error) -> Self {
        Error::Entropy(err.to_string())
    }
}
