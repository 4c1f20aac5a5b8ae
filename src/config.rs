//! Configuration for round trips and the companion echo server.

use std::time::Duration;

use tokio_tungstenite::tungstenite::http::Uri;

use crate::error::{Error, Result};

/// Endpoint used when the caller does not supply one.
pub const DEFAULT_ENDPOINT: &str = "ws://localhost:8081/ws";

/// Number of payload characters sent per round trip by default.
pub const DEFAULT_PAYLOAD_SIZE: usize = 8192;

/// Address the echo server binds to by default.
pub const DEFAULT_LISTEN: &str = "127.0.0.1:8081";

/// Upgrade path the echo server accepts by default.
pub const DEFAULT_PATH: &str = "/ws";

/// Deadlines applied to a single round trip.
///
/// The iteration deadline bounds everything from connect to the arrival of
/// the reply. The close timeout bounds the close handshake that follows,
/// including the one performed after the iteration deadline has expired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeouts {
    /// Maximum time from the start of connect until the reply is received.
    ///
    /// Default: 60 seconds
    pub iteration: Duration,

    /// Maximum time spent on the close handshake.
    ///
    /// Default: 5 seconds
    pub close: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            iteration: Duration::from_secs(60),
            close: Duration::from_secs(5),
        }
    }
}

impl Timeouts {
    /// Create new timeouts with custom values.
    #[must_use]
    pub const fn new(iteration: Duration, close: Duration) -> Self {
        Self { iteration, close }
    }
}

/// Round-trip configuration.
///
/// The target endpoint is not part of the configuration; it is passed to
/// [`EchoRoundTrip::run`](crate::EchoRoundTrip::run) on every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Number of random characters placed in the envelope.
    ///
    /// Default: 8192
    pub payload_size: usize,

    /// Deadline configuration.
    pub timeouts: Timeouts,

    /// Fail the round trip when the reply differs from the sent envelope.
    ///
    /// Default: false
    pub verify_echo: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            payload_size: DEFAULT_PAYLOAD_SIZE,
            timeouts: Timeouts::default(),
            verify_echo: false,
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of payload characters.
    #[must_use]
    pub const fn with_payload_size(mut self, size: usize) -> Self {
        self.payload_size = size;
        self
    }

    /// Set timeout configuration.
    #[must_use]
    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Set the iteration deadline, keeping the close timeout.
    #[must_use]
    pub const fn with_iteration_deadline(mut self, deadline: Duration) -> Self {
        self.timeouts.iteration = deadline;
        self
    }

    /// Enable or disable echo verification.
    #[must_use]
    pub const fn with_verify_echo(mut self, verify: bool) -> Self {
        self.verify_echo = verify;
        self
    }

    /// Check the configuration before any connection is attempted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for a zero iteration deadline.
    pub fn validate(&self) -> Result<()> {
        if self.timeouts.iteration.is_zero() {
            return Err(Error::InvalidArgument(
                "iteration deadline must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// Check that `endpoint` is an absolute `ws://` or `wss://` URL with a host.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] describing the first problem found.
pub fn validate_endpoint(endpoint: &str) -> Result<()> {
    let uri: Uri = endpoint
        .parse()
        .map_err(|e| Error::InvalidArgument(format!("endpoint '{endpoint}': {e}")))?;

    match uri.scheme_str() {
        Some("ws" | "wss") => {}
        Some(other) => {
            return Err(Error::InvalidArgument(format!(
                "endpoint '{endpoint}': unsupported scheme '{other}'"
            )));
        }
        None => {
            return Err(Error::InvalidArgument(format!(
                "endpoint '{endpoint}': missing scheme"
            )));
        }
    }

    if uri.host().is_none_or(str::is_empty) {
        return Err(Error::InvalidArgument(format!(
            "endpoint '{endpoint}': missing host"
        )));
    }
    Ok(())
}

/// How the echo server answers a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplyMode {
    /// Send every data frame back verbatim.
    #[default]
    Echo,
    /// Send one canned text frame on connect, then only log what arrives.
    Canned {
        /// Number of filler characters after the canned prefix.
        size: usize,
    },
}

/// Echo server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Socket address to bind.
    ///
    /// Default: `127.0.0.1:8081`
    pub listen: String,

    /// Request path accepted for the upgrade; other paths get HTTP 404.
    ///
    /// Default: `/ws`
    pub path: String,

    /// Reply behavior.
    pub mode: ReplyMode,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: DEFAULT_LISTEN.to_owned(),
            path: DEFAULT_PATH.to_owned(),
            mode: ReplyMode::default(),
        }
    }
}

impl ServerConfig {
    /// Create a new server configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bind address.
    #[must_use]
    pub fn with_listen(mut self, listen: impl Into<String>) -> Self {
        self.listen = listen.into();
        self
    }

    /// Set the accepted upgrade path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Set the reply behavior.
    #[must_use]
    pub const fn with_mode(mut self, mode: ReplyMode) -> Self {
        self.mode = mode;
        self
    }
}
