//! One WebSocket echo cycle, the repeatable unit of load.
//!
//! ## Lifecycle
//!
//! 1. **Connecting** - the connector opens a session
//! 2. **Connected** - session open
//! 3. **AwaitingReply** - reply handler armed, envelope generated and sent
//! 4. **Closing** - close handshake, bounded by the close timeout
//! 5. **Closed** - session released
//!
//! A connection failure goes straight from `Connecting` to `Closed`. Every
//! other exit path, including deadline expiry, passes through `Closing`.
//!
//! ## Example
//!
//! ```rust,ignore
//! use echoload::config::DEFAULT_ENDPOINT;
//! use echoload::{Config, EchoRoundTrip, WsConnector};
//!
//! let mut round_trip = EchoRoundTrip::new(Config::default());
//! let report = round_trip.run(&WsConnector::new(), DEFAULT_ENDPOINT).await?;
//! println!("{} bytes echoed in {:?}", report.reply.len(), report.elapsed);
//! ```

mod state;

pub use state::RoundTripState;

use std::time::Duration;

use tokio::time::{Instant, timeout, timeout_at};
use tracing::{debug, error, info, trace, warn};

use crate::config::{Config, validate_endpoint};
use crate::envelope::Envelope;
use crate::error::{Error, Result};
use crate::payload::{EntropySource, OsEntropy, PayloadGenerator};
use crate::transport::{Connector, Session};

/// Outcome of a successful round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundTripReport {
    /// Endpoint the session was opened to.
    pub endpoint: String,
    /// JSON envelope that was sent.
    pub sent: String,
    /// First text frame received after the send.
    pub reply: String,
    /// Time from the start of connect until the reply arrived.
    pub elapsed: Duration,
}

impl RoundTripReport {
    /// Check whether the reply is a verbatim echo of the request.
    #[must_use]
    pub fn is_echo(&self) -> bool {
        self.sent == self.reply
    }
}

/// Drives one connect, send, reply, close cycle per [`run`](Self::run).
///
/// The instance is reusable; each `run` starts again from `Idle`.
#[derive(Debug)]
pub struct EchoRoundTrip<E = OsEntropy> {
    config: Config,
    generator: PayloadGenerator<E>,
    state: RoundTripState,
    history: Vec<RoundTripState>,
}

impl EchoRoundTrip<OsEntropy> {
    /// Create a round trip that draws payloads from OS entropy.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self::with_generator(config, PayloadGenerator::default())
    }
}

impl<E: EntropySource> EchoRoundTrip<E> {
    /// Create a round trip with an explicit payload generator.
    pub fn with_generator(config: Config, generator: PayloadGenerator<E>) -> Self {
        Self {
            config,
            generator,
            state: RoundTripState::Idle,
            history: vec![RoundTripState::Idle],
        }
    }

    /// Get the current state.
    pub fn state(&self) -> RoundTripState {
        self.state
    }

    /// States visited by the most recent run, starting with `Idle`.
    pub fn history(&self) -> &[RoundTripState] {
        &self.history
    }

    /// Get the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run one echo cycle against `endpoint`.
    ///
    /// The iteration deadline from [`Timeouts`](crate::Timeouts) bounds
    /// connect, send and reply together. Whatever happens after the session
    /// opens, it is closed before this returns.
    ///
    /// ## Errors
    ///
    /// - `Error::InvalidArgument` if `endpoint` is not a WebSocket URL (no
    ///   state change)
    /// - `Error::Connection` or `Error::ConnectionClosed` on transport failure
    /// - `Error::Timeout` if the deadline elapses first
    /// - `Error::EchoMismatch` if echo verification is enabled and the reply
    ///   differs
    pub async fn run<C: Connector>(
        &mut self,
        connector: &C,
        endpoint: &str,
    ) -> Result<RoundTripReport> {
        validate_endpoint(endpoint)?;
        self.reset();

        let started = Instant::now();
        let deadline = started + self.config.timeouts.iteration;

        self.transition(RoundTripState::Connecting);
        let mut session = match timeout_at(deadline, connector.connect(endpoint)).await {
            Ok(Ok(session)) => session,
            Ok(Err(e)) => {
                warn!(endpoint, error = %e, "connection failed");
                self.transition(RoundTripState::Closed);
                return Err(e);
            }
            Err(_) => {
                warn!(endpoint, "deadline elapsed while connecting");
                let err = self.timeout_error(started);
                self.transition(RoundTripState::Closed);
                return Err(err);
            }
        };
        self.transition(RoundTripState::Connected);
        info!(endpoint, "websocket connection established");

        let exchanged = match timeout_at(deadline, self.exchange(&mut session)).await {
            Ok(result) => result,
            Err(_) => Err(self.timeout_error(started)),
        };
        let elapsed = started.elapsed();

        self.transition(RoundTripState::Closing);
        let closed = match timeout(self.config.timeouts.close, session.close()).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout {
                phase: RoundTripState::Closing.phase(),
                elapsed_ms: millis(self.config.timeouts.close),
            }),
        };
        drop(session);
        self.transition(RoundTripState::Closed);

        let (sent, reply) = exchanged.inspect_err(|e| {
            warn!(endpoint, error = %e, "round trip failed");
        })?;

        // The reply is already in hand; a failed close handshake does not
        // fail the iteration.
        if let Err(e) = closed {
            warn!(endpoint, error = %e, "close handshake did not complete");
        }

        Ok(RoundTripReport {
            endpoint: endpoint.to_owned(),
            sent,
            reply,
            elapsed,
        })
    }

    /// Run `iterations` round trips against `endpoint`, one after another.
    ///
    /// Each outcome is logged; a failed iteration does not stop the ones
    /// after it.
    ///
    /// ## Errors
    ///
    /// Returns `Error::IterationsFailed` if at least one iteration failed.
    pub async fn run_iterations<C: Connector>(
        &mut self,
        connector: &C,
        endpoint: &str,
        iterations: u32,
    ) -> Result<()> {
        let mut failed = 0u32;

        for iteration in 1..=iterations {
            match self.run(connector, endpoint).await {
                Ok(report) => info!(
                    iteration,
                    elapsed_ms = millis(report.elapsed),
                    reply_len = report.reply.len(),
                    echo = report.is_echo(),
                    "iteration succeeded"
                ),
                Err(e) => {
                    failed += 1;
                    error!(iteration, error = %e, "iteration failed");
                }
            }
        }

        if failed > 0 {
            return Err(Error::IterationsFailed {
                failed,
                total: iterations,
            });
        }
        Ok(())
    }

    async fn exchange<S: Session>(&mut self, session: &mut S) -> Result<(String, String)> {
        // Inbound frames are queued by the session from connect onwards, so
        // the handler is armed before the envelope leaves.
        self.transition(RoundTripState::AwaitingReply);

        let payload = self.generator.generate(self.config.payload_size)?;
        let sent = Envelope::new(payload).to_json()?;
        session.send_text(sent.clone()).await?;
        debug!(len = sent.len(), "envelope sent");

        let reply = session.recv_text().await?;
        info!(len = reply.len(), "received reply");
        debug!(reply = %reply, "reply body");

        if self.config.verify_echo && reply != sent {
            return Err(Error::EchoMismatch {
                sent: sent.len(),
                received: reply.len(),
            });
        }
        Ok((sent, reply))
    }

    fn reset(&mut self) {
        self.state = RoundTripState::Idle;
        self.history.clear();
        self.history.push(RoundTripState::Idle);
    }

    fn transition(&mut self, next: RoundTripState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal transition {} -> {}",
            self.state,
            next
        );
        trace!(from = %self.state, to = %next, "round trip transition");
        self.state = next;
        self.history.push(next);
    }

    fn timeout_error(&self, started: Instant) -> Error {
        Error::Timeout {
            phase: self.state.phase(),
            elapsed_ms: millis(started.elapsed()),
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
