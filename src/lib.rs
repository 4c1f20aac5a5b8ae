//! # echoload - WebSocket echo round trips for load testing
//!
//! `echoload` provides the repeatable unit of a WebSocket load test: open a
//! session, send one randomly generated payload wrapped in a JSON envelope,
//! wait for the reply, close.
//!
//! ## Features
//!
//! - **Random payloads** over `[A-Za-z0-9]` from an injectable entropy source
//! - **Explicit lifecycle** (`Idle -> Connecting -> Connected -> AwaitingReply -> Closing -> Closed`)
//! - **Guaranteed release** of the session on every exit path, deadline included
//! - **Pluggable transport** through the [`Connector`] and [`Session`] traits
//! - **Companion echo server** for local targets
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use echoload::config::DEFAULT_ENDPOINT;
//! use echoload::{Config, EchoRoundTrip, WsConnector};
//!
//! let mut round_trip = EchoRoundTrip::new(Config::default());
//! let report = round_trip.run(&WsConnector::new(), DEFAULT_ENDPOINT).await?;
//! ```

pub mod config;
pub mod envelope;
pub mod error;
pub mod payload;
pub mod round_trip;
pub mod server;
pub mod transport;

pub use config::{Config, ReplyMode, ServerConfig, Timeouts};
pub use envelope::Envelope;
pub use error::{Error, Result};
pub use payload::{EntropySource, OsEntropy, PayloadGenerator, PayloadSize, SeededEntropy};
pub use round_trip::{EchoRoundTrip, RoundTripReport, RoundTripState};
pub use server::EchoServer;
pub use transport::{Connector, Session, WsConnector, WsSession};

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn test_public_types_are_send() {
        assert_send::<Error>();
        assert_send::<Config>();
        assert_send::<Timeouts>();
        assert_send::<Envelope>();
        assert_send::<RoundTripState>();
        assert_send::<RoundTripReport>();
        assert_send::<PayloadGenerator<OsEntropy>>();
        assert_send::<PayloadGenerator<SeededEntropy>>();
        assert_send::<EchoRoundTrip<OsEntropy>>();
        assert_send::<WsSession>();
    }

    #[test]
    fn test_public_types_are_sync() {
        assert_sync::<Error>();
        assert_sync::<Config>();
        assert_sync::<Timeouts>();
        assert_sync::<Envelope>();
        assert_sync::<RoundTripState>();
        assert_sync::<OsEntropy>();
        assert_sync::<WsConnector>();
    }
}
