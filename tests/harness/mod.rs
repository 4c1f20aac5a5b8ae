//! Test harness shared by the integration tests.
//!
//! Provides in-memory connectors with scripted peer behavior and a real echo
//! server bound to an ephemeral port.

#![allow(dead_code)]

mod mock;
mod server;

pub use mock::{Behavior, MockConnector, Recorder};
pub use server::TestServer;
