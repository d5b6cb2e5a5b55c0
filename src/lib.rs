//! Relays messages from one FIFO queue to another.
//!
//! Each message taken off the inbound queue has its body run through a [`BodyDeriver`], the
//! result is published to the outbound queue under a fixed group id, and only once that publish
//! is acknowledged is the inbound message deleted. Any failure leaves the inbound message in
//! place, so the queue redelivers it after its visibility timeout.

mod client;
mod config;
mod derive;
mod message;
mod relay;

pub mod impls;

#[cfg(test)]
mod test_utils;

pub use client::{MessageClientError, MessagePubClient, MessageSubClient};
pub use config::{RelayConfig, StartupError};
pub use derive::{BodyDeriver, DeriveError, InstanceNameDeriver};
pub use message::{InboundMessage, OutboundMessage};
pub use relay::{IterationOutcome, Relay, RelayError, RelaySettings};
