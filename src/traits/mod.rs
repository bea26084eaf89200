//! Trait abstractions for dependency injection and testability.
//!
//! The core protocol logic never touches a socket or the console directly;
//! it talks through these seams so tests can substitute mocks.
//!
//! # Traits
//!
//! - [`LineSource`] - one line at a time from a streaming transport
//! - [`SseHandler`] - per-event consumer for the SSE dispatcher
//! - [`SubscriptionObserver`] - per-message consumer for the websocket machine
//! - [`SubscriptionTransport`] - send/receive text frames on a socket

pub mod handler;
pub mod source;
pub mod transport;

pub use handler::{SseHandler, SubscriptionObserver};
pub use source::{LineSource, StreamError};
pub use transport::{SubscriptionTransport, TransportError};
