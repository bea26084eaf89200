//! Websocket subscription protocol (graphql-ws).
//!
//! One subscription attempt is one pass through the lifecycle:
//! `connection_init` handshake, `subscribe`, receive loop, terminal state.
//! The transport is exclusively owned for the attempt and released on every
//! exit path; nothing survives across attempts.
//!
//! # Module structure
//! - `messages` - wire-shape types and frame decoding
//! - `machine` - the lifecycle state machine ([`SubscriptionClient`])
//! - `transport` - tokio-tungstenite transport ([`WsTransport`])

pub mod machine;
pub mod messages;
pub mod transport;

pub use machine::{
    SubscriptionClient, SubscriptionError, SubscriptionState, TerminalReason, DEFAULT_ACK_TIMEOUT,
};
pub use messages::{decode, ClientMessage, SubscribePayload, SubscriptionMessage};
pub use transport::WsTransport;
