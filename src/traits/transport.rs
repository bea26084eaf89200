//! Socket transport trait abstraction.
//!
//! The subscription state machine drives a bidirectional socket through this
//! seam. The production implementation is
//! [`crate::subscription::WsTransport`] over tokio-tungstenite; tests use
//! scripted mocks.

use async_trait::async_trait;
use thiserror::Error;

/// Transport-level errors. All of these are terminal for the subscription
/// attempt that hits them; retry policy belongs to the caller.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
    #[error("send failed: {0}")]
    SendFailed(String),
    #[error("receive failed: {0}")]
    RecvFailed(String),
}

/// Send and receive text frames on an exclusively owned socket.
///
/// `recv` returns one *complete* logical message: implementations must
/// reassemble transport fragments before handing a message back, so the
/// state machine never sees a partial frame. `Ok(None)` means the peer
/// closed the connection.
#[async_trait]
pub trait SubscriptionTransport: Send {
    /// Send one text frame.
    async fn send(&mut self, text: String) -> Result<(), TransportError>;

    /// Receive the next complete text message, or `None` on close.
    async fn recv(&mut self) -> Result<Option<String>, TransportError>;

    /// Close the connection. Best effort; errors are swallowed.
    async fn close(&mut self);
}
