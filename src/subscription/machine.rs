//! Subscription lifecycle state machine.
//!
//! Drives one subscription attempt over an exclusively owned transport:
//! `connection_init`, await the ack, `subscribe`, then the receive loop
//! until a terminal state. State is published on a `tokio::sync::watch`
//! channel so callers can observe transitions without participating in the
//! protocol.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::watch;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::subscription::messages::{decode, ClientMessage, SubscriptionMessage};
use crate::subscription::transport::WsTransport;
use crate::traits::{SubscriptionObserver, SubscriptionTransport, TransportError};

/// Bound on the wait for `connection_ack`. The protocol itself has no
/// bounded wait, which would block forever on a silent server.
pub const DEFAULT_ACK_TIMEOUT: Duration = Duration::from_secs(30);

/// Lifecycle of one subscription attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionState {
    Idle,
    Connecting,
    AwaitingAck,
    Subscribing,
    Active,
    Terminated(TerminalReason),
}

/// Why a subscription attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalReason {
    /// The transport closed (or closed before acknowledging).
    Closed,
    /// The server sent `complete` for the active subscription.
    Complete,
    /// The server sent `error` for the active subscription.
    Error,
    /// The first inbound message was not `connection_ack`.
    AckFailure,
    /// The shutdown flag was observed before a blocking read.
    Cancelled,
    /// A transport-level failure; details are in the returned error.
    TransportFailure,
}

/// Terminal errors for one subscription attempt. Never retried internally.
#[derive(Debug, Error)]
pub enum SubscriptionError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("no acknowledgement within {0:?}")]
    AckTimeout(Duration),
    #[error("failed to encode outbound frame: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Drives subscription attempts. Reusable across attempts; each attempt
/// owns its transport exclusively and releases it on every exit path.
pub struct SubscriptionClient {
    ack_timeout: Duration,
    shutdown: Arc<AtomicBool>,
    state_tx: watch::Sender<SubscriptionState>,
}

impl Default for SubscriptionClient {
    fn default() -> Self {
        Self::new()
    }
}

impl SubscriptionClient {
    pub fn new() -> Self {
        let (state_tx, _) = watch::channel(SubscriptionState::Idle);
        Self {
            ack_timeout: DEFAULT_ACK_TIMEOUT,
            shutdown: Arc::new(AtomicBool::new(false)),
            state_tx,
        }
    }

    /// Override the ack timeout.
    pub fn with_ack_timeout(mut self, ack_timeout: Duration) -> Self {
        self.ack_timeout = ack_timeout;
        self
    }

    /// Wire in an external shutdown flag, checked before each blocking read.
    pub fn with_shutdown(mut self, shutdown: Arc<AtomicBool>) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// The current lifecycle state.
    pub fn state(&self) -> SubscriptionState {
        self.state_tx.borrow().clone()
    }

    /// Observe state transitions.
    pub fn state_receiver(&self) -> watch::Receiver<SubscriptionState> {
        self.state_tx.subscribe()
    }

    fn transition(&self, next: SubscriptionState) {
        debug!(state = ?next, "subscription state transition");
        // send_replace stores the value even with no receivers alive, so
        // state() stays accurate for callers that never subscribe.
        self.state_tx.send_replace(next);
    }

    /// Connect to `url` and run one attempt with the given query.
    pub async fn subscribe<O>(
        &self,
        url: &str,
        query: &str,
        observer: &mut O,
    ) -> Result<TerminalReason, SubscriptionError>
    where
        O: SubscriptionObserver,
    {
        self.transition(SubscriptionState::Connecting);
        let transport = match WsTransport::connect(url).await {
            Ok(transport) => transport,
            Err(e) => {
                self.transition(SubscriptionState::Terminated(TerminalReason::TransportFailure));
                return Err(e.into());
            }
        };
        self.run(transport, query, observer).await
    }

    /// Run one attempt over an already connected transport.
    ///
    /// Protocol terminations come back as `Ok(reason)`; transport failures
    /// as `Err`. Either way the transport is closed before returning.
    pub async fn run<T, O>(
        &self,
        mut transport: T,
        query: &str,
        observer: &mut O,
    ) -> Result<TerminalReason, SubscriptionError>
    where
        T: SubscriptionTransport,
        O: SubscriptionObserver,
    {
        let outcome = self.drive(&mut transport, query, observer).await;
        transport.close().await;

        match &outcome {
            Ok(reason) => {
                info!(?reason, "subscription terminated");
                self.transition(SubscriptionState::Terminated(reason.clone()));
            }
            Err(e) => {
                warn!(error = %e, "subscription failed");
                self.transition(SubscriptionState::Terminated(TerminalReason::TransportFailure));
            }
        }
        outcome
    }

    async fn drive<T, O>(
        &self,
        transport: &mut T,
        query: &str,
        observer: &mut O,
    ) -> Result<TerminalReason, SubscriptionError>
    where
        T: SubscriptionTransport,
        O: SubscriptionObserver,
    {
        // Connecting is published by subscribe(); a transport handed
        // straight to run() was connected by the caller.
        transport.send(ClientMessage::connection_init().to_json()?).await?;
        self.transition(SubscriptionState::AwaitingAck);

        if self.shutdown.load(Ordering::SeqCst) {
            return Ok(TerminalReason::Cancelled);
        }

        // Exactly one inbound message decides the handshake.
        let first = match timeout(self.ack_timeout, transport.recv()).await {
            Err(_) => return Err(SubscriptionError::AckTimeout(self.ack_timeout)),
            Ok(result) => result?,
        };
        let Some(first) = first else {
            warn!("transport closed before acknowledgement");
            return Ok(TerminalReason::Closed);
        };
        match decode(&first) {
            SubscriptionMessage::ConnectionAck => debug!("connection acknowledged"),
            other => {
                warn!(message = ?other, "expected connection_ack");
                return Ok(TerminalReason::AckFailure);
            }
        }

        self.transition(SubscriptionState::Subscribing);
        // Fresh id per attempt; correlates next/error/complete to us.
        let id = Uuid::new_v4().to_string();
        transport
            .send(ClientMessage::subscribe(id.clone(), query).to_json()?)
            .await?;

        // No "subscribed" ack exists; the receive loop starts immediately.
        self.transition(SubscriptionState::Active);
        loop {
            if self.shutdown.load(Ordering::SeqCst) {
                info!("shutdown flag set, leaving receive loop");
                return Ok(TerminalReason::Cancelled);
            }
            let Some(raw) = transport.recv().await? else {
                return Ok(TerminalReason::Closed);
            };
            match decode(&raw) {
                SubscriptionMessage::Next { id: msg_id, data } if msg_id == id => {
                    if let Some(data) = data {
                        observer.on_next(data).await;
                    } else {
                        debug!("next frame without data member, skipped");
                    }
                }
                SubscriptionMessage::Error { id: msg_id, payload } if msg_id == id => {
                    observer.on_error(payload).await;
                    return Ok(TerminalReason::Error);
                }
                SubscriptionMessage::Complete { id: msg_id } if msg_id == id => {
                    return Ok(TerminalReason::Complete);
                }
                SubscriptionMessage::Unknown { raw } => {
                    observer.on_unknown(raw).await;
                }
                SubscriptionMessage::ConnectionAck => {
                    debug!("late connection_ack ignored");
                }
                // next/error/complete for a subscription we never started.
                foreign => {
                    debug!(message = ?foreign, "frame for foreign subscription id ignored");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_apply() {
        let flag = Arc::new(AtomicBool::new(false));
        let client = SubscriptionClient::new()
            .with_ack_timeout(Duration::from_millis(5))
            .with_shutdown(flag.clone());
        assert_eq!(client.ack_timeout, Duration::from_millis(5));
        assert!(Arc::ptr_eq(&client.shutdown, &flag));
        assert_eq!(client.state(), SubscriptionState::Idle);
    }

    #[test]
    fn state_is_visible_without_any_receiver() {
        // No state_receiver() is ever taken; transitions must still land.
        let client = SubscriptionClient::new();
        client.transition(SubscriptionState::Active);
        assert_eq!(client.state(), SubscriptionState::Active);

        client.transition(SubscriptionState::Terminated(TerminalReason::Complete));
        assert_eq!(
            client.state(),
            SubscriptionState::Terminated(TerminalReason::Complete)
        );
    }
}
