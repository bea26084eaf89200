//! Consumer trait abstractions.
//!
//! Output formatting is a side-channel concern: the dispatcher and the
//! subscription machine emit decoded units through these traits and never
//! print anything themselves. Console implementations live in
//! [`crate::console`].

use async_trait::async_trait;
use serde_json::Value;

use crate::sse::SseEvent;

/// Per-event consumer for the SSE dispatch loop.
///
/// `handle` may suspend. Whatever the handler does with `data` - including
/// parsing it as JSON - is its own business; a failed interpretation must be
/// absorbed by the handler and never aborts the surrounding dispatch loop,
/// which the `()` return enforces.
#[async_trait]
pub trait SseHandler: Send {
    async fn handle(&mut self, event: SseEvent);
}

/// Per-message consumer for an active websocket subscription.
#[async_trait]
pub trait SubscriptionObserver: Send {
    /// A `next` frame for the active subscription; `data` is the GraphQL
    /// payload's `data` member.
    async fn on_next(&mut self, data: Value);

    /// An `error` frame for the active subscription. The machine terminates
    /// after delivering it.
    async fn on_error(&mut self, payload: Value);

    /// A frame whose `type` the machine does not recognize. Forwarded for
    /// visibility; the subscription stays active.
    async fn on_unknown(&mut self, raw: String);
}
