//! SSE dispatch loop.
//!
//! Composes the block reader and the frame parser: one decoded event per
//! block, delivered to an [`SseHandler`] in strict arrival order.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info};

use crate::sse::{parse_event_block, BlockReader};
use crate::traits::{LineSource, SseHandler, StreamError};

/// Why the dispatch loop stopped, when it stopped cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The underlying stream ended.
    StreamEnded,
    /// The shutdown flag was observed at a block boundary.
    Cancelled,
}

/// Drives a line stream through the block reader and frame parser,
/// delivering each event to the handler.
///
/// The shutdown flag is checked at block boundaries only - never mid-line -
/// so a block that has already been parsed is always delivered before
/// cancellation takes effect. Handler failures are the handler's own; only
/// transport errors abort the loop.
pub struct SseDispatcher<S> {
    reader: BlockReader<S>,
    shutdown: Arc<AtomicBool>,
}

impl<S: LineSource> SseDispatcher<S> {
    pub fn new(source: S) -> Self {
        Self::with_shutdown(source, Arc::new(AtomicBool::new(false)))
    }

    /// Create a dispatcher wired to an external shutdown flag.
    pub fn with_shutdown(source: S, shutdown: Arc<AtomicBool>) -> Self {
        Self {
            reader: BlockReader::new(source),
            shutdown,
        }
    }

    /// Run until the stream ends, the shutdown flag is set, or the
    /// transport fails.
    pub async fn run<H: SseHandler>(mut self, handler: &mut H) -> Result<DispatchOutcome, StreamError> {
        loop {
            if self.shutdown.load(Ordering::SeqCst) {
                info!("shutdown flag set, stopping SSE dispatch");
                return Ok(DispatchOutcome::Cancelled);
            }
            match self.reader.next_block().await? {
                None => {
                    debug!("SSE stream ended");
                    return Ok(DispatchOutcome::StreamEnded);
                }
                Some(block) => {
                    let event = parse_event_block(&block);
                    handler.handle(event).await;
                }
            }
        }
    }
}
