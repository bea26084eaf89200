//! Line source trait abstraction.
//!
//! A [`LineSource`] hands back one line of text per call, without its
//! terminator. The SSE block reader consumes lines through this seam so it
//! can sit on top of a buffered reader, an HTTP byte stream, or a test
//! fixture without caring which.

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised while reading from an underlying line-oriented stream.
#[derive(Debug, Clone, Error)]
pub enum StreamError {
    /// The underlying transport failed mid-stream.
    #[error("stream read failed: {0}")]
    Read(String),
}

/// One line at a time from a streaming transport.
///
/// Each call may suspend while waiting on the transport. `Ok(None)` marks
/// end of stream and is sticky: once returned, every later call returns it
/// again.
#[async_trait]
pub trait LineSource: Send {
    /// Read the next line, without its trailing `\n` / `\r\n`.
    async fn next_line(&mut self) -> Result<Option<String>, StreamError>;
}
