//! Blank-line delimited block reassembly.
//!
//! [`BlockReader`] turns a stream of lines into a sequence of blocks: runs
//! of non-blank lines separated by blank lines. It performs no buffering
//! beyond the block currently being accumulated, and it flushes a trailing
//! partial block when the stream ends without a final blank line.
//!
//! Two [`LineSource`] implementations live here as well: one over any
//! [`tokio::io::AsyncBufRead`], one over a stream of byte chunks as handed
//! back by `reqwest`.

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use futures::{Stream, StreamExt};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

use crate::traits::{LineSource, StreamError};

/// Reassembles blank-line delimited blocks from a line source.
///
/// Each call to [`next_block`](Self::next_block) suspends on the underlying
/// source as needed and returns the next completed block, or `None` once the
/// stream is exhausted.
pub struct BlockReader<S> {
    source: S,
}

impl<S: LineSource> BlockReader<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Read lines until a blank-line delimiter or end of stream.
    ///
    /// Blank lines with nothing accumulated are skipped, so consecutive
    /// delimiters never produce empty blocks. End of stream with a non-empty
    /// buffer flushes it as a final block; after that, `Ok(None)`.
    pub async fn next_block(&mut self) -> Result<Option<Vec<String>>, StreamError> {
        let mut block = Vec::new();
        loop {
            match self.source.next_line().await? {
                None => {
                    return Ok(if block.is_empty() { None } else { Some(block) });
                }
                Some(line) if line.trim().is_empty() => {
                    if !block.is_empty() {
                        return Ok(Some(block));
                    }
                }
                Some(line) => block.push(line),
            }
        }
    }
}

/// [`LineSource`] over any buffered async reader.
pub struct BufReadLines<R> {
    lines: Lines<R>,
}

impl<R> BufReadLines<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }
}

#[async_trait]
impl<R> LineSource for BufReadLines<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn next_line(&mut self) -> Result<Option<String>, StreamError> {
        self.lines
            .next_line()
            .await
            .map_err(|e| StreamError::Read(e.to_string()))
    }
}

/// [`LineSource`] over a stream of byte chunks.
///
/// Chunk boundaries carry no meaning: a line may span several chunks and a
/// chunk may carry several lines. Splits on `\n`, strips one trailing `\r`,
/// and flushes a final unterminated line at end of stream.
pub struct ByteStreamLines {
    chunks: BoxStream<'static, Result<Bytes, StreamError>>,
    buf: Vec<u8>,
    done: bool,
}

impl ByteStreamLines {
    pub fn new<S, E>(chunks: S) -> Self
    where
        S: Stream<Item = Result<Bytes, E>> + Send + 'static,
        E: std::fmt::Display,
    {
        Self {
            chunks: chunks
                .map(|item| item.map_err(|e| StreamError::Read(e.to_string())))
                .boxed(),
            buf: Vec::new(),
            done: false,
        }
    }

    fn take_buffered_line(&mut self) -> Option<String> {
        let pos = self.buf.iter().position(|&b| b == b'\n')?;
        let mut line: Vec<u8> = self.buf.drain(..=pos).collect();
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        Some(String::from_utf8_lossy(&line).into_owned())
    }
}

#[async_trait]
impl LineSource for ByteStreamLines {
    async fn next_line(&mut self) -> Result<Option<String>, StreamError> {
        loop {
            if let Some(line) = self.take_buffered_line() {
                return Ok(Some(line));
            }
            if self.done {
                if self.buf.is_empty() {
                    return Ok(None);
                }
                let mut line = std::mem::take(&mut self.buf);
                if line.last() == Some(&b'\r') {
                    line.pop();
                }
                return Ok(Some(String::from_utf8_lossy(&line).into_owned()));
            }
            match self.chunks.next().await {
                Some(Ok(chunk)) => self.buf.extend_from_slice(&chunk),
                Some(Err(e)) => return Err(e),
                None => self.done = true,
            }
        }
    }
}
