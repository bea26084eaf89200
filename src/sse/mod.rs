//! SSE (Server-Sent Events) stream handling.
//!
//! Reassembles a line-oriented event stream into discrete events:
//! - `event: <name>` - event type line
//! - `id: <id>` - server-assigned event id
//! - `data: <payload>` - data payload line(s), joined with `\n`
//! - `: <comment>` - non-semantic annotation
//! - Blank line - signals end of event
//!
//! # Module structure
//! - `event` - the decoded [`SseEvent`] type
//! - `parser` - pure block-to-event parsing ([`parse_event_block`])
//! - `reader` - blank-line delimited block reassembly ([`BlockReader`])
//! - `dispatcher` - drives reader + parser against a consumer ([`SseDispatcher`])

mod dispatcher;
mod event;
mod parser;
mod reader;

pub use dispatcher::{DispatchOutcome, SseDispatcher};
pub use event::SseEvent;
pub use parser::{classify_line, parse_event_block, SseLine};
pub use reader::{BlockReader, BufReadLines, ByteStreamLines};
