//! Decoded SSE event type.

use serde::{Deserialize, Serialize};

/// One decoded unit from an SSE stream.
///
/// Exactly one event is produced per contiguous block of non-blank lines.
/// `data` joins multiple `data:` lines with `\n` and trims the trailing
/// newline; a block without any `data:` lines yields an empty string, not a
/// missing field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SseEvent {
    /// Event name from an `event:` line; `None` means the default event.
    pub event_type: Option<String>,
    /// Server-assigned event identifier from an `id:` line.
    pub id: Option<String>,
    /// Annotation from a `:` comment line.
    pub comment: Option<String>,
    /// Payload, possibly multi-line. Opaque to the parser; consumers decide
    /// whether to treat it as JSON.
    pub data: String,
}

impl SseEvent {
    /// True when no directive line contributed anything to this event.
    pub fn is_empty(&self) -> bool {
        self.event_type.is_none() && self.id.is_none() && self.comment.is_none() && self.data.is_empty()
    }
}
