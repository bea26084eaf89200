//! SSE frame parsing.
//!
//! Pure functions: an ordered block of lines in, one [`SseEvent`] out.
//! Parsing never fails; malformed input degrades to an all-empty event.

use crate::sse::SseEvent;

/// A single classified SSE line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseLine {
    /// `: <text>`, trimmed.
    Comment(String),
    /// `event: <name>`, trimmed.
    Event(String),
    /// `id: <id>`, trimmed.
    Id(String),
    /// `data: <chunk>`, left-trimmed only - trailing whitespace is payload.
    Data(String),
    /// Empty or whitespace-only.
    Blank,
    /// No recognized directive prefix; discarded.
    Unknown,
}

/// Classify a single SSE line by its directive prefix.
///
/// Checks run in order; the first match wins, so `: event: x` is a comment,
/// not an event line.
pub fn classify_line(line: &str) -> SseLine {
    if line.trim().is_empty() {
        return SseLine::Blank;
    }
    if let Some(rest) = line.strip_prefix(':') {
        return SseLine::Comment(rest.trim().to_string());
    }
    if let Some(rest) = line.strip_prefix("event:") {
        return SseLine::Event(rest.trim().to_string());
    }
    if let Some(rest) = line.strip_prefix("id:") {
        return SseLine::Id(rest.trim().to_string());
    }
    if let Some(rest) = line.strip_prefix("data:") {
        return SseLine::Data(rest.trim_start().to_string());
    }
    SseLine::Unknown
}

/// Parse one block of non-blank lines into an event.
///
/// Repeated `event:`, `id:` and comment lines overwrite - last wins.
/// `data:` lines accumulate in input order, joined with `\n`; the final
/// trailing `\n`/`\r` is stripped.
pub fn parse_event_block<I, S>(lines: I) -> SseEvent
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut event = SseEvent::default();
    let mut data = String::new();

    for line in lines {
        match classify_line(line.as_ref()) {
            SseLine::Comment(text) => event.comment = Some(text),
            SseLine::Event(name) => event.event_type = Some(name),
            SseLine::Id(id) => event.id = Some(id),
            SseLine::Data(chunk) => {
                data.push_str(&chunk);
                data.push('\n');
            }
            SseLine::Blank | SseLine::Unknown => {}
        }
    }

    event.data = data.trim_end_matches(&['\n', '\r'][..]).to_string();
    event
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_directive_prefixes() {
        assert_eq!(classify_line(": keep-alive"), SseLine::Comment("keep-alive".to_string()));
        assert_eq!(classify_line("event: update"), SseLine::Event("update".to_string()));
        assert_eq!(classify_line("id: 42"), SseLine::Id("42".to_string()));
        assert_eq!(classify_line("data: {\"a\":1}"), SseLine::Data("{\"a\":1}".to_string()));
        assert_eq!(classify_line("   "), SseLine::Blank);
        assert_eq!(classify_line("retry: 3000"), SseLine::Unknown);
    }

    #[test]
    fn comment_wins_over_later_prefixes() {
        // The colon check runs first, so this is a comment.
        assert_eq!(
            classify_line(": event: fake"),
            SseLine::Comment("event: fake".to_string())
        );
    }

    #[test]
    fn data_is_left_trimmed_only() {
        assert_eq!(classify_line("data:  padded  "), SseLine::Data("padded  ".to_string()));
    }

    #[test]
    fn multiple_data_lines_join_with_newlines() {
        let event = parse_event_block(["data: a", "data: b", "data: c"]);
        assert_eq!(event.data, "a\nb\nc");
    }

    #[test]
    fn comment_only_block_sets_only_comment() {
        let event = parse_event_block([": just a comment"]);
        assert_eq!(event.comment.as_deref(), Some("just a comment"));
        assert!(event.event_type.is_none());
        assert!(event.id.is_none());
        assert_eq!(event.data, "");
    }

    #[test]
    fn last_event_line_wins() {
        let event = parse_event_block(["event: first", "data: x", "event: second"]);
        assert_eq!(event.event_type.as_deref(), Some("second"));
    }

    #[test]
    fn full_block_decodes_every_field() {
        let event = parse_event_block(["event: update", "id: 7", ": note", "data: {\"n\":1}"]);
        assert_eq!(event.event_type.as_deref(), Some("update"));
        assert_eq!(event.id.as_deref(), Some("7"));
        assert_eq!(event.comment.as_deref(), Some("note"));
        assert_eq!(event.data, "{\"n\":1}");
    }

    #[test]
    fn unrecognized_lines_are_discarded() {
        let event = parse_event_block(["retry: 3000", "garbage", "data: kept"]);
        assert_eq!(event.data, "kept");
        assert!(event.event_type.is_none());
    }

    #[test]
    fn empty_input_yields_empty_event() {
        let event = parse_event_block(Vec::<String>::new());
        assert!(event.is_empty());
        assert_eq!(event.data, "");
    }

    #[test]
    fn block_with_no_directives_yields_empty_event() {
        let event = parse_event_block(["nothing here", "or here"]);
        assert!(event.is_empty());
    }
}
