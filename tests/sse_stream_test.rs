//! End-to-end SSE tests: byte chunks in, decoded events out.

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;

use gqlsub::sse::{ByteStreamLines, DispatchOutcome, SseDispatcher, SseEvent};
use gqlsub::traits::{SseHandler, StreamError};

fn chunked(chunks: &'static [&'static [u8]]) -> ByteStreamLines {
    let stream = futures::stream::iter(
        chunks
            .iter()
            .map(|chunk| Ok::<_, StreamError>(Bytes::from_static(*chunk))),
    );
    ByteStreamLines::new(stream)
}

/// Handler that interprets each event's `data` as JSON, keeping its own
/// failures to itself as a consumer must.
#[derive(Default)]
struct JsonConsumer {
    parsed: Vec<Result<Value, String>>,
}

#[async_trait]
impl SseHandler for JsonConsumer {
    async fn handle(&mut self, event: SseEvent) {
        self.parsed
            .push(serde_json::from_str(&event.data).map_err(|e| e.to_string()));
    }
}

#[tokio::test]
async fn events_flow_from_chunks_to_handler() {
    // Chunk boundaries deliberately cut through lines and blocks.
    let source = chunked(&[
        b"event: position\ndata: {\"user",
        b"Id\":\"u1\",\"position\":4}\n",
        b"\nevent: position\r\ndata: {\"userId\":\"u2\",\"position\":7}\r\n\r\n",
    ]);
    let mut consumer = JsonConsumer::default();

    let outcome = SseDispatcher::new(source).run(&mut consumer).await.unwrap();

    assert_eq!(outcome, DispatchOutcome::StreamEnded);
    assert_eq!(consumer.parsed.len(), 2);
    let first = consumer.parsed[0].as_ref().unwrap();
    assert_eq!(first["userId"], "u1");
    let second = consumer.parsed[1].as_ref().unwrap();
    assert_eq!(second["position"], 7);
}

#[tokio::test]
async fn malformed_payload_does_not_stop_later_events() {
    let source = chunked(&[b"data: {broken json\n\ndata: {\"ok\":true}\n"]);
    let mut consumer = JsonConsumer::default();

    let outcome = SseDispatcher::new(source).run(&mut consumer).await.unwrap();

    assert_eq!(outcome, DispatchOutcome::StreamEnded);
    assert_eq!(consumer.parsed.len(), 2);
    assert!(consumer.parsed[0].is_err());
    assert_eq!(consumer.parsed[1].as_ref().unwrap()["ok"], true);
}

/// Handler that keeps whole events, for asserting field decoding.
#[derive(Default)]
struct Collector {
    events: Vec<SseEvent>,
}

#[async_trait]
impl SseHandler for Collector {
    async fn handle(&mut self, event: SseEvent) {
        self.events.push(event);
    }
}

#[tokio::test]
async fn multi_line_data_and_metadata_survive_the_pipeline() {
    let source = chunked(&[
        b": stream opened\nevent: doc\nid: 17\ndata: line one\ndata: line two\n\n",
        b"data: tail without delimiter",
    ]);
    let mut collector = Collector::default();

    SseDispatcher::new(source).run(&mut collector).await.unwrap();

    assert_eq!(collector.events.len(), 2);
    let first = &collector.events[0];
    assert_eq!(first.comment.as_deref(), Some("stream opened"));
    assert_eq!(first.event_type.as_deref(), Some("doc"));
    assert_eq!(first.id.as_deref(), Some("17"));
    assert_eq!(first.data, "line one\nline two");
    // The unterminated final block is flushed, not lost.
    assert_eq!(collector.events[1].data, "tail without delimiter");
}

#[tokio::test]
async fn transport_failure_mid_stream_surfaces_after_delivered_events() {
    let stream = futures::stream::iter(vec![
        Ok(Bytes::from_static(b"data: first\n\n")),
        Err(StreamError::Read("connection reset".to_string())),
    ]);
    let source = ByteStreamLines::new(stream);
    let mut collector = Collector::default();

    let result = SseDispatcher::new(source).run(&mut collector).await;

    assert!(result.is_err());
    assert_eq!(collector.events.len(), 1, "events before the failure are delivered");
}
