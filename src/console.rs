//! Console consumers.
//!
//! Formatting lives here, behind the handler traits, so the protocol core
//! stays free of output calls. JSON interpretation of `data` happens here
//! too - and its failures stay here: a non-JSON payload is printed raw and
//! the stream carries on.

use async_trait::async_trait;
use serde_json::Value;

use crate::sse::SseEvent;
use crate::traits::{SseHandler, SubscriptionObserver};

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Prints each SSE event to stdout.
#[derive(Debug, Default)]
pub struct ConsoleSseHandler;

#[async_trait]
impl SseHandler for ConsoleSseHandler {
    async fn handle(&mut self, event: SseEvent) {
        if let Some(event_type) = &event.event_type {
            println!("[event: {event_type}]");
        }
        if let Some(id) = &event.id {
            println!("[id: {id}]");
        }
        if let Some(comment) = &event.comment {
            println!("[comment: {comment}]");
        }
        if !event.data.is_empty() {
            match serde_json::from_str::<Value>(&event.data) {
                Ok(doc) => println!("{}", pretty(&doc)),
                Err(_) => println!("Non-JSON event data: {}", event.data),
            }
        }
    }
}

/// Prints each subscription message to stdout.
#[derive(Debug, Default)]
pub struct ConsoleSubscriptionObserver;

#[async_trait]
impl SubscriptionObserver for ConsoleSubscriptionObserver {
    async fn on_next(&mut self, data: Value) {
        println!("GraphQL subscription response:");
        println!("{}", pretty(&data));
    }

    async fn on_error(&mut self, payload: Value) {
        eprintln!("GraphQL subscription error:");
        eprintln!("{}", pretty(&payload));
    }

    async fn on_unknown(&mut self, raw: String) {
        eprintln!("Unrecognized subscription message: {raw}");
    }
}
