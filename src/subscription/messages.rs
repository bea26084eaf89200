//! graphql-ws wire messages.
//!
//! Every frame is a JSON object tagged by `type`. Outbound frames are
//! `connection_init` and `subscribe`; inbound frames are `connection_ack`,
//! `next`, `error` and `complete`. Anything else decodes to
//! [`SubscriptionMessage::Unknown`] - unrecognized control messages are not
//! an error, just not actionable.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Outbound frames sent by the client.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    ConnectionInit { payload: Value },
    Subscribe { id: String, payload: SubscribePayload },
}

/// Payload of a `subscribe` frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscribePayload {
    pub query: String,
}

impl ClientMessage {
    /// `connection_init` with an empty payload object.
    pub fn connection_init() -> Self {
        ClientMessage::ConnectionInit { payload: json!({}) }
    }

    /// `subscribe` carrying the subscription id and query document.
    pub fn subscribe(id: impl Into<String>, query: impl Into<String>) -> Self {
        ClientMessage::Subscribe {
            id: id.into(),
            payload: SubscribePayload { query: query.into() },
        }
    }

    /// Encode as a single text frame.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Inbound frames in their raw wire shape.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WireMessage {
    // Unit variant: an ack payload is allowed on the wire and ignored.
    ConnectionAck,
    Next {
        id: String,
        payload: NextPayload,
    },
    Error {
        id: String,
        payload: Value,
    },
    Complete {
        id: String,
    },
}

/// Payload of a `next` frame: `{ "data": <object> }`.
#[derive(Debug, Clone, Deserialize)]
struct NextPayload {
    #[serde(default)]
    data: Option<Value>,
}

/// One decoded inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum SubscriptionMessage {
    ConnectionAck,
    Next { id: String, data: Option<Value> },
    Error { id: String, payload: Value },
    Complete { id: String },
    /// Frame whose `type` is unrecognized, or which did not decode at all.
    Unknown { raw: String },
}

/// Decode one text frame.
///
/// Never fails: frames with an unknown `type`, missing required fields, or
/// broken JSON all map to [`SubscriptionMessage::Unknown`] so the receive
/// loop can stay forward-compatible.
pub fn decode(raw: &str) -> SubscriptionMessage {
    match serde_json::from_str::<WireMessage>(raw) {
        Ok(WireMessage::ConnectionAck) => SubscriptionMessage::ConnectionAck,
        Ok(WireMessage::Next { id, payload }) => SubscriptionMessage::Next { id, data: payload.data },
        Ok(WireMessage::Error { id, payload }) => SubscriptionMessage::Error { id, payload },
        Ok(WireMessage::Complete { id }) => SubscriptionMessage::Complete { id },
        Err(_) => SubscriptionMessage::Unknown { raw: raw.to_string() },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_init_serializes_with_empty_payload() {
        let json = ClientMessage::connection_init().to_json().unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["type"], "connection_init");
        assert_eq!(value["payload"], json!({}));
    }

    #[test]
    fn subscribe_carries_id_and_query() {
        let json = ClientMessage::subscribe("sub-1", "subscription { beanCounter }")
            .to_json()
            .unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["type"], "subscribe");
        assert_eq!(value["id"], "sub-1");
        assert_eq!(value["payload"]["query"], "subscription { beanCounter }");
    }

    #[test]
    fn decodes_connection_ack() {
        assert_eq!(decode(r#"{"type":"connection_ack"}"#), SubscriptionMessage::ConnectionAck);
        // An ack payload is allowed and ignored.
        assert_eq!(
            decode(r#"{"type":"connection_ack","payload":{"ok":true}}"#),
            SubscriptionMessage::ConnectionAck
        );
    }

    #[test]
    fn decodes_next_with_data() {
        let msg = decode(r#"{"type":"next","id":"s1","payload":{"data":{"beanCounter":3}}}"#);
        assert_eq!(
            msg,
            SubscriptionMessage::Next {
                id: "s1".to_string(),
                data: Some(json!({"beanCounter": 3})),
            }
        );
    }

    #[test]
    fn next_without_data_member_decodes_with_none() {
        let msg = decode(r#"{"type":"next","id":"s1","payload":{}}"#);
        assert_eq!(
            msg,
            SubscriptionMessage::Next {
                id: "s1".to_string(),
                data: None,
            }
        );
    }

    #[test]
    fn decodes_error_and_complete() {
        let msg = decode(r#"{"type":"error","id":"s1","payload":[{"message":"boom"}]}"#);
        assert_eq!(
            msg,
            SubscriptionMessage::Error {
                id: "s1".to_string(),
                payload: json!([{"message": "boom"}]),
            }
        );
        assert_eq!(
            decode(r#"{"type":"complete","id":"s1"}"#),
            SubscriptionMessage::Complete { id: "s1".to_string() }
        );
    }

    #[test]
    fn unknown_type_maps_to_unknown() {
        let raw = r#"{"type":"ka"}"#;
        assert_eq!(decode(raw), SubscriptionMessage::Unknown { raw: raw.to_string() });
    }

    #[test]
    fn broken_json_maps_to_unknown() {
        let raw = "not json at all";
        assert_eq!(decode(raw), SubscriptionMessage::Unknown { raw: raw.to_string() });
    }

    #[test]
    fn next_without_id_maps_to_unknown() {
        let raw = r#"{"type":"next","payload":{"data":{}}}"#;
        assert!(matches!(decode(raw), SubscriptionMessage::Unknown { .. }));
    }
}
