//! Websocket transport over tokio-tungstenite.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use crate::traits::{SubscriptionTransport, TransportError};

const SUBPROTOCOL: &str = "graphql-ws";

/// Production [`SubscriptionTransport`] over a websocket.
///
/// tungstenite reassembles fragmented messages internally, so `recv` always
/// hands back complete text frames.
pub struct WsTransport {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WsTransport {
    /// Open a websocket to the subscription endpoint, negotiating the
    /// graphql-ws subprotocol.
    pub async fn connect(url: &str) -> Result<Self, TransportError> {
        let mut request = url
            .into_client_request()
            .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;
        request
            .headers_mut()
            .insert("Sec-WebSocket-Protocol", HeaderValue::from_static(SUBPROTOCOL));

        let (stream, _response) = connect_async(request)
            .await
            .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;
        info!(%url, "websocket connected");

        Ok(Self { stream })
    }
}

#[async_trait]
impl SubscriptionTransport for WsTransport {
    async fn send(&mut self, text: String) -> Result<(), TransportError> {
        self.stream
            .send(Message::Text(text))
            .await
            .map_err(|e| TransportError::SendFailed(e.to_string()))
    }

    async fn recv(&mut self) -> Result<Option<String>, TransportError> {
        loop {
            match self.stream.next().await {
                None => return Ok(None),
                Some(Ok(Message::Text(text))) => return Ok(Some(text)),
                Some(Ok(Message::Close(frame))) => {
                    debug!(?frame, "received close frame");
                    return Ok(None);
                }
                Some(Ok(Message::Ping(data))) => {
                    // Keep the connection alive; not a protocol message.
                    let _ = self.stream.send(Message::Pong(data)).await;
                }
                Some(Ok(other)) => {
                    warn!(kind = ?other, "ignoring non-text websocket message");
                }
                Some(Err(e)) => return Err(TransportError::RecvFailed(e.to_string())),
            }
        }
    }

    async fn close(&mut self) {
        let _ = self.stream.close(None).await;
    }
}
