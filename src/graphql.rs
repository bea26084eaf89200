//! GraphQL HTTP client.
//!
//! One-shot queries and SSE subscription requests over `reqwest`. The SSE
//! body comes back as a [`LineSource`] ready for the dispatcher; this module
//! never interprets the stream itself.

use futures::TryStreamExt;
use reqwest::header;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

use crate::sse::ByteStreamLines;

#[derive(Debug, Error)]
pub enum GqlError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("response has no data member: {0}")]
    MissingData(String),
}

/// Thin client over a GraphQL HTTP endpoint.
#[derive(Debug, Clone, Default)]
pub struct GraphQlClient {
    http: reqwest::Client,
    bearer_token: Option<String>,
}

impl GraphQlClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a bearer token to every request.
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    fn post(&self, endpoint: &str) -> reqwest::RequestBuilder {
        let mut builder = self.http.post(endpoint);
        if let Some(token) = &self.bearer_token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// Run a one-shot query and return the response `data` member.
    pub async fn query(&self, endpoint: &str, query: &str) -> Result<Value, GqlError> {
        debug!(%endpoint, "sending GraphQL query");
        let response = self.post(endpoint).json(&json!({ "query": query })).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GqlError::Status {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let body: Value = response.json().await?;
        body.get("data")
            .cloned()
            .ok_or_else(|| GqlError::MissingData(body.to_string()))
    }

    /// Start a subscription over the streaming-push transport.
    ///
    /// Posts the subscription document with `Accept: text/event-stream` and
    /// returns the response body as a line source. Callers hand it to an
    /// [`crate::sse::SseDispatcher`].
    pub async fn subscribe_sse(&self, endpoint: &str, query: &str) -> Result<ByteStreamLines, GqlError> {
        debug!(%endpoint, "starting SSE subscription");
        let response = self
            .post(endpoint)
            .header(header::ACCEPT, "text/event-stream")
            .json(&json!({ "query": query }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GqlError::Status {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        Ok(ByteStreamLines::new(response.bytes_stream().map_err(GqlError::Http)))
    }
}
