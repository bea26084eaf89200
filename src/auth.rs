//! Authorization token client.
//!
//! Fetches a bearer token from a token endpoint before opening the GraphQL
//! transports. Entirely outside the protocol core; the streaming components
//! only ever see the resulting header.

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("token endpoint returned status {0}")]
    Status(u16),
    #[error("token response carried no token")]
    MissingToken,
}

/// Shape of the token endpoint response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub token: Option<String>,
    #[serde(rename = "validUntil")]
    pub valid_until: Option<String>,
    pub user: Option<String>,
}

/// Client for the token endpoint.
#[derive(Debug, Clone)]
pub struct TokenClient {
    http: reqwest::Client,
    endpoint: String,
}

impl TokenClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Fetch a token scoped to the given application name.
    pub async fn fetch_token(&self, application: &str) -> Result<String, AuthError> {
        let url = format!("{}?applications={}", self.endpoint, application);
        let response = self.http.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::Status(status.as_u16()));
        }

        let body: TokenResponse = response.json().await?;
        if let Some(user) = &body.user {
            info!(%user, "token issued");
        }
        body.token
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::MissingToken)
    }
}
