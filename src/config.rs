//! Application configuration.
//!
//! Loaded from a JSON file (`gqlsub.json` next to the binary, or the path
//! named by `GQLSUB_CONFIG`). A missing file falls back to defaults so the
//! local-development loop needs no setup.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Environment variable naming an alternate config path.
pub const CONFIG_ENV: &str = "GQLSUB_CONFIG";

/// Default config file name.
pub const CONFIG_FILE: &str = "gqlsub.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    /// GraphQL HTTP endpoint, used for queries and SSE subscriptions.
    pub endpoint: String,
    /// Websocket endpoint; derived from `endpoint` when absent.
    pub ws_endpoint: Option<String>,
    /// Token endpoint; no bearer token is attached when absent.
    pub token_endpoint: Option<String>,
    /// Application name passed to the token endpoint.
    pub application: Option<String>,
    /// Bound on the connection_ack wait, in seconds.
    pub ack_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:9400/".to_string(),
            ws_endpoint: None,
            token_endpoint: None,
            application: None,
            ack_timeout_secs: 30,
        }
    }
}

impl AppConfig {
    /// Load from an explicit path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Load from `GQLSUB_CONFIG` or `gqlsub.json`, defaulting when the file
    /// does not exist. A file that exists but does not parse is an error.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| CONFIG_FILE.to_string());
        let path = Path::new(&path);
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Set the GraphQL endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the websocket endpoint explicitly.
    pub fn with_ws_endpoint(mut self, ws_endpoint: impl Into<String>) -> Self {
        self.ws_endpoint = Some(ws_endpoint.into());
        self
    }

    /// The websocket endpoint, derived from the HTTP endpoint when not set.
    pub fn ws_endpoint(&self) -> String {
        self.ws_endpoint
            .clone()
            .unwrap_or_else(|| derive_ws_endpoint(&self.endpoint))
    }

    pub fn ack_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.ack_timeout_secs)
    }
}

/// `http://` becomes `ws://`, `https://` becomes `wss://`. Anything else is
/// passed through untouched.
fn derive_ws_endpoint(endpoint: &str) -> String {
    if let Some(rest) = endpoint.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = endpoint.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        endpoint.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_ws_endpoint_from_http() {
        let config = AppConfig::default().with_endpoint("http://localhost:9400/");
        assert_eq!(config.ws_endpoint(), "ws://localhost:9400/");
    }

    #[test]
    fn derives_wss_endpoint_from_https() {
        let config = AppConfig::default().with_endpoint("https://api.example.com/graphql");
        assert_eq!(config.ws_endpoint(), "wss://api.example.com/graphql");
    }

    #[test]
    fn explicit_ws_endpoint_wins() {
        let config = AppConfig::default()
            .with_endpoint("http://localhost:9400/")
            .with_ws_endpoint("ws://other:1234/");
        assert_eq!(config.ws_endpoint(), "ws://other:1234/");
    }

    #[test]
    fn loads_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, r#"{"endpoint":"http://files/","ackTimeoutSecs":5}"#).unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.endpoint, "http://files/");
        assert_eq!(config.ack_timeout(), std::time::Duration::from_secs(5));
    }

    #[test]
    fn unparseable_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(AppConfig::load(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn partial_config_file_fills_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"endpoint": "http://example.com/"}"#).unwrap();
        assert_eq!(config.endpoint, "http://example.com/");
        assert_eq!(config.ack_timeout_secs, 30);
        assert!(config.token_endpoint.is_none());
    }
}
