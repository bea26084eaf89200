//! gqlsub - console client for GraphQL queries and subscriptions.
//!
//! Two subscription transports are supported: a websocket carrying the
//! graphql-ws protocol ([`subscription`]) and an HTTP response streaming
//! Server-Sent Events ([`sse`]). Everything else - HTTP plumbing, tokens,
//! config, console formatting - is a collaborator around that core.

pub mod auth;
pub mod config;
pub mod console;
pub mod graphql;
pub mod sse;
pub mod subscription;
pub mod traits;
