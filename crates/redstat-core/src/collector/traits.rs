//! Abstraction over the Redis transport to enable testing and mocking.
//!
//! The `Connector` trait lets the collector talk to a live server through
//! `RedisConnector` or to an in-memory `MockConnector` in tests.

use std::collections::HashMap;

/// Error returned by a `Connector`.
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectorError {
    /// Connection could not be established, was dropped or timed out.
    Connection(String),
    /// Server rejected the credentials.
    Auth(String),
    /// Server answered with an error or with a reply of an unexpected shape.
    Command(String),
}

impl std::fmt::Display for ConnectorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectorError::Connection(msg) => write!(f, "redis connection error: {}", msg),
            ConnectorError::Auth(msg) => write!(f, "redis authentication failed: {}", msg),
            ConnectorError::Command(msg) => write!(f, "redis command error: {}", msg),
        }
    }
}

impl std::error::Error for ConnectorError {}

/// Commands the collector needs from a Redis server.
///
/// Each call is one blocking round-trip. Timeouts are the implementation's
/// concern and surface as `ConnectorError::Connection`.
pub trait Connector {
    /// Runs `INFO` and returns the raw text reply.
    fn info(&mut self) -> Result<String, ConnectorError>;

    /// Runs `CONFIG GET <parameter>` and returns the reply as a name/value map.
    ///
    /// An unknown parameter yields an empty map, not an error.
    fn config_get(&mut self, parameter: &str) -> Result<HashMap<String, String>, ConnectorError>;
}
