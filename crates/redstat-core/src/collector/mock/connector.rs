//! In-memory connector for testing collectors without a Redis server.
//!
//! `MockConnector` answers `INFO` and `CONFIG GET` from canned replies and
//! records every command it receives, so tests can assert on round-trips.

use std::collections::HashMap;

use crate::collector::traits::{Connector, ConnectorError};

/// Connector serving canned replies.
///
/// Without an `INFO` reply configured, `info()` fails with a command error.
/// A `CONFIG GET` for an unconfigured parameter returns an empty map, like a
/// real server does for unknown parameters.
#[derive(Debug, Clone)]
pub struct MockConnector {
    info: Result<String, ConnectorError>,
    config: HashMap<String, Result<String, ConnectorError>>,
    commands: Vec<String>,
}

impl Default for MockConnector {
    fn default() -> Self {
        Self {
            info: Err(ConnectorError::Command("no INFO reply configured".to_string())),
            config: HashMap::new(),
            commands: Vec::new(),
        }
    }
}

impl MockConnector {
    /// Creates a connector with no replies configured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the text returned by `INFO`.
    pub fn with_info(mut self, reply: impl Into<String>) -> Self {
        self.info = Ok(reply.into());
        self
    }

    /// Makes `INFO` fail with `error`.
    pub fn with_info_error(mut self, error: ConnectorError) -> Self {
        self.info = Err(error);
        self
    }

    /// Sets the value returned by `CONFIG GET <parameter>`.
    pub fn with_config(mut self, parameter: &str, value: impl Into<String>) -> Self {
        self.config.insert(parameter.to_string(), Ok(value.into()));
        self
    }

    /// Makes `CONFIG GET <parameter>` fail with `error`.
    pub fn with_config_error(mut self, parameter: &str, error: ConnectorError) -> Self {
        self.config.insert(parameter.to_string(), Err(error));
        self
    }

    /// Commands received so far, in order (e.g. `"INFO"`, `"CONFIG GET maxmemory"`).
    pub fn commands(&self) -> &[String] {
        &self.commands
    }
}

impl Connector for MockConnector {
    fn info(&mut self) -> Result<String, ConnectorError> {
        self.commands.push("INFO".to_string());
        self.info.clone()
    }

    fn config_get(&mut self, parameter: &str) -> Result<HashMap<String, String>, ConnectorError> {
        self.commands.push(format!("CONFIG GET {}", parameter));
        match self.config.get(parameter) {
            Some(Ok(value)) => Ok(HashMap::from([(parameter.to_string(), value.clone())])),
            Some(Err(e)) => Err(e.clone()),
            None => Ok(HashMap::new()),
        }
    }
}
