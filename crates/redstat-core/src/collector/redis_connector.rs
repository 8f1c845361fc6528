//! Connector backed by a live Redis server.
//!
//! Uses the synchronous `redis` client. The client is opened without
//! credentials and with `CLIENT SETINFO` disabled, so the only round-trip
//! before the socket timeouts are set is the TCP connect itself. `AUTH` is
//! sent afterwards and is bounded like every other command.

use std::collections::HashMap;

use redis::{
    Client, Connection, ConnectionAddr, ConnectionInfo, ErrorKind, RedisConnectionInfo,
    RedisError,
};
use tracing::debug;

use super::traits::{Connector, ConnectorError};
use crate::config::{RedisConfig, Target};

/// A single open connection to a Redis server.
pub struct RedisConnector {
    connection: Connection,
}

impl RedisConnector {
    /// Opens a connection and authenticates if a password is configured.
    pub fn connect(config: &RedisConfig) -> Result<Self, ConnectorError> {
        let info = ConnectionInfo {
            addr: connection_addr(config.target())?,
            redis: RedisConnectionInfo::default(),
        };

        let client = Client::open(info).map_err(map_redis_error)?;
        let mut connection = client
            .get_connection_with_timeout(config.timeout())
            .map_err(map_redis_error)?;
        connection
            .set_read_timeout(Some(config.timeout()))
            .map_err(map_redis_error)?;
        connection
            .set_write_timeout(Some(config.timeout()))
            .map_err(map_redis_error)?;

        if let Some(password) = config.effective_password() {
            authenticate(&mut connection, password)?;
        }

        debug!(target_addr = %config.target(), "connected to redis");
        Ok(Self { connection })
    }
}

/// Sends `AUTH`. A server-side rejection is reported as `ConnectorError::Auth`.
fn authenticate(connection: &mut Connection, password: &str) -> Result<(), ConnectorError> {
    redis::cmd("AUTH")
        .arg(password)
        .query::<()>(connection)
        .map_err(|e| match map_redis_error(e) {
            ConnectorError::Command(msg) => ConnectorError::Auth(msg),
            other => other,
        })
}

impl Connector for RedisConnector {
    fn info(&mut self) -> Result<String, ConnectorError> {
        redis::cmd("INFO")
            .query::<String>(&mut self.connection)
            .map_err(map_redis_error)
    }

    fn config_get(&mut self, parameter: &str) -> Result<HashMap<String, String>, ConnectorError> {
        redis::cmd("CONFIG")
            .arg("GET")
            .arg(parameter)
            .query::<HashMap<String, String>>(&mut self.connection)
            .map_err(map_redis_error)
    }
}

fn connection_addr(target: &Target) -> Result<ConnectionAddr, ConnectorError> {
    match target {
        Target::Tcp { host, port } => Ok(ConnectionAddr::Tcp(host.clone(), *port)),
        #[cfg(unix)]
        Target::Unix(path) => Ok(ConnectionAddr::Unix(path.clone())),
        #[cfg(not(unix))]
        Target::Unix(_) => Err(ConnectorError::Connection(
            "unix sockets are not supported on this platform".to_string(),
        )),
    }
}

/// Classifies a client error into the connector error taxonomy.
fn map_redis_error(e: RedisError) -> ConnectorError {
    if e.kind() == ErrorKind::AuthenticationFailed {
        return ConnectorError::Auth(e.to_string());
    }
    if e.kind() == ErrorKind::IoError
        || e.kind() == ErrorKind::InvalidClientConfig
        || e.is_timeout()
        || e.is_connection_refusal()
        || e.is_connection_dropped()
    {
        return ConnectorError::Connection(e.to_string());
    }
    ConnectorError::Command(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    /// Listener whose backlog completes the TCP handshake but never replies.
    fn silent_server() -> (TcpListener, RedisConfig) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let config = RedisConfig::new()
            .with_tcp("127.0.0.1", port)
            .with_timeout(Duration::from_secs(1));
        (listener, config)
    }

    #[test]
    fn auth_failure_is_classified_as_auth() {
        let err = RedisError::from((ErrorKind::AuthenticationFailed, "Password authentication failed"));
        assert!(matches!(map_redis_error(err), ConnectorError::Auth(_)));
    }

    #[test]
    fn io_failure_is_classified_as_connection() {
        let err = RedisError::from(io::Error::new(io::ErrorKind::ConnectionRefused, "refused"));
        assert!(matches!(map_redis_error(err), ConnectorError::Connection(_)));

        let err = RedisError::from(io::Error::new(io::ErrorKind::TimedOut, "timed out"));
        assert!(matches!(map_redis_error(err), ConnectorError::Connection(_)));
    }

    #[test]
    fn server_error_is_classified_as_command() {
        let err = RedisError::from((ErrorKind::ResponseError, "unknown command 'CONFIG'"));
        assert!(matches!(map_redis_error(err), ConnectorError::Command(_)));

        let err = RedisError::from((ErrorKind::TypeError, "response was not a string"));
        assert!(matches!(map_redis_error(err), ConnectorError::Command(_)));
    }

    #[test]
    fn tcp_target_maps_to_tcp_addr() {
        let target = Target::Tcp {
            host: "127.0.0.1".to_string(),
            port: 6380,
        };
        assert!(matches!(
            connection_addr(&target).unwrap(),
            ConnectionAddr::Tcp(ref host, 6380) if host == "127.0.0.1"
        ));
    }

    #[cfg(unix)]
    #[test]
    fn unix_target_maps_to_unix_addr() {
        let target = Target::Unix("/tmp/redis.sock".into());
        assert!(matches!(
            connection_addr(&target).unwrap(),
            ConnectionAddr::Unix(ref path) if path.to_str() == Some("/tmp/redis.sock")
        ));
    }

    #[test]
    fn auth_against_silent_server_times_out() {
        let (_listener, config) = silent_server();
        let config = config.with_password(Some("secret".to_string()));

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let _ = tx.send(RedisConnector::connect(&config).err());
        });

        let err = rx
            .recv_timeout(Duration::from_secs(5))
            .expect("connect blocked past the configured timeout");
        assert!(matches!(err, Some(ConnectorError::Connection(_))));
    }

    #[test]
    fn info_against_silent_server_times_out() {
        let (_listener, config) = silent_server();

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let result = RedisConnector::connect(&config).and_then(|mut c| c.info());
            let _ = tx.send(result);
        });

        let result = rx
            .recv_timeout(Duration::from_secs(5))
            .expect("INFO blocked past the configured timeout");
        assert!(matches!(result, Err(ConnectorError::Connection(_))));
    }
}
