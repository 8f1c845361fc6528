//! Connection target and plugin settings.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Metric key prefix used when none (or an empty one) is configured.
pub const DEFAULT_PREFIX: &str = "redis";

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 6379;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Where the Redis server listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Tcp { host: String, port: u16 },
    Unix(PathBuf),
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Tcp { host, port } => write!(f, "{}:{}", host, port),
            Target::Unix(path) => write!(f, "unix:{}", path.display()),
        }
    }
}

/// Settings for one plugin invocation.
///
/// Defaults: `localhost:6379`, no password, 5 second timeout, prefix `redis`.
#[derive(Debug, Clone)]
pub struct RedisConfig {
    target: Target,
    password: Option<String>,
    timeout: Duration,
    prefix: String,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            target: Target::Tcp {
                host: DEFAULT_HOST.to_string(),
                port: DEFAULT_PORT,
            },
            password: None,
            timeout: DEFAULT_TIMEOUT,
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }
}

impl RedisConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connects over TCP to `host:port`.
    pub fn with_tcp(mut self, host: impl Into<String>, port: u16) -> Self {
        self.target = Target::Tcp {
            host: host.into(),
            port,
        };
        self
    }

    /// Connects through a Unix domain socket. Overrides any TCP target.
    pub fn with_socket(mut self, path: impl Into<PathBuf>) -> Self {
        self.target = Target::Unix(path.into());
        self
    }

    /// Sets the password sent during the handshake. An empty string means no password.
    pub fn with_password(mut self, password: Option<String>) -> Self {
        self.password = password.filter(|p| !p.is_empty());
        self
    }

    /// Sets the connect/read/write timeout. Must be non-zero.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the metric key prefix. An empty prefix falls back to `redis`.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.prefix = if prefix.is_empty() {
            DEFAULT_PREFIX.to_string()
        } else {
            prefix
        };
        self
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn metric_key_prefix(&self) -> &str {
        &self.prefix
    }

    /// Password to authenticate with.
    ///
    /// Socket connections never authenticate; the password only applies to TCP.
    pub fn effective_password(&self) -> Option<&str> {
        match self.target {
            Target::Tcp { .. } => self.password.as_deref(),
            Target::Unix(_) => None,
        }
    }
}
