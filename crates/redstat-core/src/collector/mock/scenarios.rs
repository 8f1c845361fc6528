//! Pre-built mock connector scenarios for testing.
//!
//! These scenarios provide realistic server replies for the deployments
//! the plugin runs against.

use super::connector::MockConnector;
use crate::collector::capacity::{MAXCLIENTS, MAXMEMORY};
use crate::collector::traits::ConnectorError;

/// Minimal reply with two databases, memory and client counts.
pub const SIMPLE_INFO: &str = "db0:keys=10,expires=2,avg_ttl=0\r\n\
                               db1:keys=5,expires=1,avg_ttl=0\r\n\
                               used_memory:1000\r\n\
                               connected_clients:3\r\n";

/// Abridged `INFO` reply of a Redis 7 standalone server.
const TYPICAL_INFO: &str = "# Server\r\n\
redis_version:7.2.4\r\n\
redis_mode:standalone\r\n\
os:Linux 6.1.0-18-amd64 x86_64\r\n\
process_id:1\r\n\
tcp_port:6379\r\n\
uptime_in_seconds:86400\r\n\
executable:/data/redis-server\r\n\
\r\n\
# Clients\r\n\
connected_clients:12\r\n\
blocked_clients:1\r\n\
maxclients:10000\r\n\
\r\n\
# Memory\r\n\
used_memory:4194304\r\n\
used_memory_human:4.00M\r\n\
used_memory_rss:8388608\r\n\
used_memory_peak:5242880\r\n\
used_memory_lua:31744\r\n\
maxmemory:0\r\n\
maxmemory_policy:noeviction\r\n\
mem_fragmentation_ratio:2.00\r\n\
\r\n\
# Stats\r\n\
total_connections_received:1500\r\n\
total_commands_processed:250000\r\n\
rejected_connections:0\r\n\
expired_keys:57\r\n\
evicted_keys:0\r\n\
keyspace_hits:180000\r\n\
keyspace_misses:20000\r\n\
\r\n\
# Replication\r\n\
role:master\r\n\
connected_slaves:2\r\n\
\r\n\
# Keyspace\r\n\
db0:keys=1200,expires=300,avg_ttl=59000\r\n\
db3:keys=800,expires=20,avg_ttl=0\r\n";

impl MockConnector {
    /// Self-hosted server without a memory limit.
    ///
    /// `maxmemory` is 0 and `maxclients` is 10000.
    pub fn typical_server() -> Self {
        Self::new()
            .with_info(TYPICAL_INFO)
            .with_config(MAXMEMORY, "0")
            .with_config(MAXCLIENTS, "10000")
    }

    /// Self-hosted server with `maxmemory` set to 16 MiB.
    pub fn bounded_memory() -> Self {
        Self::new()
            .with_info(TYPICAL_INFO)
            .with_config(MAXMEMORY, "16777216")
            .with_config(MAXCLIENTS, "10000")
    }

    /// Managed deployment where `CONFIG` is disabled.
    pub fn managed_service() -> Self {
        let unsupported = || {
            ConnectorError::Command(
                "ERR unknown command 'CONFIG', with args beginning with: 'GET'".to_string(),
            )
        };
        Self::new()
            .with_info(TYPICAL_INFO)
            .with_config_error(MAXMEMORY, unsupported())
            .with_config_error(MAXCLIENTS, unsupported())
    }

    /// Freshly started server with no keys.
    pub fn empty_server() -> Self {
        Self::new()
            .with_info(
                "# Clients\r\nconnected_clients:1\r\n\r\n# Memory\r\nused_memory:866016\r\n\r\n# Keyspace\r\n",
            )
            .with_config(MAXMEMORY, "0")
            .with_config(MAXCLIENTS, "10000")
    }

    /// Server that closes the connection before answering `INFO`.
    pub fn unreachable() -> Self {
        Self::new().with_info_error(ConnectorError::Connection(
            "connection reset by peer".to_string(),
        ))
    }
}
