//! Parser for the `INFO` reply.
//!
//! A pure function over the reply text, so it can be tested with string
//! inputs. The reply looks like:
//!
//! ```text
//! # Memory
//! used_memory:1000
//! used_memory_human:1000B
//!
//! # Keyspace
//! db0:keys=10,expires=2,avg_ttl=0
//! ```
//!
//! Section headers and blank lines are skipped, non-numeric values are
//! dropped and keyspace lines are folded into `KeyspaceTotals`.

use super::keyspace::{KeyspaceEntry, KeyspaceTotals, is_keyspace_key};
use crate::metrics::MetricSet;

/// Result of parsing one `INFO` reply, before the keyspace totals are written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedInfo {
    /// Every numeric `key:value` field of the reply.
    pub metrics: MetricSet,
    pub keyspace: KeyspaceTotals,
}

impl ParsedInfo {
    /// Writes `keys`, `expires` and `expired` and returns the finished set.
    ///
    /// `expired` mirrors `expired_keys` when the server reported it and is
    /// `0.0` otherwise.
    pub fn into_metric_set(self) -> MetricSet {
        let mut metrics = self.metrics;
        metrics.insert("keys", self.keyspace.keys);
        metrics.insert("expires", self.keyspace.expires);
        let expired = metrics.get("expired_keys").unwrap_or(0.0);
        metrics.insert("expired", expired);
        metrics
    }
}

/// Parses the text of an `INFO` reply.
///
/// Never fails: malformed lines are skipped and malformed keyspace
/// sub-fields count as zero.
pub fn parse_info(content: &str) -> ParsedInfo {
    let mut parsed = ParsedInfo::default();

    for line in content.lines() {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            continue;
        };

        if is_keyspace_key(key) {
            parsed.keyspace.add(&KeyspaceEntry::parse(key, value));
            continue;
        }

        if let Ok(v) = value.parse::<f64>() {
            parsed.metrics.insert(key, v);
        }
    }

    parsed
}
