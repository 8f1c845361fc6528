//! Keyspace line decoding and aggregation.
//!
//! `INFO` reports one line per logical database:
//!
//! ```text
//! db0:keys=10,expires=2,avg_ttl=0
//! ```
//!
//! Only `keys` and `expires` are consumed. Each database's counts are folded
//! into `KeyspaceTotals`; no per-database metric is kept.

use tracing::warn;

/// Outcome of parsing one keyspace sub-field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    /// The sub-field carried a valid number.
    Parsed(f64),
    /// The sub-field was missing or malformed and counts as `0.0`.
    Defaulted,
}

impl FieldValue {
    pub fn value(self) -> f64 {
        match self {
            FieldValue::Parsed(v) => v,
            FieldValue::Defaulted => 0.0,
        }
    }

    pub fn is_defaulted(self) -> bool {
        matches!(self, FieldValue::Defaulted)
    }
}

/// Returns true for keyspace keys: `db` followed by one or more digits.
pub fn is_keyspace_key(key: &str) -> bool {
    key.strip_prefix("db")
        .is_some_and(|index| !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()))
}

/// Decoded `keys` and `expires` counts of one `db<N>` line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyspaceEntry {
    pub keys: FieldValue,
    pub expires: FieldValue,
}

impl KeyspaceEntry {
    /// Decodes the value part of a keyspace line.
    ///
    /// Sub-fields are positional: the first is `keys=<n>`, the second
    /// `expires=<n>`, anything after is ignored. A sub-field that cannot be
    /// read is logged and defaulted, the other one is still used.
    pub fn parse(db: &str, value: &str) -> Self {
        let mut parts = value.splitn(3, ',');
        let keys = parse_sub_field(db, "keys", parts.next());
        let expires = parse_sub_field(db, "expires", parts.next());
        Self { keys, expires }
    }
}

fn parse_sub_field(db: &str, field: &str, part: Option<&str>) -> FieldValue {
    let Some(part) = part else {
        warn!(db, field, "keyspace field missing, counting as 0");
        return FieldValue::Defaulted;
    };

    let Some((_, raw)) = part.split_once('=') else {
        warn!(db, field, part, "malformed keyspace field, counting as 0");
        return FieldValue::Defaulted;
    };

    match raw.parse::<f64>() {
        Ok(v) => FieldValue::Parsed(v),
        Err(e) => {
            warn!(db, field, value = raw, error = %e, "failed to parse keyspace field, counting as 0");
            FieldValue::Defaulted
        }
    }
}

/// Running sums over every keyspace line of one `INFO` reply.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyspaceTotals {
    pub keys: f64,
    pub expires: f64,
    /// Number of keyspace lines folded in.
    pub databases: usize,
    /// Number of sub-fields that were defaulted to zero.
    pub defaulted_fields: usize,
}

impl KeyspaceTotals {
    pub fn add(&mut self, entry: &KeyspaceEntry) {
        self.keys += entry.keys.value();
        self.expires += entry.expires.value();
        self.databases += 1;
        self.defaulted_fields +=
            usize::from(entry.keys.is_defaulted()) + usize::from(entry.expires.is_defaulted());
    }
}
