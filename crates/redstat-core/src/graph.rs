//! Graph definitions for downstream rendering.
//!
//! Each graph groups related metrics under a label. The monitoring agent
//! reads these once (see `output::render_meta`) and then plots the values
//! printed by `output::render_values`.

use std::collections::BTreeMap;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Integer,
    Percentage,
}

/// One metric line of a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricDef {
    pub name: &'static str,
    pub label: &'static str,
    /// Counter whose rate, not raw value, is plotted. Computed downstream.
    #[serde(skip)]
    pub diff: bool,
    pub stacked: bool,
}

const fn metric(name: &'static str, label: &'static str, diff: bool, stacked: bool) -> MetricDef {
    MetricDef {
        name,
        label,
        diff,
        stacked,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphDef {
    pub label: String,
    pub unit: Unit,
    pub metrics: Vec<MetricDef>,
}

struct GraphTemplate {
    key: &'static str,
    title: &'static str,
    unit: Unit,
    metrics: &'static [MetricDef],
}

const GRAPHS: &[GraphTemplate] = &[
    GraphTemplate {
        key: "queries",
        title: "Queries",
        unit: Unit::Integer,
        metrics: &[metric("total_commands_processed", "Queries", true, false)],
    },
    GraphTemplate {
        key: "connections",
        title: "Connections",
        unit: Unit::Integer,
        metrics: &[
            metric("total_connections_received", "Connections", true, true),
            metric("rejected_connections", "Rejected Connections", true, true),
        ],
    },
    GraphTemplate {
        key: "clients",
        title: "Clients",
        unit: Unit::Integer,
        metrics: &[
            metric("connected_clients", "Connected Clients", false, true),
            metric("blocked_clients", "Blocked Clients", false, true),
            metric("connected_slaves", "Connected Slaves", false, true),
        ],
    },
    GraphTemplate {
        key: "keys",
        title: "Keys",
        unit: Unit::Integer,
        metrics: &[
            metric("keys", "Keys", false, false),
            metric("expires", "Keys with expiration", false, false),
            metric("expired", "Expired Keys", false, false),
        ],
    },
    GraphTemplate {
        key: "keyspace",
        title: "Keyspace",
        unit: Unit::Integer,
        metrics: &[
            metric("keyspace_hits", "Keyspace Hits", true, false),
            metric("keyspace_misses", "Keyspace Missed", true, false),
        ],
    },
    GraphTemplate {
        key: "memory",
        title: "Memory",
        unit: Unit::Integer,
        metrics: &[
            metric("used_memory", "Used Memory", false, false),
            metric("used_memory_rss", "Used Memory RSS", false, false),
            metric("used_memory_peak", "Used Memory Peak", false, false),
            metric("used_memory_lua", "Used Memory Lua engine", false, false),
        ],
    },
    GraphTemplate {
        key: "capacity",
        title: "Capacity",
        unit: Unit::Percentage,
        metrics: &[
            metric("percentage_of_memory", "Percentage of memory", false, false),
            metric("percentage_of_clients", "Percentage of clients", false, false),
        ],
    },
];

/// Builds the graph table, keyed by graph name (without prefix).
///
/// Labels start with the title-cased prefix, e.g. `"Redis Memory"`.
pub fn graph_definitions(prefix: &str) -> BTreeMap<&'static str, GraphDef> {
    let label_prefix = title_case(prefix);
    GRAPHS
        .iter()
        .map(|graph| {
            (
                graph.key,
                GraphDef {
                    label: format!("{} {}", label_prefix, graph.title),
                    unit: graph.unit,
                    metrics: graph.metrics.to_vec(),
                },
            )
        })
        .collect()
}

/// Upper-cases the first letter of every word.
///
/// Letters, digits and `_` continue a word; anything else separates words.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if at_word_start {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = !(c.is_alphanumeric() || c == '_');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_case_words() {
        assert_eq!(title_case("redis"), "Redis");
        assert_eq!(title_case("redis-cache"), "Redis-Cache");
        assert_eq!(title_case("session_store"), "Session_store");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn labels_use_prefix() {
        let graphs = graph_definitions("redis");
        assert_eq!(graphs["memory"].label, "Redis Memory");

        let graphs = graph_definitions("cache");
        assert_eq!(graphs["queries"].label, "Cache Queries");
    }

    #[test]
    fn capacity_graph_is_percentage() {
        let graphs = graph_definitions("redis");
        assert_eq!(graphs["capacity"].unit, Unit::Percentage);
        assert_eq!(graphs["keys"].unit, Unit::Integer);
    }

    #[test]
    fn counters_are_diff_metrics() {
        let graphs = graph_definitions("redis");
        let diff: Vec<&str> = graphs
            .values()
            .flat_map(|g| g.metrics.iter())
            .filter(|m| m.diff)
            .map(|m| m.name)
            .collect();
        assert_eq!(diff.len(), 5);
        assert!(diff.contains(&"total_commands_processed"));
        assert!(diff.contains(&"keyspace_hits"));
        assert!(!diff.contains(&"keys"));
    }

    #[test]
    fn all_graphs_present() {
        let graphs = graph_definitions("redis");
        let keys: Vec<&str> = graphs.keys().copied().collect();
        assert_eq!(
            keys,
            vec![
                "capacity",
                "clients",
                "connections",
                "keys",
                "keyspace",
                "memory",
                "queries"
            ]
        );
    }

    #[test]
    fn metric_def_serializes_without_diff() {
        let json = serde_json::to_string(&metric("keys", "Keys", true, false)).unwrap();
        assert_eq!(json, r#"{"name":"keys","label":"Keys","stacked":false}"#);
    }
}
