//! Plugin output: metric value lines, graph meta JSON and a raw JSON dump.

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::io::{self, Write};

use serde::Serialize;

use crate::graph::{GraphDef, graph_definitions};
use crate::metrics::MetricSet;

/// Environment variable the agent sets when it asks for graph definitions.
pub const META_ENV: &str = "MACKEREL_AGENT_PLUGIN_META";

const META_HEADER: &str = "# mackerel-agent-plugin";

/// Returns true if the value of `META_ENV` requests meta output.
pub fn is_meta_request(value: Option<&OsStr>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}

/// Writes one `<prefix>.<graph>.<metric>\t<value>\t<timestamp>` line per
/// graph metric present in `metrics`.
///
/// Metrics that no graph defines are not printed. Diff metrics are printed
/// as raw counter values.
pub fn render_values<W: Write>(
    out: &mut W,
    prefix: &str,
    metrics: &MetricSet,
    timestamp: i64,
) -> io::Result<()> {
    for (graph, def) in graph_definitions(prefix) {
        for metric in &def.metrics {
            if let Some(value) = metrics.get(metric.name) {
                writeln!(
                    out,
                    "{}.{}.{}\t{:.6}\t{}",
                    prefix, graph, metric.name, value, timestamp
                )?;
            }
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct Meta {
    graphs: BTreeMap<String, GraphDef>,
}

/// Writes the meta header line followed by the graph definitions as JSON.
pub fn render_meta<W: Write>(out: &mut W, prefix: &str) -> io::Result<()> {
    let meta = Meta {
        graphs: graph_definitions(prefix)
            .into_iter()
            .map(|(graph, def)| (format!("{}.{}", prefix, graph), def))
            .collect(),
    };
    writeln!(out, "{}", META_HEADER)?;
    serde_json::to_writer(&mut *out, &meta)?;
    writeln!(out)
}

/// Writes the whole metric set as one JSON object.
///
/// JSON has no infinity or NaN, so non-finite values (e.g.
/// `percentage_of_clients` when `maxclients` is 0) are written as `null`.
pub fn render_json<W: Write>(out: &mut W, metrics: &MetricSet) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, metrics)?;
    writeln!(out)
}
