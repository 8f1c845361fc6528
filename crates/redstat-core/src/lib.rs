//! redstat-core - shared library for the redstat Redis metrics plugin.
//!
//! Provides:
//! - `collector` - `INFO` parsing, keyspace aggregation, capacity enrichment
//!   and the `Connector` seam (real Redis connection or mock)
//! - `metrics` - the `MetricSet` produced by one fetch cycle
//! - `graph` - graph definitions used by downstream rendering
//! - `output` - plugin text output and meta JSON
//! - `config` - connection target and plugin settings

pub mod collector;
pub mod config;
pub mod graph;
pub mod metrics;
pub mod output;
