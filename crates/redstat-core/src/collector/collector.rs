//! Main collector that runs one fetch cycle.
//!
//! The `Collector` issues `INFO`, parses the reply into a `MetricSet`,
//! finalizes the keyspace totals and then tries to add capacity metrics.

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::collector::capacity;
use crate::collector::parser::parse_info;
use crate::collector::redis_connector::RedisConnector;
use crate::collector::traits::{Connector, ConnectorError};
use crate::config::RedisConfig;
use crate::metrics::MetricSet;

/// Error that aborts a fetch cycle. No metrics are returned.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Could not connect or authenticate.
    Connect(ConnectorError),
    /// `INFO` failed or returned something other than text.
    Info(ConnectorError),
}

impl FetchError {
    /// The underlying connector error.
    pub fn connector_error(&self) -> &ConnectorError {
        match self {
            FetchError::Connect(e) | FetchError::Info(e) => e,
        }
    }
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Connect(e) => write!(f, "failed to connect: {}", e),
            FetchError::Info(e) => write!(f, "failed to run INFO: {}", e),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.connector_error())
    }
}

/// Timing information for each fetch phase.
///
/// Used for debugging.
#[derive(Debug, Clone, Default)]
pub struct CollectorTiming {
    /// Total fetch time.
    pub total: Duration,
    /// `INFO` round-trip.
    pub info: Duration,
    /// Both `CONFIG GET` round-trips.
    pub capacity: Duration,
}

/// Runs fetch cycles against a `Connector`.
pub struct Collector<C: Connector> {
    connector: C,
    /// Timing information from the last fetch_metrics call.
    last_timing: Option<CollectorTiming>,
}

impl Collector<RedisConnector> {
    /// Connects to the server described by `config`.
    pub fn connect(config: &RedisConfig) -> Result<Self, FetchError> {
        let connector = RedisConnector::connect(config).map_err(FetchError::Connect)?;
        Ok(Self::new(connector))
    }
}

impl<C: Connector> Collector<C> {
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            last_timing: None,
        }
    }

    /// Collects one metric set.
    ///
    /// Fails only when `INFO` fails. Capacity metrics are best-effort: if
    /// either `CONFIG GET` fails they are left out and the cause is logged.
    pub fn fetch_metrics(&mut self) -> Result<MetricSet, FetchError> {
        let start = Instant::now();
        let mut timing = CollectorTiming::default();

        let reply = self.connector.info().map_err(FetchError::Info)?;
        timing.info = start.elapsed();

        let parsed = parse_info(&reply);
        debug!(
            databases = parsed.keyspace.databases,
            defaulted_fields = parsed.keyspace.defaulted_fields,
            fields = parsed.metrics.len(),
            "parsed INFO reply"
        );
        let mut metrics = parsed.into_metric_set();

        let capacity_start = Instant::now();
        if let Err(e) = capacity::enrich(&mut self.connector, &mut metrics) {
            info!(
                error = %e,
                "failed to calculate capacity (CONFIG may be disabled, as on ElastiCache); skipping these metrics"
            );
        }
        timing.capacity = capacity_start.elapsed();
        timing.total = start.elapsed();

        debug!(
            total_ms = timing.total.as_millis() as u64,
            info_ms = timing.info.as_millis() as u64,
            capacity_ms = timing.capacity.as_millis() as u64,
            metrics = metrics.len(),
            "fetch complete"
        );
        self.last_timing = Some(timing);

        Ok(metrics)
    }

    /// Returns timing from the last successful fetch.
    pub fn last_timing(&self) -> Option<&CollectorTiming> {
        self.last_timing.as_ref()
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }
}
