//! Capacity percentages derived from `CONFIG GET`.
//!
//! Computes `percentage_of_memory` from `used_memory` / `maxmemory` and
//! `percentage_of_clients` from `connected_clients` / `maxclients`. Managed
//! deployments (e.g. ElastiCache) often disable `CONFIG`; any failure here
//! leaves the metric set untouched and is reported to the caller, which
//! treats it as non-fatal.

use std::fmt;

use super::traits::{Connector, ConnectorError};
use crate::metrics::MetricSet;

pub const MAXMEMORY: &str = "maxmemory";
pub const MAXCLIENTS: &str = "maxclients";

/// Why capacity metrics could not be computed.
#[derive(Debug, Clone, PartialEq)]
pub enum CapacityError {
    /// A metric the computation reads was not in the `INFO` reply.
    MissingMetric(&'static str),
    /// `CONFIG GET` itself failed.
    Query {
        parameter: &'static str,
        source: ConnectorError,
    },
    /// The reply did not contain the requested parameter.
    MissingParameter(&'static str),
    /// The parameter value was not a number.
    Parse {
        parameter: &'static str,
        value: String,
    },
}

impl fmt::Display for CapacityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CapacityError::MissingMetric(name) => write!(f, "{} not reported by INFO", name),
            CapacityError::Query { parameter, source } => {
                write!(f, "failed to run `CONFIG GET {}`: {}", parameter, source)
            }
            CapacityError::MissingParameter(parameter) => {
                write!(f, "`CONFIG GET {}` returned no value", parameter)
            }
            CapacityError::Parse { parameter, value } => {
                write!(f, "failed to parse {} value {:?}", parameter, value)
            }
        }
    }
}

impl std::error::Error for CapacityError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CapacityError::Query { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Configured upper bounds read from the server.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapacityInputs {
    pub maxmemory: f64,
    pub maxclients: f64,
}

impl CapacityInputs {
    /// Queries `maxmemory`, then `maxclients`. Stops at the first failure.
    pub fn fetch<C: Connector + ?Sized>(connector: &mut C) -> Result<Self, CapacityError> {
        let maxmemory = fetch_bound(connector, MAXMEMORY)?;
        let maxclients = fetch_bound(connector, MAXCLIENTS)?;
        Ok(Self {
            maxmemory,
            maxclients,
        })
    }
}

fn fetch_bound<C: Connector + ?Sized>(
    connector: &mut C,
    parameter: &'static str,
) -> Result<f64, CapacityError> {
    let reply = connector
        .config_get(parameter)
        .map_err(|source| CapacityError::Query { parameter, source })?;
    let raw = reply
        .get(parameter)
        .ok_or(CapacityError::MissingParameter(parameter))?;
    raw.parse::<f64>().map_err(|_| CapacityError::Parse {
        parameter,
        value: raw.clone(),
    })
}

/// `maxmemory` of zero means "no limit" and reports 0%.
pub fn percentage_of_memory(used_memory: f64, maxmemory: f64) -> f64 {
    if maxmemory == 0.0 {
        0.0
    } else {
        100.0 * used_memory / maxmemory
    }
}

/// No zero guard: a `maxclients` of zero yields `inf` (or `NaN` with no clients).
pub fn percentage_of_clients(connected_clients: f64, maxclients: f64) -> f64 {
    100.0 * connected_clients / maxclients
}

/// Adds `percentage_of_memory` and `percentage_of_clients` to `metrics`.
///
/// Both bounds are fetched before anything is written, so on error the set
/// is left exactly as it was.
pub fn enrich<C: Connector + ?Sized>(
    connector: &mut C,
    metrics: &mut MetricSet,
) -> Result<(), CapacityError> {
    let used_memory = metrics
        .get("used_memory")
        .ok_or(CapacityError::MissingMetric("used_memory"))?;
    let connected_clients = metrics
        .get("connected_clients")
        .ok_or(CapacityError::MissingMetric("connected_clients"))?;

    let inputs = CapacityInputs::fetch(connector)?;

    metrics.insert(
        "percentage_of_memory",
        percentage_of_memory(used_memory, inputs.maxmemory),
    );
    metrics.insert(
        "percentage_of_clients",
        percentage_of_clients(connected_clients, inputs.maxclients),
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::mock::MockConnector;

    fn base_metrics() -> MetricSet {
        [("used_memory", 1000.0), ("connected_clients", 3.0)]
            .into_iter()
            .collect()
    }

    #[test]
    fn zero_maxmemory_reports_zero_percent() {
        assert_eq!(percentage_of_memory(1000.0, 0.0), 0.0);
    }

    #[test]
    fn memory_percentage_is_ratio() {
        assert_eq!(percentage_of_memory(1000.0, 2000.0), 50.0);
    }

    #[test]
    fn zero_maxclients_is_not_guarded() {
        assert!(percentage_of_clients(3.0, 0.0).is_infinite());
        assert!(percentage_of_clients(0.0, 0.0).is_nan());
    }

    #[test]
    fn enrich_adds_both_percentages() {
        let mut connector = MockConnector::new()
            .with_config(MAXMEMORY, "2000")
            .with_config(MAXCLIENTS, "100");
        let mut metrics = base_metrics();

        enrich(&mut connector, &mut metrics).unwrap();

        assert_eq!(metrics.get("percentage_of_memory"), Some(50.0));
        assert_eq!(metrics.get("percentage_of_clients"), Some(3.0));
        assert_eq!(
            connector.commands(),
            &["CONFIG GET maxmemory", "CONFIG GET maxclients"]
        );
    }

    #[test]
    fn clients_failure_leaves_no_partial_keys() {
        let mut connector = MockConnector::new()
            .with_config(MAXMEMORY, "2000")
            .with_config_error(
                MAXCLIENTS,
                ConnectorError::Command("ERR unknown command".to_string()),
            );
        let mut metrics = base_metrics();

        let err = enrich(&mut connector, &mut metrics).unwrap_err();

        assert!(matches!(
            err,
            CapacityError::Query {
                parameter: MAXCLIENTS,
                ..
            }
        ));
        assert!(!metrics.contains("percentage_of_memory"));
        assert!(!metrics.contains("percentage_of_clients"));
        assert_eq!(metrics, base_metrics());
    }

    #[test]
    fn memory_failure_skips_clients_query() {
        let mut connector = MockConnector::new()
            .with_config_error(
                MAXMEMORY,
                ConnectorError::Command("ERR unknown command".to_string()),
            )
            .with_config(MAXCLIENTS, "100");
        let mut metrics = base_metrics();

        assert!(enrich(&mut connector, &mut metrics).is_err());
        assert_eq!(connector.commands(), &["CONFIG GET maxmemory"]);
    }

    #[test]
    fn unknown_parameter_is_an_error() {
        let mut connector = MockConnector::new().with_config(MAXCLIENTS, "100");
        let err = CapacityInputs::fetch(&mut connector).unwrap_err();
        assert_eq!(err, CapacityError::MissingParameter(MAXMEMORY));
    }

    #[test]
    fn non_numeric_bound_is_an_error() {
        let mut connector = MockConnector::new()
            .with_config(MAXMEMORY, "lots")
            .with_config(MAXCLIENTS, "100");
        let err = CapacityInputs::fetch(&mut connector).unwrap_err();
        assert_eq!(
            err,
            CapacityError::Parse {
                parameter: MAXMEMORY,
                value: "lots".to_string()
            }
        );
    }

    #[test]
    fn missing_used_memory_skips_queries() {
        let mut connector = MockConnector::new()
            .with_config(MAXMEMORY, "2000")
            .with_config(MAXCLIENTS, "100");
        let mut metrics: MetricSet = [("connected_clients", 3.0)].into_iter().collect();

        let err = enrich(&mut connector, &mut metrics).unwrap_err();

        assert_eq!(err, CapacityError::MissingMetric("used_memory"));
        assert!(connector.commands().is_empty());
    }
}
