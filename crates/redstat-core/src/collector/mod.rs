//! Redis metrics collector.
//!
//! This module turns one `INFO` reply (plus two optional `CONFIG GET`
//! queries) into a `MetricSet`, with support for mocking the server in tests.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                        Collector                          │
//! │  ┌──────────────────────┐   ┌──────────────────────────┐  │
//! │  │  parser              │   │  capacity                │  │
//! │  │  - INFO text         │   │  - CONFIG GET maxmemory  │  │
//! │  │  - keyspace totals   │   │  - CONFIG GET maxclients │  │
//! │  └──────────┬───────────┘   └─────────────┬────────────┘  │
//! │             └──────────────┬──────────────┘               │
//! │                     ┌──────▼──────┐                       │
//! │                     │  Connector  │ (trait)               │
//! │                     └──────┬──────┘                       │
//! └────────────────────────────┼──────────────────────────────┘
//!                              │
//!              ┌───────────────┼───────────────┐
//!              │               │               │
//!     ┌────────▼───────┐ ┌─────▼───────┐ ┌─────▼───────┐
//!     │ RedisConnector │ │MockConnector│ │  Scenarios  │
//!     │ (live server)  │ │ (Testing)   │ │ (Fixtures)  │
//!     └────────────────┘ └─────────────┘ └─────────────┘
//! ```
//!
//! # Usage
//!
//! ## Production
//!
//! ```ignore
//! use redstat_core::collector::Collector;
//! use redstat_core::config::RedisConfig;
//!
//! let config = RedisConfig::new().with_tcp("localhost", 6379);
//! let mut collector = Collector::connect(&config)?;
//! let metrics = collector.fetch_metrics()?;
//! ```
//!
//! ## Testing (with MockConnector)
//!
//! ```
//! use redstat_core::collector::{Collector, MockConnector};
//!
//! let connector = MockConnector::typical_server();
//! let mut collector = Collector::new(connector);
//! let metrics = collector.fetch_metrics().unwrap();
//! assert_eq!(metrics.get("keys"), Some(2000.0));
//! assert_eq!(metrics.get("percentage_of_memory"), Some(0.0));
//! ```

pub mod capacity;
#[allow(clippy::module_inception)]
mod collector;
pub mod keyspace;
pub mod mock;
pub mod parser;
mod redis_connector;
pub mod traits;

pub use capacity::{CapacityError, CapacityInputs};
pub use collector::{Collector, CollectorTiming, FetchError};
pub use keyspace::{FieldValue, KeyspaceEntry, KeyspaceTotals};
pub use mock::MockConnector;
pub use parser::{ParsedInfo, parse_info};
pub use redis_connector::RedisConnector;
pub use traits::{Connector, ConnectorError};
