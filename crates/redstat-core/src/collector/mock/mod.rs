//! Mock connector implementations for testing.
//!
//! This module provides `MockConnector` and pre-built scenarios for testing
//! the collector without a running Redis server.

mod connector;
mod scenarios;

pub use connector::MockConnector;
pub use scenarios::SIMPLE_INFO;
