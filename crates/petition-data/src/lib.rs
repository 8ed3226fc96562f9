//! Data layer for petition statistics.
//!
//! Responsible for reading petition CSV exports, filtering records,
//! aggregating statistics and trends, and running the top-level analysis
//! pipeline.

pub mod aggregator;
pub mod analysis;
pub mod filter;
pub mod reader;
pub mod trend;

pub use petition_core as core;
