//! Shared model and helpers for petition statistics.
//!
//! Holds the record schema with its outcome tagging, the filter
//! specification, date and number helpers, CLI settings and the error type
//! used at the ingestion boundary.

pub mod calculations;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;
