//! Main analysis pipeline.
//!
//! Loads the export, aggregates the full record set, applies the filter,
//! aggregates the selection, and returns both snapshots ready for rendering.

use std::path::Path;
use std::time::Instant;

use chrono::Utc;
use petition_core::error::Result;
use petition_core::models::{FilterSpec, Record};
use serde::Serialize;
use tracing::info;

use crate::aggregator::{aggregate, aggregate_all, StatsSnapshot};
use crate::filter;
use crate::reader::load_records;

// ── Public types ──────────────────────────────────────────────────────────────

/// Metadata produced alongside the analysis result.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisMetadata {
    /// ISO-8601 timestamp when this result was generated.
    pub generated_at: String,
    /// Records handed to the pipeline.
    pub records_loaded: usize,
    /// Records that passed the filter.
    pub records_matched: usize,
    /// Wall-clock seconds spent reading the CSV (zero for in-memory input).
    pub load_time_seconds: f64,
    /// Wall-clock seconds spent filtering and aggregating.
    pub aggregate_time_seconds: f64,
}

/// The complete output of [`analyze_file`] / [`analyze_records`].
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    /// Statistics over every loaded record.
    pub overall: StatsSnapshot,
    /// Statistics over the records matching the filter.
    pub filtered: StatsSnapshot,
    /// The filter that produced `filtered`.
    pub filter: FilterSpec,
    /// Distinct subjects across all records, for building filter choices.
    pub subjects: Vec<String>,
    pub metadata: AnalysisMetadata,
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Run the pipeline over records already in memory.
pub fn analyze_records(records: &[Record], spec: &FilterSpec) -> AnalysisResult {
    let start = Instant::now();

    let overall = aggregate_all(records);
    let selection = filter::apply(records, spec);
    let filtered = aggregate(records, &selection);
    let subjects = filter::unique_subjects(records);

    let metadata = AnalysisMetadata {
        generated_at: Utc::now().to_rfc3339(),
        records_loaded: records.len(),
        records_matched: selection.len(),
        load_time_seconds: 0.0,
        aggregate_time_seconds: start.elapsed().as_secs_f64(),
    };

    info!(
        "Filter kept {} of {} records ({} subjects available)",
        metadata.records_matched,
        metadata.records_loaded,
        subjects.len()
    );

    AnalysisResult {
        overall,
        filtered,
        filter: spec.clone(),
        subjects,
        metadata,
    }
}

/// Load the CSV export at `path` and run the pipeline over it.
pub fn analyze_file(path: &Path, spec: &FilterSpec) -> Result<AnalysisResult> {
    let load_start = Instant::now();
    let records = load_records(path)?;
    let load_time = load_start.elapsed().as_secs_f64();

    let mut result = analyze_records(&records, spec);
    result.metadata.load_time_seconds = load_time;
    Ok(result)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
