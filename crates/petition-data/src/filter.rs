//! Record selection by subject, outcome and publication-date range.

use std::collections::BTreeSet;

use petition_core::models::{FilterSpec, Record};
use petition_core::time_utils::within_day_range;

/// Whether `record` satisfies every clause of `spec`.
///
/// * An empty subject set places no restriction on the subject.
/// * With any date bound set, a record whose publication date does not parse
///   is rejected; bounds are inclusive by calendar day.
pub fn matches(record: &Record, spec: &FilterSpec) -> bool {
    if !spec.subjects.is_empty() && !spec.subjects.contains(&record.subject) {
        return false;
    }

    if !spec.outcome.matches(record.outcome()) {
        return false;
    }

    if spec.has_date_range() {
        return match record.published_on() {
            Some(date) => within_day_range(date, spec.date_from, spec.date_to),
            None => false,
        };
    }

    true
}

/// The records matching `spec`, in their original order.
pub fn apply(records: &[Record], spec: &FilterSpec) -> Vec<Record> {
    records
        .iter()
        .filter(|record| matches(record, spec))
        .cloned()
        .collect()
}

/// Distinct non-blank subjects, sorted, for populating filter choices.
pub fn unique_subjects(records: &[Record]) -> Vec<String> {
    records
        .iter()
        .map(|record| record.subject.as_str())
        .filter(|subject| !subject.trim().is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
