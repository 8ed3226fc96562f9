//! Petition statistics over outcomes, companies, subjects and calendar periods.
//!
//! Every call rebuilds a [`StatsSnapshot`] from scratch; snapshots are never
//! updated in place.

use std::collections::BTreeMap;

use petition_core::calculations::{linear_fit, percent_of, LinearFit, RunningMean};
use petition_core::models::{FilterSpec, Outcome, Record};
use petition_core::time_utils::{month_key, year_key};
use serde::Serialize;
use tracing::debug;

use crate::filter;
use crate::trend::{compute_trend, Trend};

// ── TimelineBucket ────────────────────────────────────────────────────────────

/// Decision counts and mean processing time for one month or year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TimelineBucket {
    pub approved_count: usize,
    pub denied_count: usize,
    /// Mean of the valid durations published in this period, `0` if none.
    pub mean_duration: f64,
}

impl TimelineBucket {
    /// Approved plus denied petitions in the period.
    pub fn decided(&self) -> usize {
        self.approved_count + self.denied_count
    }

    /// Approved share of the decided volume, in percent.
    pub fn approval_share(&self) -> f64 {
        percent_of(self.approved_count, self.decided())
    }

    /// Denied share of the decided volume, in percent.
    pub fn denial_share(&self) -> f64 {
        percent_of(self.denied_count, self.decided())
    }
}

/// Outcome mix across a whole timeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct OutcomeShares {
    pub approved_percent: f64,
    pub denied_percent: f64,
}

/// Approved and denied shares of every decision in `timeline`.
pub fn outcome_shares(timeline: &BTreeMap<String, TimelineBucket>) -> OutcomeShares {
    let approved: usize = timeline.values().map(|b| b.approved_count).sum();
    let denied: usize = timeline.values().map(|b| b.denied_count).sum();
    OutcomeShares {
        approved_percent: percent_of(approved, approved + denied),
        denied_percent: percent_of(denied, approved + denied),
    }
}

/// Least-squares line through the per-period mean durations, in key order.
///
/// `None` when the timeline has fewer than two periods.
pub fn duration_trend_line(timeline: &BTreeMap<String, TimelineBucket>) -> Option<LinearFit> {
    let means: Vec<f64> = timeline.values().map(|b| b.mean_duration).collect();
    linear_fit(&means)
}

// ── StatsSnapshot ─────────────────────────────────────────────────────────────

/// Aggregate view of a set of petition records.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatsSnapshot {
    pub total_count: usize,
    pub approved_count: usize,
    pub denied_count: usize,
    /// Mean over every strictly positive duration, `0` if none.
    pub average_duration_days: f64,
    pub counts_by_company: BTreeMap<String, usize>,
    pub counts_by_subject: BTreeMap<String, usize>,
    /// Valid durations per raw status string, in encounter order.
    pub durations_by_status: BTreeMap<String, Vec<f64>>,
    /// Keyed by `"YYYY-MM"`.
    pub monthly_timeline: BTreeMap<String, TimelineBucket>,
    /// Keyed by `"YYYY"`.
    pub yearly_timeline: BTreeMap<String, TimelineBucket>,
    pub trend: Trend,
    /// The complete input the snapshot was built from, before any filtering.
    #[serde(skip)]
    pub records: Vec<Record>,
}

impl StatsSnapshot {
    /// Approved petitions as a percentage of all processed records.
    pub fn approval_rate(&self) -> f64 {
        percent_of(self.approved_count, self.total_count)
    }

    /// Denied petitions as a percentage of all processed records.
    pub fn denial_rate(&self) -> f64 {
        percent_of(self.denied_count, self.total_count)
    }

    /// Mean duration per status rounded to whole days.
    pub fn average_duration_by_status(&self) -> BTreeMap<String, i64> {
        self.durations_by_status
            .iter()
            .filter(|(_, samples)| !samples.is_empty())
            .map(|(status, samples)| {
                let mean = samples.iter().sum::<f64>() / samples.len() as f64;
                (status.clone(), mean.round() as i64)
            })
            .collect()
    }

    /// The company with the most petitions, if any.
    pub fn top_company(&self) -> Option<(String, usize)> {
        top_items(&self.counts_by_company, 1).into_iter().next()
    }

    /// Re-run the pipeline over the retained records with another filter.
    pub fn refilter(&self, spec: &FilterSpec) -> StatsSnapshot {
        let subset = filter::apply(&self.records, spec);
        aggregate(&self.records, &subset)
    }
}

// ── SnapshotBuilder ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
struct BucketAccumulator {
    approved_count: usize,
    denied_count: usize,
    durations: RunningMean,
}

impl BucketAccumulator {
    fn record_outcome(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Approved => self.approved_count += 1,
            Outcome::Denied => self.denied_count += 1,
            Outcome::Other => {}
        }
    }

    fn merge(&mut self, other: &BucketAccumulator) {
        self.approved_count += other.approved_count;
        self.denied_count += other.denied_count;
        self.durations.merge(&other.durations);
    }

    fn finish(&self) -> TimelineBucket {
        TimelineBucket {
            approved_count: self.approved_count,
            denied_count: self.denied_count,
            mean_duration: self.durations.mean(),
        }
    }
}

/// Incremental accumulator behind [`aggregate`].
///
/// Partial builders over consecutive slices of the input can be combined
/// with [`SnapshotBuilder::merge`]: counters add up and duration samples are
/// concatenated, so merging in input order yields the single-pass result.
#[derive(Debug, Clone, Default)]
pub struct SnapshotBuilder {
    total_count: usize,
    approved_count: usize,
    denied_count: usize,
    durations: RunningMean,
    counts_by_company: BTreeMap<String, usize>,
    counts_by_subject: BTreeMap<String, usize>,
    durations_by_status: BTreeMap<String, Vec<f64>>,
    monthly: BTreeMap<String, BucketAccumulator>,
    yearly: BTreeMap<String, BucketAccumulator>,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one record into the running totals.
    pub fn push(&mut self, record: &Record) {
        self.total_count += 1;
        let outcome = record.outcome();
        match outcome {
            Outcome::Approved => self.approved_count += 1,
            Outcome::Denied => self.denied_count += 1,
            Outcome::Other => {}
        }

        let published = record.published_on();
        if let Some(date) = published {
            self.monthly
                .entry(month_key(date))
                .or_default()
                .record_outcome(outcome);
            self.yearly
                .entry(year_key(date))
                .or_default()
                .record_outcome(outcome);
        }

        if !record.company_name.is_empty() {
            *self
                .counts_by_company
                .entry(record.company_name.clone())
                .or_insert(0) += 1;
        }
        if !record.subject.is_empty() {
            *self
                .counts_by_subject
                .entry(record.subject.clone())
                .or_insert(0) += 1;
        }

        let Some(duration) = record.duration() else {
            return;
        };
        self.durations.push(duration);
        self.durations_by_status
            .entry(record.status.clone())
            .or_default()
            .push(duration);

        if let Some(date) = published {
            // Both buckets were created above for this date.
            if let Some(bucket) = self.monthly.get_mut(&month_key(date)) {
                bucket.durations.push(duration);
            }
            if let Some(bucket) = self.yearly.get_mut(&year_key(date)) {
                bucket.durations.push(duration);
            }
        }
    }

    /// Append another builder's totals; `other` is taken to cover records
    /// that come after this builder's records.
    pub fn merge(&mut self, other: SnapshotBuilder) {
        self.total_count += other.total_count;
        self.approved_count += other.approved_count;
        self.denied_count += other.denied_count;
        self.durations.merge(&other.durations);

        for (company, count) in other.counts_by_company {
            *self.counts_by_company.entry(company).or_insert(0) += count;
        }
        for (subject, count) in other.counts_by_subject {
            *self.counts_by_subject.entry(subject).or_insert(0) += count;
        }
        for (status, samples) in other.durations_by_status {
            self.durations_by_status
                .entry(status)
                .or_default()
                .extend(samples);
        }
        for (key, bucket) in other.monthly {
            self.monthly.entry(key).or_default().merge(&bucket);
        }
        for (key, bucket) in other.yearly {
            self.yearly.entry(key).or_default().merge(&bucket);
        }
    }

    /// Collapse timeline samples to means, classify the trend and attach
    /// `full_records` to the resulting snapshot.
    pub fn finish(self, full_records: &[Record]) -> StatsSnapshot {
        let monthly_timeline: BTreeMap<String, TimelineBucket> = self
            .monthly
            .iter()
            .map(|(key, acc)| (key.clone(), acc.finish()))
            .collect();
        let yearly_timeline = self
            .yearly
            .iter()
            .map(|(key, acc)| (key.clone(), acc.finish()))
            .collect();
        let trend = compute_trend(&monthly_timeline);

        StatsSnapshot {
            total_count: self.total_count,
            approved_count: self.approved_count,
            denied_count: self.denied_count,
            average_duration_days: self.durations.mean(),
            counts_by_company: self.counts_by_company,
            counts_by_subject: self.counts_by_subject,
            durations_by_status: self.durations_by_status,
            monthly_timeline,
            yearly_timeline,
            trend,
            records: full_records.to_vec(),
        }
    }
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Summarize `to_process` while retaining `full` in the snapshot.
///
/// Pass a filtered subset as `to_process` to describe the selection while
/// still carrying the unfiltered records forward for later re-filtering.
pub fn aggregate(full: &[Record], to_process: &[Record]) -> StatsSnapshot {
    let mut builder = SnapshotBuilder::new();
    for record in to_process {
        builder.push(record);
    }
    let snapshot = builder.finish(full);
    debug!(
        "Aggregated {} of {} records: {} approved, {} denied, {} months",
        snapshot.total_count,
        full.len(),
        snapshot.approved_count,
        snapshot.denied_count,
        snapshot.monthly_timeline.len()
    );
    snapshot
}

/// Summarize every record in `records`.
pub fn aggregate_all(records: &[Record]) -> StatsSnapshot {
    aggregate(records, records)
}

/// The `limit` entries with the highest counts, highest first.
///
/// Equal counts keep the key order of `counts`, so the result is
/// deterministic for a given input.
pub fn top_items(counts: &BTreeMap<String, usize>, limit: usize) -> Vec<(String, usize)> {
    let mut entries: Vec<(&String, &usize)> = counts.iter().collect();
    entries.sort_by(|a, b| b.1.cmp(a.1));
    entries
        .into_iter()
        .take(limit)
        .map(|(key, count)| (key.clone(), *count))
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
