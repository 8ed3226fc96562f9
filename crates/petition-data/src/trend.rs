//! Approval/denial trend over the most recent months of a timeline.

use std::collections::BTreeMap;

use petition_core::calculations::percent_of;
use serde::Serialize;

use crate::aggregator::TimelineBucket;

/// Number of trailing months inspected.
pub const TREND_WINDOW_MONTHS: usize = 6;

/// Share shift, in percentage points, beyond which a trend is reported.
pub const TREND_THRESHOLD_POINTS: f64 = 5.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    #[default]
    Stable,
}

impl TrendDirection {
    /// Classify a share delta against the fixed symmetric threshold.
    pub fn from_delta(delta: f64) -> Self {
        if delta > TREND_THRESHOLD_POINTS {
            TrendDirection::Increasing
        } else if delta < -TREND_THRESHOLD_POINTS {
            TrendDirection::Decreasing
        } else {
            TrendDirection::Stable
        }
    }
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            TrendDirection::Increasing => "increasing",
            TrendDirection::Decreasing => "decreasing",
            TrendDirection::Stable => "stable",
        };
        f.write_str(label)
    }
}

/// Direction of the approval and denial shares plus the approval shift size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Trend {
    pub approval_trend: TrendDirection,
    pub denial_trend: TrendDirection,
    /// Absolute approval-share change in percentage points.
    pub magnitude_percent: f64,
}

#[derive(Debug, Default)]
struct HalfTotals {
    approved: usize,
    denied: usize,
}

impl HalfTotals {
    fn sum<'a>(buckets: impl Iterator<Item = &'a TimelineBucket>) -> Self {
        buckets.fold(Self::default(), |acc, b| HalfTotals {
            approved: acc.approved + b.approved_count,
            denied: acc.denied + b.denied_count,
        })
    }

    fn approval_share(&self) -> f64 {
        percent_of(self.approved, self.approved + self.denied)
    }

    fn denial_share(&self) -> f64 {
        percent_of(self.denied, self.approved + self.denied)
    }
}

/// Compare outcome shares between the two halves of the last six months.
///
/// The window's older half holds `ceil(n / 2)` months. Fewer than two
/// months always yields a stable trend with zero magnitude.
pub fn compute_trend(monthly: &BTreeMap<String, TimelineBucket>) -> Trend {
    if monthly.len() < 2 {
        return Trend::default();
    }

    // BTreeMap iterates zero-padded "YYYY-MM" keys chronologically.
    let recent: Vec<&TimelineBucket> = monthly
        .values()
        .skip(monthly.len().saturating_sub(TREND_WINDOW_MONTHS))
        .collect();
    let split = recent.len().div_ceil(2);
    let (first, second) = recent.split_at(split);

    let first = HalfTotals::sum(first.iter().copied());
    let second = HalfTotals::sum(second.iter().copied());

    let approval_delta = second.approval_share() - first.approval_share();
    let denial_delta = second.denial_share() - first.denial_share();

    Trend {
        approval_trend: TrendDirection::from_delta(approval_delta),
        denial_trend: TrendDirection::from_delta(denial_delta),
        magnitude_percent: approval_delta.abs(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
