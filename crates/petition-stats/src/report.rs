use std::collections::BTreeMap;
use std::fmt::Write;

use petition_core::error::Result;
use petition_core::formatting::{
    format_count, format_days, format_number, format_percent, truncate_label,
};
use petition_core::models::{FilterSpec, OutcomeFilter};
use petition_data::aggregator::{
    duration_trend_line, outcome_shares, top_items, StatsSnapshot, TimelineBucket,
};
use petition_data::analysis::AnalysisResult;
use serde::Serialize;

/// Longest company or subject label printed in list sections.
const LABEL_WIDTH: usize = 60;

/// How many list entries to print for each ranked section.
#[derive(Debug, Clone, Copy)]
pub struct ReportLimits {
    pub companies: usize,
    pub subjects: usize,
}

// ── JSON ──────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    result: &'a AnalysisResult,
    approval_rate: f64,
    denial_rate: f64,
    top_companies: Vec<(String, usize)>,
    top_subjects: Vec<(String, usize)>,
    average_duration_by_status: BTreeMap<String, i64>,
}

/// Pretty JSON of the analysis plus the ranked lists of the filtered view.
pub fn render_json(result: &AnalysisResult, limits: ReportLimits) -> Result<String> {
    let filtered = &result.filtered;
    let report = JsonReport {
        result,
        approval_rate: filtered.approval_rate(),
        denial_rate: filtered.denial_rate(),
        top_companies: top_items(&filtered.counts_by_company, limits.companies),
        top_subjects: top_items(&filtered.counts_by_subject, limits.subjects),
        average_duration_by_status: filtered.average_duration_by_status(),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

// ── Text ──────────────────────────────────────────────────────────────────────

/// One-line description of the active filter.
pub fn describe_filter(spec: &FilterSpec) -> String {
    let subjects = if spec.subjects.is_empty() {
        "all subjects".to_string()
    } else {
        format!(
            "subjects [{}]",
            spec.subjects.iter().cloned().collect::<Vec<_>>().join("; ")
        )
    };
    let outcome = match spec.outcome {
        OutcomeFilter::Any => "any outcome",
        OutcomeFilter::Approved => "approved only",
        OutcomeFilter::Denied => "denied only",
    };
    let dates = match (spec.date_from, spec.date_to) {
        (None, None) => "any date".to_string(),
        (Some(from), None) => format!("published from {}", from),
        (None, Some(to)) => format!("published until {}", to),
        (Some(from), Some(to)) => format!("published {} to {}", from, to),
    };
    format!("{}, {}, {}", subjects, outcome, dates)
}

/// Plain-text summary of the filtered view.
pub fn render_text(result: &AnalysisResult, limits: ReportLimits) -> String {
    let data = &result.filtered;
    let mut output = String::new();

    let _ = writeln!(output, "# Petition Decisions");
    let _ = writeln!(
        output,
        "{} of {} records match ({})",
        format_count(result.metadata.records_matched),
        format_count(result.metadata.records_loaded),
        describe_filter(&result.filter)
    );
    let _ = writeln!(output);

    write_overview(&mut output, data);

    if !data.monthly_timeline.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Trend (last 6 months)");
        let _ = writeln!(
            output,
            "- Approvals: {} ({} pts)",
            data.trend.approval_trend,
            format_number(data.trend.magnitude_percent, 1)
        );
        let _ = writeln!(output, "- Denials: {}", data.trend.denial_trend);
        if let Some(line) = duration_trend_line(&data.monthly_timeline) {
            let _ = writeln!(
                output,
                "- Processing time: {:+.1} days per month",
                line.slope
            );
        }
    }

    write_ranked(
        &mut output,
        "Top Companies",
        &top_items(&data.counts_by_company, limits.companies),
    );
    write_ranked(
        &mut output,
        "Top Subjects",
        &top_items(&data.counts_by_subject, limits.subjects),
    );

    let by_status = data.average_duration_by_status();
    if !by_status.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Average Time by Status");
        for (status, days) in &by_status {
            let _ = writeln!(
                output,
                "- {}: {}",
                truncate_label(status, LABEL_WIDTH),
                format_days(*days as f64)
            );
        }
    }

    write_timeline(&mut output, "Monthly Timeline", &data.monthly_timeline);
    write_timeline(&mut output, "Yearly Timeline", &data.yearly_timeline);

    output
}

fn write_overview(output: &mut String, data: &StatsSnapshot) {
    let _ = writeln!(output, "## Overview");
    let _ = writeln!(output, "- Records: {}", format_count(data.total_count));
    let _ = writeln!(
        output,
        "- Approved: {} ({})",
        format_count(data.approved_count),
        format_percent(data.approval_rate())
    );
    let _ = writeln!(
        output,
        "- Denied: {} ({})",
        format_count(data.denied_count),
        format_percent(data.denial_rate())
    );
    let _ = writeln!(
        output,
        "- Average processing time: {}",
        format_days(data.average_duration_days)
    );
    let _ = writeln!(
        output,
        "- Registration holders: {}",
        format_count(data.counts_by_company.len())
    );
    if let Some((company, count)) = data.top_company() {
        let _ = writeln!(
            output,
            "- Most active: {} ({} petitions)",
            truncate_label(&company, 25),
            format_count(count)
        );
    }
}

fn write_ranked(output: &mut String, title: &str, items: &[(String, usize)]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(output);
    let _ = writeln!(output, "## {}", title);
    for (name, count) in items {
        let _ = writeln!(
            output,
            "- {}: {}",
            truncate_label(name, LABEL_WIDTH),
            format_count(*count)
        );
    }
}

fn write_timeline(output: &mut String, title: &str, timeline: &BTreeMap<String, TimelineBucket>) {
    if timeline.is_empty() {
        return;
    }
    let _ = writeln!(output);
    let _ = writeln!(output, "## {}", title);
    for (period, bucket) in timeline {
        let _ = writeln!(
            output,
            "- {}: {} approved, {} denied ({} approved), mean {}",
            period,
            format_count(bucket.approved_count),
            format_count(bucket.denied_count),
            format_percent(bucket.approval_share()),
            format_days(bucket.mean_duration)
        );
    }
    let shares = outcome_shares(timeline);
    let _ = writeln!(
        output,
        "- Overall: {} approved, {} denied",
        format_percent(shares.approved_percent),
        format_percent(shares.denied_percent)
    );
}

// ── Tests ─────────────────────────────────────────────────────────────────────
