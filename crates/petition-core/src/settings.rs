use std::collections::BTreeSet;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;

use crate::error::{PetitionError, Result};
use crate::models::{FilterSpec, OutcomeFilter};
use crate::time_utils::parse_filter_date;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Decision statistics for drug-registration petitions
#[derive(Parser, Debug, Clone)]
#[command(
    name = "petition-stats",
    about = "Decision statistics for drug-registration petitions",
    version
)]
pub struct Settings {
    /// Petition CSV export (discovered automatically if not specified)
    #[arg(long, env = "PETITION_CSV")]
    pub csv: Option<PathBuf>,

    /// Only keep petitions with this subject (repeatable)
    #[arg(long = "subject", value_name = "SUBJECT")]
    pub subjects: Vec<String>,

    /// Only keep petitions with this outcome
    #[arg(long, value_enum, default_value_t = OutcomeFilter::Any)]
    pub outcome: OutcomeFilter,

    /// Earliest publication date, inclusive (YYYY-MM-DD)
    #[arg(long, value_parser = parse_filter_date)]
    pub date_from: Option<NaiveDate>,

    /// Latest publication date, inclusive (YYYY-MM-DD)
    #[arg(long, value_parser = parse_filter_date)]
    pub date_to: Option<NaiveDate>,

    /// Start from the dashboard preset (similar and generic registrations
    /// since 2020-01-01); explicit filter flags override it
    #[arg(long)]
    pub default_filters: bool,

    /// Number of companies listed in the summary
    #[arg(long, default_value = "10")]
    pub top_companies: usize,

    /// Number of subjects listed in the summary
    #[arg(long, default_value = "8")]
    pub top_subjects: usize,

    /// Output format
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments and resolve derived values.
    pub fn load() -> Self {
        Self::resolve(Settings::parse())
    }

    /// Same as [`Settings::load`] but accepts an explicit argument list,
    /// enabling unit-testing without spawning subprocesses.
    pub fn load_from_args<I, T>(args: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Settings::try_parse_from(args).map(Self::resolve)
    }

    fn resolve(mut settings: Settings) -> Settings {
        // --debug overrides log level.
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// Build the record filter described by the command line.
    ///
    /// With `--default-filters` the dashboard preset is the starting point and
    /// each explicitly given clause replaces the preset's clause. Fails when
    /// the date range is inverted.
    pub fn filter_spec(&self) -> Result<FilterSpec> {
        let mut spec = if self.default_filters {
            FilterSpec::dashboard_default()
        } else {
            FilterSpec::default()
        };

        if !self.subjects.is_empty() {
            spec.subjects = self.subjects.iter().cloned().collect::<BTreeSet<_>>();
        }
        if self.outcome != OutcomeFilter::Any {
            spec.outcome = self.outcome;
        }
        if self.date_from.is_some() {
            spec.date_from = self.date_from;
        }
        if self.date_to.is_some() {
            spec.date_to = self.date_to;
        }

        if let (Some(from), Some(to)) = (spec.date_from, spec.date_to) {
            if from > to {
                return Err(PetitionError::Config(format!(
                    "date-from {} is after date-to {}",
                    from, to
                )));
            }
        }

        Ok(spec)
    }

    /// Whether the JSON output format was requested.
    pub fn wants_json(&self) -> bool {
        self.format == "json"
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Settings {
        let mut full = vec!["petition-stats"];
        full.extend_from_slice(args);
        Settings::load_from_args(full).expect("valid arguments")
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_defaults() {
        let s = parse(&[]);
        assert!(s.csv.is_none());
        assert!(s.subjects.is_empty());
        assert_eq!(s.outcome, OutcomeFilter::Any);
        assert_eq!(s.top_companies, 10);
        assert_eq!(s.top_subjects, 8);
        assert_eq!(s.format, "text");
        assert_eq!(s.log_level, "INFO");
        assert!(s.filter_spec().unwrap().is_unrestricted());
    }

    #[test]
    fn test_debug_overrides_log_level() {
        let s = parse(&["--log-level", "ERROR", "--debug"]);
        assert_eq!(s.log_level, "DEBUG");
    }

    #[test]
    fn test_repeatable_subjects() {
        let s = parse(&["--subject", "A", "--subject", "B", "--subject", "A"]);
        let spec = s.filter_spec().unwrap();
        assert_eq!(spec.subjects.len(), 2);
        assert!(spec.subjects.contains("A"));
        assert!(spec.subjects.contains("B"));
    }

    #[test]
    fn test_outcome_and_dates() {
        let s = parse(&[
            "--outcome",
            "denied",
            "--date-from",
            "2023-01-01",
            "--date-to",
            "2023-12-31",
        ]);
        let spec = s.filter_spec().unwrap();
        assert_eq!(spec.outcome, OutcomeFilter::Denied);
        assert_eq!(spec.date_from, Some(ymd(2023, 1, 1)));
        assert_eq!(spec.date_to, Some(ymd(2023, 12, 31)));
    }

    #[test]
    fn test_invalid_date_is_rejected_by_parser() {
        let result = Settings::load_from_args(["petition-stats", "--date-from", "2023-02-30"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_format_is_rejected_by_parser() {
        let result = Settings::load_from_args(["petition-stats", "--format", "xml"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_inverted_range_is_config_error() {
        let s = parse(&["--date-from", "2024-02-01", "--date-to", "2024-01-01"]);
        let err = s.filter_spec().unwrap_err();
        assert!(matches!(err, PetitionError::Config(_)));
    }

    #[test]
    fn test_same_day_range_is_allowed() {
        let s = parse(&["--date-from", "2024-02-01", "--date-to", "2024-02-01"]);
        assert!(s.filter_spec().is_ok());
    }

    #[test]
    fn test_default_filters_preset() {
        let spec = parse(&["--default-filters"]).filter_spec().unwrap();
        assert_eq!(spec, FilterSpec::dashboard_default());
    }

    #[test]
    fn test_explicit_flags_override_preset() {
        let spec = parse(&[
            "--default-filters",
            "--subject",
            "NOVO - Registro de Medicamento Novo",
            "--date-from",
            "2022-06-01",
        ])
        .filter_spec()
        .unwrap();
        assert_eq!(spec.subjects.len(), 1);
        assert_eq!(spec.date_from, Some(ymd(2022, 6, 1)));
    }

    #[test]
    fn test_preset_range_checked_against_explicit_end() {
        let s = parse(&["--default-filters", "--date-to", "2019-12-31"]);
        assert!(s.filter_spec().is_err());
    }

    #[test]
    fn test_wants_json() {
        assert!(parse(&["--format", "json"]).wants_json());
        assert!(!parse(&[]).wants_json());
    }
}
