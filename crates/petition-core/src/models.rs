use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::time_utils::parse_publication_date;

/// Status sentence published when a petition is granted.
pub const APPROVED_STATUS: &str = "Foi publicado o deferimento do processo ou da petição.";

/// Status sentence published when a petition is refused.
pub const DENIED_STATUS: &str = "Foi publicado o indeferimento do processo ou da petição.";

/// Subjects selected by the dashboard preset.
pub const DEFAULT_SUBJECTS: &[&str] = &[
    "SIMILAR - Registro de Medicamento Similar",
    "GENERICO - Registro de Medicamento",
];

/// Lower publication-date bound of the dashboard preset.
pub const DEFAULT_DATE_FROM: (i32, u32, u32) = (2020, 1, 1);

/// Decision outcome derived once from the free-text status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Approved,
    Denied,
    /// Any status that is not one of the two published decisions.
    Other,
}

impl Outcome {
    /// Classify a status by exact comparison with the sentinel sentences.
    pub fn from_status(status: &str) -> Self {
        match status {
            APPROVED_STATUS => Outcome::Approved,
            DENIED_STATUS => Outcome::Denied,
            _ => Outcome::Other,
        }
    }
}

/// Outcome clause of a [`FilterSpec`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeFilter {
    #[default]
    Any,
    Approved,
    Denied,
}

impl OutcomeFilter {
    /// Whether a record with `outcome` satisfies this clause.
    pub fn matches(self, outcome: Outcome) -> bool {
        match self {
            OutcomeFilter::Any => true,
            OutcomeFilter::Approved => outcome == Outcome::Approved,
            OutcomeFilter::Denied => outcome == Outcome::Denied,
        }
    }
}

/// One petition row exactly as it arrives from the CSV export.
///
/// Column names follow the upstream export; unknown columns are ignored and
/// missing ones default to the empty string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawRecord {
    #[serde(rename = "empresa_cnpj")]
    pub company_id: String,
    #[serde(rename = "empresa_razaoSocial")]
    pub company_name: String,
    #[serde(rename = "processo_numero")]
    pub process_number: String,
    #[serde(rename = "peticao_expediente")]
    pub petition_id: String,
    #[serde(rename = "assunto_descricao")]
    pub subject: String,
    #[serde(rename = "situacao_descricao")]
    pub status: String,
    #[serde(rename = "peticao_dataPublicacao")]
    pub publication_date: String,
    #[serde(rename = "Tempo_Peticao")]
    pub duration_days: String,
}

impl RawRecord {
    /// Whether the row carries every field the pipeline requires:
    /// company name, process number and status.
    pub fn has_required_fields(&self) -> bool {
        !self.company_name.is_empty() && !self.process_number.is_empty() && !self.status.is_empty()
    }
}

/// An immutable petition record with its outcome already tagged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub company_id: String,
    pub company_name: String,
    pub process_number: String,
    pub petition_id: String,
    pub subject: String,
    pub status: String,
    pub publication_date: String,
    pub duration_days: String,
    outcome: Outcome,
}

impl From<RawRecord> for Record {
    fn from(raw: RawRecord) -> Self {
        let outcome = Outcome::from_status(&raw.status);
        Self {
            company_id: raw.company_id,
            company_name: raw.company_name,
            process_number: raw.process_number,
            petition_id: raw.petition_id,
            subject: raw.subject,
            status: raw.status,
            publication_date: raw.publication_date,
            duration_days: raw.duration_days,
            outcome,
        }
    }
}

impl Record {
    /// Outcome tagged from `status` at construction.
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Publication day, or `None` when the field is blank or malformed.
    pub fn published_on(&self) -> Option<NaiveDate> {
        parse_publication_date(&self.publication_date)
    }

    /// Processing duration in days when it is a finite, strictly positive
    /// number; `None` otherwise.
    pub fn duration(&self) -> Option<f64> {
        parse_duration_days(&self.duration_days).filter(|d| d.is_finite() && *d > 0.0)
    }
}

/// Parse the leading decimal number of `s`, ignoring trailing text.
///
/// `"12.5 dias"` yields `12.5`; `"abc"` and `""` yield `None`. Leading
/// whitespace is skipped, an optional sign and exponent are accepted.
pub fn parse_duration_days(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        mantissa_digits += frac_end - frac_start;
        end = frac_end;
    }
    if mantissa_digits == 0 {
        return None;
    }

    // Only consume an exponent that has at least one digit.
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

/// Predicates applied by the record filter. All clauses are ANDed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterSpec {
    /// Accepted subjects. Empty means no subject restriction.
    pub subjects: BTreeSet<String>,
    pub outcome: OutcomeFilter,
    /// Inclusive lower publication-day bound.
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper publication-day bound.
    pub date_to: Option<NaiveDate>,
}

impl FilterSpec {
    /// The selection the dashboard starts with: similar and generic drug
    /// registrations published since 2020-01-01, any outcome.
    pub fn dashboard_default() -> Self {
        let (y, m, d) = DEFAULT_DATE_FROM;
        Self {
            subjects: DEFAULT_SUBJECTS.iter().map(|s| s.to_string()).collect(),
            outcome: OutcomeFilter::Any,
            date_from: NaiveDate::from_ymd_opt(y, m, d),
            date_to: None,
        }
    }

    /// Whether any date bound is set.
    pub fn has_date_range(&self) -> bool {
        self.date_from.is_some() || self.date_to.is_some()
    }

    /// Whether this spec lets every record through.
    pub fn is_unrestricted(&self) -> bool {
        self.subjects.is_empty() && self.outcome == OutcomeFilter::Any && !self.has_date_range()
    }
}
