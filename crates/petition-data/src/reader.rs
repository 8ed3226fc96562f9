//! CSV loading for petition exports.
//!
//! Tokenizing is delegated to the `csv` crate; this module maps rows onto
//! [`RawRecord`], rejects rows that lack a required field, and tags each
//! surviving row's outcome by converting it into a [`Record`].

use std::io::Read;
use std::path::Path;

use petition_core::error::{PetitionError, Result};
use petition_core::models::{RawRecord, Record};
use tracing::{debug, info, warn};

// ── Public API ────────────────────────────────────────────────────────────────

/// Counters collected while reading one export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadStats {
    /// Rows the CSV reader produced.
    pub rows_read: usize,
    /// Rows that could not be mapped onto the record schema.
    pub rows_malformed: usize,
    /// Rows dropped for a missing company name, process number or status.
    pub rows_incomplete: usize,
}

/// Load every valid record from the CSV file at `path`.
///
/// Fails when the file cannot be opened, when its header cannot be read, or
/// when no row survives validation.
pub fn load_records(path: &Path) -> Result<Vec<Record>> {
    let file = std::fs::File::open(path).map_err(|source| PetitionError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let (records, stats) = read_records(file)?;
    info!(
        "Loaded {} records from {} ({} malformed, {} incomplete)",
        records.len(),
        path.display(),
        stats.rows_malformed,
        stats.rows_incomplete,
    );

    if records.is_empty() {
        return Err(PetitionError::NoValidRecords(path.to_path_buf()));
    }
    Ok(records)
}

/// Read records from any CSV source with a header row.
///
/// Malformed and incomplete rows are skipped and counted rather than
/// failing the whole read.
pub fn read_records<R: Read>(source: R) -> Result<(Vec<Record>, ReadStats)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(source);

    let headers = reader.headers()?.clone();
    if !headers.iter().any(|h| h == "situacao_descricao") {
        warn!("CSV header has no situacao_descricao column; every row will be rejected");
    }

    let mut stats = ReadStats::default();
    let mut records = Vec::new();

    for (index, row) in reader.deserialize::<RawRecord>().enumerate() {
        stats.rows_read += 1;
        let raw = match row {
            Ok(raw) => raw,
            Err(e) => {
                debug!("Skipping malformed CSV row {}: {}", index + 1, e);
                stats.rows_malformed += 1;
                continue;
            }
        };

        if !raw.has_required_fields() {
            stats.rows_incomplete += 1;
            continue;
        }

        records.push(Record::from(raw));
    }

    debug!(
        "CSV rows: {} read, {} malformed, {} incomplete, {} kept",
        stats.rows_read,
        stats.rows_malformed,
        stats.rows_incomplete,
        records.len()
    );

    Ok((records, stats))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use petition_core::models::{Outcome, APPROVED_STATUS, DENIED_STATUS};
    use std::io::Write;
    use tempfile::TempDir;

    const HEADER: &str = "empresa_cnpj,empresa_razaoSocial,processo_numero,peticao_expediente,\
peticao_dataEntrada,assunto_descricao,situacao_descricao,peticao_dataPublicacao,Tempo_Peticao";

    fn csv_text(rows: &[String]) -> String {
        let mut text = String::from(HEADER);
        text.push('\n');
        for row in rows {
            text.push_str(row);
            text.push('\n');
        }
        text
    }

    fn row(company: &str, process: &str, status: &str, date: &str, duration: &str) -> String {
        format!(
            "11.111.111/0001-11,{},{},123456/24-1,2023-01-01,GENERICO - Registro de Medicamento,\"{}\",{},{}",
            company, process, status, date, duration
        )
    }

    // ── read_records ──────────────────────────────────────────────────────────

    #[test]
    fn test_read_maps_columns() {
        let text = csv_text(&[row("ACME", "25351.1", APPROVED_STATUS, "2024-01-15", "120")]);
        let (records, stats) = read_records(text.as_bytes()).unwrap();

        assert_eq!(stats.rows_read, 1);
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.company_id, "11.111.111/0001-11");
        assert_eq!(record.company_name, "ACME");
        assert_eq!(record.process_number, "25351.1");
        assert_eq!(record.petition_id, "123456/24-1");
        assert_eq!(record.subject, "GENERICO - Registro de Medicamento");
        assert_eq!(record.publication_date, "2024-01-15");
        assert_eq!(record.duration_days, "120");
        assert_eq!(record.outcome(), Outcome::Approved);
    }

    #[test]
    fn test_read_rejects_incomplete_rows() {
        let text = csv_text(&[
            row("", "25351.1", APPROVED_STATUS, "2024-01-15", "120"),
            row("ACME", "", DENIED_STATUS, "2024-01-15", "120"),
            row("ACME", "25351.3", "", "2024-01-15", "120"),
            row("ACME", "25351.4", DENIED_STATUS, "", ""),
        ]);
        let (records, stats) = read_records(text.as_bytes()).unwrap();

        assert_eq!(stats.rows_incomplete, 3);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].process_number, "25351.4");
        assert_eq!(records[0].outcome(), Outcome::Denied);
    }

    #[test]
    fn test_read_ignores_extra_and_missing_columns() {
        let text = "empresa_razaoSocial,processo_numero,situacao_descricao,extra\n\
                    ACME,1,Em análise,whatever\n";
        let (records, _) = read_records(text.as_bytes()).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].subject, "");
        assert_eq!(records[0].duration_days, "");
        assert_eq!(records[0].outcome(), Outcome::Other);
    }

    #[test]
    fn test_read_tolerates_short_rows() {
        let text = "empresa_razaoSocial,processo_numero,situacao_descricao,Tempo_Peticao\n\
                    ACME,1,Em análise\n";
        let (records, stats) = read_records(text.as_bytes()).unwrap();
        assert_eq!(stats.rows_read, 1);
        assert_eq!(stats.rows_malformed, 0);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].company_name, "ACME");
        assert_eq!(records[0].duration_days, "");
        assert_eq!(records[0].duration(), None);
    }

    #[test]
    fn test_read_empty_input() {
        let (records, stats) = read_records(HEADER.as_bytes()).unwrap();
        assert!(records.is_empty());
        assert_eq!(stats, ReadStats::default());
    }

    // ── load_records ──────────────────────────────────────────────────────────

    #[test]
    fn test_load_records_from_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("dados.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            "{}",
            csv_text(&[
                row("ACME", "1", APPROVED_STATUS, "2024-01-15", "10"),
                row("Globex", "2", DENIED_STATUS, "2024-02-20", "20"),
            ])
        )
        .unwrap();

        let records = load_records(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].company_name, "Globex");
    }

    #[test]
    fn test_load_records_missing_file() {
        let tmp = TempDir::new().unwrap();
        let err = load_records(&tmp.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, PetitionError::FileRead { .. }));
    }

    #[test]
    fn test_load_records_without_valid_rows() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("dados.csv");
        std::fs::write(
            &path,
            csv_text(&[row("", "", "", "2024-01-15", "10")]),
        )
        .unwrap();

        let err = load_records(&path).unwrap_err();
        assert!(matches!(err, PetitionError::NoValidRecords(_)));
    }
}
