use std::path::PathBuf;
use thiserror::Error;

/// All errors produced at the ingestion and configuration boundary.
///
/// Filtering, aggregation and trend computation are total and never return
/// one of these.
#[derive(Error, Debug)]
pub enum PetitionError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader rejected the input.
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Every row of the file was missing a required field.
    #[error("No valid records found in {0}")]
    NoValidRecords(PathBuf),

    /// The petition CSV could not be located.
    #[error("Data path not found: {0}")]
    DataPathNotFound(PathBuf),

    /// A date string did not match `YYYY-MM-DD`.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A snapshot could not be encoded as JSON.
    #[error("Failed to encode JSON: {0}")]
    JsonEncode(#[from] serde_json::Error),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the petition crates.
pub type Result<T> = std::result::Result<T, PetitionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = PetitionError::FileRead {
            path: PathBuf::from("/data/dados.csv"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("/data/dados.csv"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_no_valid_records() {
        let err = PetitionError::NoValidRecords(PathBuf::from("/empty.csv"));
        assert_eq!(err.to_string(), "No valid records found in /empty.csv");
    }

    #[test]
    fn test_error_display_data_path_not_found() {
        let err = PetitionError::DataPathNotFound(PathBuf::from("/missing/dados.csv"));
        assert_eq!(err.to_string(), "Data path not found: /missing/dados.csv");
    }

    #[test]
    fn test_error_display_invalid_date() {
        let err = PetitionError::InvalidDate("2024-13-01".to_string());
        assert_eq!(err.to_string(), "Invalid date: 2024-13-01");
    }

    #[test]
    fn test_error_display_config() {
        let err = PetitionError::Config("date-from is after date-to".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: date-from is after date-to"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: PetitionError = io_err.into();
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid}").unwrap_err();
        let err: PetitionError = json_err.into();
        assert!(err.to_string().contains("Failed to encode JSON"));
    }
}
