use std::path::{Path, PathBuf};
use std::sync::Mutex;

use petition_core::error::{PetitionError, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// File name of the petition export looked up during discovery.
pub const DEFAULT_CSV_NAME: &str = "dados.csv";

/// Per-user directory searched after the working directory.
pub const DATA_DIR_NAME: &str = ".petition-stats";

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map the CLI level names onto tracing filter directives.
///
/// Unrecognised names are passed through so that full `EnvFilter` directives
/// such as `petition_data=trace` keep working.
pub fn normalise_level(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        _ => log_level.to_string(),
    }
}

/// Initialise the global `tracing` subscriber.
///
/// Logs always go to stderr so stdout stays clean for the report. When
/// `log_file` is set, the same events are appended to that file without
/// ANSI colours.
pub fn setup_logging(log_level: &str, log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_new(normalise_level(log_level)).unwrap_or_else(|_| EnvFilter::new("info"));

    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    let file_layer = match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(true)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()?;

    Ok(())
}

// ── Data-path discovery ────────────────────────────────────────────────────────

/// Candidate export locations, in lookup order:
/// 1. `<cwd>/dados.csv`
/// 2. `<home>/.petition-stats/dados.csv`
fn candidates(cwd: &Path, home: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = vec![cwd.join(DEFAULT_CSV_NAME)];
    if let Some(home) = home {
        paths.push(home.join(DATA_DIR_NAME).join(DEFAULT_CSV_NAME));
    }
    paths
}

/// Locate the export among the standard candidates rooted at `cwd` and `home`.
pub fn discover_data_path_in(cwd: &Path, home: Option<&Path>) -> Option<PathBuf> {
    candidates(cwd, home).into_iter().find(|p| p.is_file())
}

/// Resolve the CSV to analyse.
///
/// An explicit path must exist. Without one, the working directory and the
/// per-user data directory are searched.
pub fn resolve_data_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        return Err(PetitionError::DataPathNotFound(path.to_path_buf()));
    }

    let cwd = std::env::current_dir()?;
    let home = dirs::home_dir();
    match discover_data_path_in(&cwd, home.as_deref()) {
        Some(path) => {
            tracing::debug!("Discovered petition export at {}", path.display());
            Ok(path)
        }
        None => Err(PetitionError::DataPathNotFound(cwd.join(DEFAULT_CSV_NAME))),
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
