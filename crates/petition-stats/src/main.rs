mod bootstrap;
mod report;

use anyhow::{Context, Result};
use petition_core::settings::Settings;
use petition_data::analysis::analyze_file;

use crate::report::ReportLimits;

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("petition-stats v{} starting", env!("CARGO_PKG_VERSION"));

    let spec = settings.filter_spec()?;
    let data_path = bootstrap::resolve_data_path(settings.csv.as_deref())
        .context("no petition export found; pass --csv or place dados.csv in the working directory")?;
    tracing::info!("Reading petitions from {}", data_path.display());

    let result = analyze_file(&data_path, &spec)?;
    tracing::info!(
        "Analysis finished in {:.3}s (load {:.3}s)",
        result.metadata.load_time_seconds + result.metadata.aggregate_time_seconds,
        result.metadata.load_time_seconds
    );

    let limits = ReportLimits {
        companies: settings.top_companies,
        subjects: settings.top_subjects,
    };
    let output = if settings.wants_json() {
        report::render_json(&result, limits)?
    } else {
        report::render_text(&result, limits)
    };
    println!("{}", output);

    Ok(())
}
