use std::path::{Path, PathBuf};

use crate::report::ReportSummary;
use crate::run::ItemOutcome;

/// Write the summary and per-item outcomes of one report to a temp file.
/// Returns the file path.
pub fn write_details(
    report: &Path,
    summary: &ReportSummary,
    outcomes: &[ItemOutcome],
) -> crate::Result<PathBuf> {
    write_details_in(&std::env::temp_dir().join("gtest-lens/reports"), report, summary, outcomes)
}

fn write_details_in(
    dir: &Path,
    report: &Path,
    summary: &ReportSummary,
    outcomes: &[ItemOutcome],
) -> crate::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;

    let run_id = uuid::Uuid::new_v4().to_string().split('-').next().unwrap_or("unknown").to_string();
    let date = chrono::Utc::now().format("%Y-%m-%d");
    let path = dir.join(format!("{}-{}.json", run_id, date));

    let details = serde_json::json!({
        "report": report.display().to_string(),
        "summary": summary,
        "outcomes": outcomes,
    });

    std::fs::write(&path, serde_json::to_string_pretty(&details)?)?;
    tracing::debug!("Wrote details for {} to {}", report.display(), path.display());

    Ok(path)
}
