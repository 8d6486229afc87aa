use chrono::Local;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use super::GenerationOutcome;
use crate::error::Result;

/// Run configuration recorded alongside the results
#[derive(Debug, Serialize)]
pub struct ReportConfig {
    pub template_path: PathBuf,
    pub output_dir: PathBuf,
    pub pdf_available: bool,
}

/// Complete data for the generation report file
#[derive(Debug, Serialize)]
pub struct ReportData<'a> {
    pub timestamp: String,
    pub results: &'a GenerationOutcome,
    pub config: ReportConfig,
}

/// Write `generation_report_<timestamp>.json` into `output_dir`
pub fn write_report(
    outcome: &GenerationOutcome,
    config: ReportConfig,
    output_dir: &Path,
) -> Result<PathBuf> {
    let now = Local::now();
    let report = ReportData {
        timestamp: now.to_rfc3339(),
        results: outcome,
        config,
    };

    fs::create_dir_all(output_dir)?;
    let filename = format!("generation_report_{}.json", now.format("%Y%m%d_%H%M%S"));
    let path = output_dir.join(filename);

    let json = serde_json::to_string_pretty(&report)?;
    fs::write(&path, json)?;

    Ok(path)
}
