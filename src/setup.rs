use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{PdfSettings, CONFIG_FILE_NAME, CONFIG_TEMPLATE, SAMPLE_CSV};
use crate::error::Result;
use crate::pdf::PdfCapability;
use crate::render::DEFAULT_TEMPLATE;

pub const SAMPLE_CSV_NAME: &str = "invoices_data.csv";
pub const TEMPLATE_NAME: &str = "invoice_template.html";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Found,
    Missing,
    Created,
}

#[derive(Debug, Clone)]
pub struct FileCheck {
    pub description: &'static str,
    pub path: PathBuf,
    pub status: FileStatus,
}

#[derive(Debug, Clone)]
pub struct SetupReport {
    pub pdf_command: String,
    pub pdf_available: bool,
    pub files: Vec<FileCheck>,
}

/// Check the working files in `dir`, optionally writing the missing ones
/// from the built-in samples. Existing files are never overwritten.
pub fn run_setup(dir: &Path, pdf: &PdfSettings, create_missing: bool) -> Result<SetupReport> {
    let pdf_available = PdfCapability::detect(pdf).is_available();

    let wanted: [(&'static str, &str, &str); 3] = [
        ("Sample CSV data file", SAMPLE_CSV_NAME, SAMPLE_CSV),
        ("Invoice template", TEMPLATE_NAME, DEFAULT_TEMPLATE),
        ("Configuration file", CONFIG_FILE_NAME, CONFIG_TEMPLATE),
    ];

    if create_missing {
        fs::create_dir_all(dir)?;
    }

    let mut files = Vec::with_capacity(wanted.len());
    for (description, name, content) in wanted {
        let path = dir.join(name);
        let status = if path.exists() {
            FileStatus::Found
        } else if create_missing {
            fs::write(&path, content)?;
            FileStatus::Created
        } else {
            FileStatus::Missing
        };
        files.push(FileCheck {
            description,
            path,
            status,
        });
    }

    Ok(SetupReport {
        pdf_command: pdf.command.clone(),
        pdf_available,
        files,
    })
}
