use std::fmt;
use std::path::Path;

use super::parser::{
    parse_price, parse_quantity, parse_row, Row, ITEM_SEPARATOR, REQUIRED_COLUMNS,
};
use crate::error::{MalformedRowError, Result};

/// Open a CSV reader configured the way every command reads input files
pub fn csv_reader(path: &Path) -> Result<csv::Reader<std::fs::File>> {
    Ok(csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_path(path)?)
}

/// Pair a record with the header names, dropping columns the record lacks
pub fn record_to_row(headers: &csv::StringRecord, record: &csv::StringRecord) -> Row {
    headers
        .iter()
        .zip(record.iter())
        .map(|(h, v)| (h.to_string(), v.to_string()))
        .collect()
}

/// A problem found while validating an input file.
///
/// Issues without a row number concern the file as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub row: Option<usize>,
    pub message: String,
}

impl ValidationIssue {
    fn file(message: impl Into<String>) -> Self {
        Self {
            row: None,
            message: message.into(),
        }
    }

    fn row(row: usize, message: impl Into<String>) -> Self {
        Self {
            row: Some(row),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.row {
            Some(row) => write!(f, "Row {}: {}", row, self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Check a CSV file's structure and content.
///
/// An empty list means the file is ready to process. Rows are numbered
/// from 1, excluding the header.
pub fn validate_csv(path: &Path) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if !path.exists() {
        issues.push(ValidationIssue::file(format!(
            "CSV file not found: {}",
            path.display()
        )));
        return issues;
    }

    if let Err(e) = check_contents(path, &mut issues) {
        issues.push(ValidationIssue::file(e.to_string()));
    }

    issues
}

fn check_contents(path: &Path, issues: &mut Vec<ValidationIssue>) -> Result<()> {
    let mut reader = csv_reader(path)?;
    let headers = reader.headers()?.clone();

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|c| !headers.iter().any(|h| h == *c))
        .collect();
    if !missing.is_empty() {
        issues.push(ValidationIssue::file(format!(
            "Missing required columns: {}",
            missing.join(", ")
        )));
    }

    for (idx, record) in reader.records().enumerate() {
        let row_num = idx + 1;
        let row = match record {
            Ok(record) => record_to_row(&headers, &record),
            Err(e) => {
                issues.push(ValidationIssue::row(row_num, e.to_string()));
                continue;
            }
        };
        let value = |name: &str| row.get(name).map(String::as_str).unwrap_or("");

        if value("invoice_no").trim().is_empty() {
            issues.push(ValidationIssue::row(row_num, "Missing invoice number"));
        }

        if value("bill_to").trim().is_empty() {
            issues.push(ValidationIssue::row(row_num, "Missing bill_to information"));
        }

        if value("quantity")
            .split(ITEM_SEPARATOR)
            .any(|t| parse_quantity(t).is_err())
        {
            issues.push(ValidationIssue::row(row_num, "Invalid quantity values"));
        }

        if value("price")
            .split(ITEM_SEPARATOR)
            .any(|t| parse_price(t).is_err())
        {
            issues.push(ValidationIssue::row(row_num, "Invalid price values"));
        }

        if let Err(MalformedRowError::AmountOverflow(_)) = parse_row(&row) {
            issues.push(ValidationIssue::row(row_num, "Amount values are too large"));
        }
    }

    Ok(())
}
