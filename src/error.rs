use std::path::PathBuf;
use thiserror::Error;

/// Reasons a single input row cannot become an invoice.
///
/// These are recovered by the batch pipeline: the row is recorded in the
/// outcome and processing moves on to the next one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedRowError {
    #[error("Missing required field '{0}'")]
    MissingField(String),

    #[error("Invalid quantity '{token}' for item '{product}': {reason}")]
    InvalidQuantity {
        product: String,
        token: String,
        reason: String,
    },

    #[error("Invalid price '{token}' for item '{product}': {reason}")]
    InvalidPrice {
        product: String,
        token: String,
        reason: String,
    },

    #[error("Field '{0}' must not be empty")]
    EmptyField(String),

    #[error("Amount for '{0}' is too large")]
    AmountOverflow(String),
}

#[derive(Error, Debug)]
pub enum InvoiceError {
    #[error("Config file not found: {0}")]
    ConfigFileNotFound(PathBuf),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Template file not found: {0}")]
    TemplateNotFound(PathBuf),

    #[error("CSV file not found: {0}")]
    InputNotFound(PathBuf),

    #[error("Error reading CSV file: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    MalformedRow(#[from] MalformedRowError),

    #[error("Invoice {0} not found in CSV")]
    InvoiceNotInInput(String),

    #[error("No data found in CSV")]
    EmptyInput,

    #[error("Validation failed with {0} issue(s)")]
    ValidationFailed(usize),

    #[error("PDF renderer '{0}' not found. Install it or disable PDF output with --preview-only")]
    RendererNotFound(String),

    #[error("Failed to generate PDF: {0}")]
    PdfGeneration(String),

    #[error("Failed to write report: {0}")]
    Report(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, InvoiceError>;
