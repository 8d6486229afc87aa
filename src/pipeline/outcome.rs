use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// A row that could not be processed.
///
/// `row_number` is 1-based over the data rows; failures that affect the
/// whole input (such as an unreadable file) have none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowFailure {
    pub row_number: Option<usize>,
    pub message: String,
}

impl fmt::Display for RowFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.row_number {
            Some(n) => write!(f, "Row {}: {}", n, self.message),
            None => f.write_str(&self.message),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// Something that happened while processing, for the caller to log
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEvent {
    pub level: EventLevel,
    pub row: Option<usize>,
    pub message: String,
}

impl LogEvent {
    /// Forward this event to `tracing`. Batch-level events carry no `row` field.
    pub fn emit(&self) {
        let row = self.row;
        match self.level {
            EventLevel::Debug => tracing::debug!(row, "{}", self.message),
            EventLevel::Info => tracing::info!(row, "{}", self.message),
            EventLevel::Warn => tracing::warn!(row, "{}", self.message),
            EventLevel::Error => tracing::error!(row, "{}", self.message),
        }
    }
}

/// Aggregate result of one batch run
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationOutcome {
    pub total_processed: usize,
    pub generated_previews: Vec<PathBuf>,
    pub generated_pdfs: Vec<PathBuf>,
    pub errors: Vec<RowFailure>,
    pub total_amount: Decimal,
    pub events: Vec<LogEvent>,
}

impl GenerationOutcome {
    /// An outcome for a batch that could not start
    pub fn failed(message: impl Into<String>) -> Self {
        let mut outcome = Self::default();
        outcome.record_error(None, message);
        outcome
    }

    pub fn record_error(&mut self, row_number: Option<usize>, message: impl Into<String>) {
        let failure = RowFailure {
            row_number,
            message: message.into(),
        };
        self.log(EventLevel::Error, row_number, failure.to_string());
        self.errors.push(failure);
    }

    pub fn log(&mut self, level: EventLevel, row: Option<usize>, message: impl Into<String>) {
        self.events.push(LogEvent {
            level,
            row,
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
