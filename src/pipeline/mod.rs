mod outcome;
mod report;

pub use outcome::{EventLevel, GenerationOutcome, LogEvent, RowFailure};
pub use report::{write_report, ReportConfig, ReportData};

use chrono::{Local, NaiveDate};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::GeneratorConfig;
use crate::error::{InvoiceError, Result};
use crate::invoice::{csv_reader, parse_row, record_to_row, Invoice, Row};
use crate::pdf::PdfCapability;
use crate::render::{format_money, load_template, RenderSettings, Renderer};

/// Turns rows of invoice data into HTML previews and PDFs
pub struct Generator {
    config: GeneratorConfig,
    template: String,
    renderer: Renderer,
    pdf: PdfCapability,
}

impl Generator {
    /// Load the template and prepare the output directory.
    ///
    /// Fails when the template cannot be read, since no row could be
    /// rendered without it.
    pub fn new(config: GeneratorConfig, pdf: PdfCapability) -> Result<Self> {
        let template = load_template(&config.template_path)?;
        fs::create_dir_all(&config.output_dir)?;

        let renderer = Renderer::new(RenderSettings {
            currency_symbol: config.currency_symbol.clone(),
            grace_days: config.grace_days,
            generated_on: Local::now().date_naive(),
        });

        Ok(Self {
            config,
            template,
            renderer,
            pdf,
        })
    }

    /// Use a fixed generation date instead of today
    pub fn with_generated_on(mut self, date: NaiveDate) -> Self {
        let mut settings = self.renderer.settings().clone();
        settings.generated_on = date;
        self.renderer = Renderer::new(settings);
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn pdf_available(&self) -> bool {
        self.pdf.is_available()
    }

    pub fn report_config(&self) -> ReportConfig {
        ReportConfig {
            template_path: self.config.template_path.clone(),
            output_dir: self.config.output_dir.clone(),
            pdf_available: self.pdf_available(),
        }
    }

    pub fn render(&self, invoice: &Invoice) -> String {
        self.renderer.render(&self.template, invoice)
    }

    pub fn preview_path(&self, invoice: &Invoice) -> PathBuf {
        self.config
            .output_dir
            .join(format!("preview_{}.html", invoice.file_stem()))
    }

    pub fn pdf_path(&self, invoice: &Invoice) -> PathBuf {
        self.config
            .output_dir
            .join(format!("invoice_{}.pdf", invoice.file_stem()))
    }

    /// Write the HTML preview for an invoice
    pub fn save_html_preview(&self, html: &str, invoice: &Invoice) -> Result<PathBuf> {
        let path = self.preview_path(invoice);
        fs::write(&path, html)?;
        Ok(path)
    }

    fn start_outcome(&self) -> GenerationOutcome {
        let mut outcome = GenerationOutcome::default();
        if !self.pdf_available() {
            outcome.log(
                EventLevel::Warn,
                None,
                "PDF renderer not available. Generating HTML previews only.",
            );
        }
        outcome
    }

    fn process_row(&self, row_number: usize, row: &Row, outcome: &mut GenerationOutcome) {
        let invoice = match parse_row(row) {
            Ok(invoice) => invoice,
            Err(e) => {
                outcome.record_error(Some(row_number), e.to_string());
                return;
            }
        };

        let total = invoice.total_amount();
        let Some(running_total) = outcome.total_amount.checked_add(total) else {
            outcome.record_error(
                Some(row_number),
                format!("Batch total overflows after invoice {}", invoice.invoice_no),
            );
            return;
        };

        let html = self.render(&invoice);

        let preview = match self.save_html_preview(&html, &invoice) {
            Ok(path) => path,
            Err(e) => {
                outcome.record_error(Some(row_number), e.to_string());
                return;
            }
        };
        outcome.log(
            EventLevel::Info,
            Some(row_number),
            format!("Generated HTML preview: {}", preview.display()),
        );
        outcome.generated_previews.push(preview);

        if let Some(renderer) = self.pdf.renderer() {
            let pdf_path = self.pdf_path(&invoice);
            match renderer.render(&html, &pdf_path) {
                Ok(()) => {
                    outcome.log(
                        EventLevel::Info,
                        Some(row_number),
                        format!("Generated PDF: {}", pdf_path.display()),
                    );
                    outcome.generated_pdfs.push(pdf_path);
                }
                Err(e) => outcome.log(
                    EventLevel::Warn,
                    Some(row_number),
                    format!("Skipped PDF for {}: {}", invoice.invoice_no, e),
                ),
            }
        }

        outcome.total_amount = running_total;
        outcome.total_processed += 1;
        outcome.log(
            EventLevel::Debug,
            Some(row_number),
            format!(
                "Processed {} ({})",
                invoice.invoice_no,
                format_money(total, &self.config.currency_symbol)
            ),
        );
    }

    /// Process rows in order. A bad row is recorded and skipped; it never
    /// stops the batch.
    pub fn process_batch<I>(&self, rows: I) -> GenerationOutcome
    where
        I: IntoIterator<Item = Row>,
    {
        let mut outcome = self.start_outcome();
        for (idx, row) in rows.into_iter().enumerate() {
            self.process_row(idx + 1, &row, &mut outcome);
        }

        outcome
    }

    /// Process every row of a CSV file.
    ///
    /// Never fails: a missing or unreadable file yields an outcome with a
    /// single error and nothing processed.
    pub fn process_csv(&self, path: &Path) -> GenerationOutcome {
        if !path.exists() {
            return GenerationOutcome::failed(
                InvoiceError::InputNotFound(path.to_path_buf()).to_string(),
            );
        }

        let mut reader = match csv_reader(path) {
            Ok(reader) => reader,
            Err(e) => return GenerationOutcome::failed(e.to_string()),
        };
        let headers = match reader.headers() {
            Ok(headers) => headers.clone(),
            Err(e) => return GenerationOutcome::failed(InvoiceError::Csv(e).to_string()),
        };

        let mut outcome = self.start_outcome();

        for (idx, record) in reader.records().enumerate() {
            let row_number = idx + 1;
            match record {
                Ok(record) => {
                    self.process_row(row_number, &record_to_row(&headers, &record), &mut outcome)
                }
                Err(e) if matches!(e.kind(), csv::ErrorKind::Io(_)) => {
                    outcome.record_error(None, InvoiceError::Csv(e).to_string());
                    break;
                }
                Err(e) => outcome.record_error(Some(row_number), e.to_string()),
            }
        }

        outcome
    }

    /// Render a single invoice from a CSV file to an HTML preview.
    ///
    /// Uses the row matching `invoice_no`, or the first row when none is
    /// given.
    pub fn preview_csv(&self, path: &Path, invoice_no: Option<&str>) -> Result<PathBuf> {
        if !path.exists() {
            return Err(InvoiceError::InputNotFound(path.to_path_buf()));
        }

        let mut reader = csv_reader(path)?;
        let headers = reader.headers()?.clone();

        for record in reader.records() {
            let row = record_to_row(&headers, &record?);
            let matches = match invoice_no {
                Some(wanted) => row.get("invoice_no").map(|v| v.trim()) == Some(wanted),
                None => true,
            };
            if matches {
                let invoice = parse_row(&row)?;
                let html = self.render(&invoice);
                return self.save_html_preview(&html, &invoice);
            }
        }

        match invoice_no {
            Some(wanted) => Err(InvoiceError::InvoiceNotInInput(wanted.to_string())),
            None => Err(InvoiceError::EmptyInput),
        }
    }
}
