use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tempfile::TempDir;

use invoice_forge::config::GeneratorConfig;
use invoice_forge::error::{InvoiceError, Result};
use invoice_forge::invoice::Row;
use invoice_forge::pdf::{PdfCapability, PdfRenderer};
use invoice_forge::pipeline::{write_report, Generator};

const TEMPLATE: &str = "<h1>{invoice_no}</h1><p>{bill_to}</p><table>{items_rows}</table><b>{total_bill}</b><i>{due_date}</i>";

const HEADER: &str =
    "invoice_no,date,bill_to,contact_no,billing_address,product,quantity,price,payment_method,status";

/// Writes the HTML it receives as the "PDF" so tests can inspect it
struct FakeRenderer {
    calls: RefCell<Vec<PathBuf>>,
}

impl PdfRenderer for FakeRenderer {
    fn render(&self, html: &str, output_path: &Path) -> Result<()> {
        self.calls.borrow_mut().push(output_path.to_path_buf());
        fs::write(output_path, html)?;
        Ok(())
    }
}

/// Fails for invoices whose output name contains "FAIL"
struct FlakyRenderer;

impl PdfRenderer for FlakyRenderer {
    fn render(&self, html: &str, output_path: &Path) -> Result<()> {
        if output_path.to_string_lossy().contains("FAIL") {
            return Err(InvoiceError::PdfGeneration("renderer crashed".to_string()));
        }
        fs::write(output_path, html)?;
        Ok(())
    }
}

fn setup(dir: &TempDir) -> GeneratorConfig {
    let template_path = dir.path().join("template.html");
    fs::write(&template_path, TEMPLATE).unwrap();
    GeneratorConfig {
        template_path,
        output_dir: dir.path().join("out"),
        grace_days: 30,
        currency_symbol: "$".to_string(),
    }
}

fn generator(dir: &TempDir, pdf: PdfCapability) -> Generator {
    Generator::new(setup(dir), pdf)
        .unwrap()
        .with_generated_on(NaiveDate::from_ymd_opt(2025, 2, 1).unwrap())
}

fn row(invoice_no: &str, price: &str) -> Row {
    [
        ("invoice_no", invoice_no),
        ("date", "2025-01-15"),
        ("bill_to", "John Smith"),
        ("contact_no", "+1-555-0123"),
        ("billing_address", "123 Main St, New York, NY 10001"),
        ("product", "Web Development|Hosting"),
        ("quantity", "1|12"),
        ("price", price),
        ("payment_method", "Credit Card"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

#[test]
fn test_batch_end_to_end() {
    let dir = TempDir::new().unwrap();
    let gen = generator(&dir, PdfCapability::Unavailable);

    let outcome = gen.process_batch(vec![row("INV-001", "1500.00|25.00")]);

    assert_eq!(outcome.total_processed, 1);
    assert!(outcome.errors.is_empty());
    assert_eq!(outcome.total_amount, dec("1800.00"));

    let preview = &outcome.generated_previews[0];
    assert_eq!(preview, &dir.path().join("out").join("preview_INV-001.html"));

    let html = fs::read_to_string(preview).unwrap();
    assert!(html.starts_with("<h1>INV-001</h1><p>John Smith</p>"));
    assert_eq!(html.matches("<tr>").count(), 2);
    assert!(html.find("Web Development").unwrap() < html.find("Hosting").unwrap());
    assert!(html.contains("$1500.00"));
    assert!(html.contains("$300.00"));
    assert!(html.contains("<b>$1800.00</b>"));
    assert!(html.contains("<i>2025-02-14</i>"));
}

#[test]
fn test_malformed_row_does_not_stop_the_batch() {
    let dir = TempDir::new().unwrap();
    let gen = generator(&dir, PdfCapability::Unavailable);

    let outcome = gen.process_batch(vec![
        row("INV-001", "10.00|1.00"),
        row("INV-002", "10.00|abc"),
        row("INV-003", "20.00|2.00"),
    ]);

    assert_eq!(outcome.total_processed, 2);
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].row_number, Some(2));
    assert!(outcome.errors[0].message.contains("abc"));
    assert_eq!(outcome.generated_previews.len(), 2);
    assert!(!dir.path().join("out/preview_INV-002.html").exists());
    assert_eq!(outcome.total_amount, dec("66.00"));
}

fn single_item_row(invoice_no: &str, quantity: &str, price: &str) -> Row {
    let mut r = row(invoice_no, price);
    r.insert("product".to_string(), "Bulk".to_string());
    r.insert("quantity".to_string(), quantity.to_string());
    r
}

#[test]
fn test_oversized_amounts_do_not_stop_the_batch() {
    let dir = TempDir::new().unwrap();
    let gen = generator(&dir, PdfCapability::Unavailable);

    let outcome = gen.process_batch(vec![
        row("OK-1", "10.00|1.00"),
        single_item_row("BIG-2", "1000000000", "100000000000000000000"),
        row("OK-3", "20.00|2.00"),
    ]);

    assert_eq!(outcome.total_processed, 2);
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].row_number, Some(2));
    assert!(outcome.errors[0].message.contains("too large"));
    assert!(dir.path().join("out/preview_OK-3.html").exists());
    assert_eq!(outcome.total_amount, dec("66.00"));
}

#[test]
fn test_batch_total_overflow_is_a_row_error() {
    let dir = TempDir::new().unwrap();
    let gen = generator(&dir, PdfCapability::Unavailable);
    let half_max = "50000000000000000000000000000";

    let outcome = gen.process_batch(vec![
        single_item_row("A-1", "1", half_max),
        single_item_row("A-2", "1", half_max),
        row("A-3", "1.00|1.00"),
    ]);

    assert_eq!(outcome.total_processed, 2);
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].row_number, Some(2));
    assert!(!dir.path().join("out/preview_A-2.html").exists());
    assert_eq!(outcome.total_amount, dec(half_max) + dec("13.00"));
}

#[test]
fn test_unwritable_preview_is_a_row_error() {
    let dir = TempDir::new().unwrap();
    let gen = generator(&dir, PdfCapability::Unavailable);
    fs::create_dir_all(dir.path().join("out/preview_BLOCKED-2.html")).unwrap();

    let outcome = gen.process_batch(vec![
        row("OK-1", "10.00|1.00"),
        row("BLOCKED-2", "10.00|1.00"),
        row("OK-3", "20.00|2.00"),
    ]);

    assert_eq!(outcome.total_processed, 2);
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].row_number, Some(2));
    assert_eq!(outcome.generated_previews.len(), 2);
    assert!(dir.path().join("out/preview_OK-3.html").exists());
    assert_eq!(outcome.total_amount, dec("66.00"));
}

#[test]
fn test_without_pdf_only_previews_are_generated() {
    let dir = TempDir::new().unwrap();
    let gen = generator(&dir, PdfCapability::Unavailable);

    let outcome = gen.process_batch(vec![row("A-1", "1|1"), row("A-2", "2|2")]);

    assert!(!gen.pdf_available());
    assert_eq!(outcome.generated_previews.len(), outcome.total_processed);
    assert!(outcome.generated_pdfs.is_empty());
    assert!(outcome.errors.is_empty());
}

#[test]
fn test_pdfs_are_rendered_when_available() {
    let dir = TempDir::new().unwrap();
    let renderer = FakeRenderer {
        calls: RefCell::new(Vec::new()),
    };
    let gen = generator(&dir, PdfCapability::Available(Box::new(renderer)));

    let outcome = gen.process_batch(vec![row("INV/2025/7", "1|1")]);

    assert_eq!(outcome.generated_pdfs.len(), 1);
    let pdf = &outcome.generated_pdfs[0];
    assert_eq!(pdf, &dir.path().join("out").join("invoice_INV_2025_7.pdf"));
    let preview_html = fs::read_to_string(&outcome.generated_previews[0]).unwrap();
    assert_eq!(fs::read_to_string(pdf).unwrap(), preview_html);
}

#[test]
fn test_pdf_failure_is_not_a_row_error() {
    let dir = TempDir::new().unwrap();
    let gen = generator(&dir, PdfCapability::Available(Box::new(FlakyRenderer)));

    let outcome = gen.process_batch(vec![row("OK-1", "1|1"), row("FAIL-2", "1|1")]);

    assert_eq!(outcome.total_processed, 2);
    assert_eq!(outcome.generated_previews.len(), 2);
    assert_eq!(outcome.generated_pdfs.len(), 1);
    assert!(outcome.errors.is_empty());
}

#[test]
fn test_duplicate_invoice_numbers_overwrite() {
    let dir = TempDir::new().unwrap();
    let gen = generator(&dir, PdfCapability::Unavailable);

    let mut second = row("DUP", "1|1");
    second.insert("bill_to".to_string(), "Second Writer".to_string());
    let outcome = gen.process_batch(vec![row("DUP", "1|1"), second]);

    assert_eq!(outcome.total_processed, 2);
    let html = fs::read_to_string(dir.path().join("out/preview_DUP.html")).unwrap();
    assert!(html.contains("Second Writer"));
}

#[test]
fn test_process_csv_reads_quoted_fields() {
    let dir = TempDir::new().unwrap();
    let gen = generator(&dir, PdfCapability::Unavailable);
    let csv = dir.path().join("invoices.csv");
    fs::write(
        &csv,
        format!(
            "{HEADER}\n\
             INV-001,2025-01-15,John Smith,+1-555-0123,\"123 Main St, New York\",Web Development|Hosting,1|12,1500.00|25.00,Credit Card,Paid\n\
             INV-002,2025-01-16,Sarah,+1-555-0456,\"456 Oak Ave, LA\",Logo,1,oops,PayPal,\n\
             INV-003,2025-01-17,Ana,+1-555-0789,\"789 Pine Rd\",Cards,500,2.50,Cash,Overdue\n"
        ),
    )
    .unwrap();

    let outcome = gen.process_csv(&csv);

    assert_eq!(outcome.total_processed, 2);
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].row_number, Some(2));
    assert_eq!(outcome.total_amount, dec("3050.00"));
}

#[test]
fn test_process_csv_missing_file_reports_single_error() {
    let dir = TempDir::new().unwrap();
    let gen = generator(&dir, PdfCapability::Unavailable);

    let outcome = gen.process_csv(&dir.path().join("missing.csv"));

    assert_eq!(outcome.total_processed, 0);
    assert!(outcome.generated_previews.is_empty());
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].row_number, None);
    assert!(outcome.errors[0].message.contains("CSV file not found"));
}

#[test]
fn test_missing_template_fails_construction() {
    let dir = TempDir::new().unwrap();
    let mut config = setup(&dir);
    config.template_path = dir.path().join("nope.html");

    let result = Generator::new(config, PdfCapability::Unavailable);

    assert!(matches!(result, Err(InvoiceError::TemplateNotFound(_))));
}

#[test]
fn test_preview_csv_selects_invoice() {
    let dir = TempDir::new().unwrap();
    let gen = generator(&dir, PdfCapability::Unavailable);
    let csv = dir.path().join("invoices.csv");
    fs::write(
        &csv,
        format!(
            "{HEADER}\n\
             INV-001,2025-01-15,John,1,Addr,A,1,1.00,Cash,\n\
             INV-002,2025-01-16,Sarah,2,Addr,B,2,2.00,Cash,\n"
        ),
    )
    .unwrap();

    let first = gen.preview_csv(&csv, None).unwrap();
    assert!(first.ends_with("preview_INV-001.html"));

    let second = gen.preview_csv(&csv, Some("INV-002")).unwrap();
    assert!(fs::read_to_string(second).unwrap().contains("Sarah"));

    assert!(matches!(
        gen.preview_csv(&csv, Some("INV-404")),
        Err(InvoiceError::InvoiceNotInInput(_))
    ));
}

#[test]
fn test_report_records_outcome_and_config() {
    let dir = TempDir::new().unwrap();
    let gen = generator(&dir, PdfCapability::Unavailable);
    let outcome = gen.process_batch(vec![row("INV-001", "1500.00|25.00"), row("", "1|1")]);

    let path = write_report(&outcome, gen.report_config(), &gen.config().output_dir).unwrap();

    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("generation_report_"));
    assert!(name.ends_with(".json"));

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["results"]["total_processed"], 1);
    assert_eq!(json["results"]["errors"][0]["row_number"], 2);
    assert_eq!(json["config"]["pdf_available"], false);
    assert!(json["timestamp"].is_string());
}
