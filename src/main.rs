use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tabled::{builder::Builder, settings::Style, Table, Tabled};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use invoice_forge::config::{load_config, Config, GeneratorConfig};
use invoice_forge::error::{InvoiceError, Result};
use invoice_forge::invoice::{csv_reader, validate_csv, ValidationIssue};
use invoice_forge::pdf::PdfCapability;
use invoice_forge::pipeline::{write_report, GenerationOutcome, Generator};
use invoice_forge::render::format_money;
use invoice_forge::setup::{run_setup, FileStatus};

const DEFAULT_CSV: &str = "invoices_data.csv";

/// Rows shown by `validate` as a preview of the data
const PREVIEW_ROWS: usize = 3;
const PREVIEW_CELL_WIDTH: usize = 50;

#[derive(Parser)]
#[command(name = "invoice-forge")]
#[command(version, about = "Batch HTML and PDF invoice generation from CSV data", long_about = None)]
struct Cli {
    /// Path to config file (default: ./invoice-forge.toml or the user config dir)
    #[arg(short = 'C', long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate invoices from CSV data
    Generate {
        /// CSV file path
        #[arg(short, long, default_value = DEFAULT_CSV)]
        csv: PathBuf,

        /// Template file path (default: from config)
        #[arg(short, long)]
        template: Option<PathBuf>,

        /// Output directory (default: from config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Generate HTML previews only
        #[arg(long)]
        preview_only: bool,

        /// Do not write a generation report
        #[arg(long)]
        no_report: bool,
    },

    /// Validate CSV file structure
    Validate {
        /// CSV file path
        #[arg(short, long, default_value = DEFAULT_CSV)]
        csv: PathBuf,
    },

    /// Generate an HTML preview of one invoice
    Preview {
        /// CSV file path
        #[arg(short, long, default_value = DEFAULT_CSV)]
        csv: PathBuf,

        /// Template file path (default: from config)
        #[arg(short, long)]
        template: Option<PathBuf>,

        /// Output directory (default: from config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Specific invoice number to preview (default: first row)
        #[arg(short, long)]
        invoice: Option<String>,
    },

    /// Check the environment and create sample files
    Setup {
        /// Directory to check (default: current directory)
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// Write missing sample CSV, template and config files
        #[arg(long)]
        create: bool,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Generate {
            csv,
            template,
            output,
            preview_only,
            no_report,
        } => cmd_generate(&config, &csv, template, output, preview_only, no_report),
        Commands::Validate { csv } => cmd_validate(&csv),
        Commands::Preview {
            csv,
            template,
            output,
            invoice,
        } => cmd_preview(&config, &csv, template, output, invoice.as_deref()),
        Commands::Setup { dir, create } => cmd_setup(&config, &dir, create),
    }
}

/// Generator settings from config, with command-line overrides applied
fn generator_config(
    config: &Config,
    template: Option<PathBuf>,
    output: Option<PathBuf>,
) -> GeneratorConfig {
    let mut resolved = GeneratorConfig::from(&config.generator);
    if let Some(template) = template {
        resolved.template_path = template;
    }
    if let Some(output) = output {
        resolved.output_dir = output;
    }
    resolved
}

fn print_issues<'a>(issues: impl IntoIterator<Item = &'a ValidationIssue>) {
    for issue in issues {
        println!("   • {issue}");
    }
}

#[derive(Tabled)]
struct MetricRow {
    #[tabled(rename = "METRIC")]
    metric: &'static str,
    #[tabled(rename = "VALUE")]
    value: String,
}

fn print_results(outcome: &GenerationOutcome, currency_symbol: &str) {
    let rows = vec![
        MetricRow {
            metric: "Total Processed",
            value: outcome.total_processed.to_string(),
        },
        MetricRow {
            metric: "PDFs Generated",
            value: outcome.generated_pdfs.len().to_string(),
        },
        MetricRow {
            metric: "HTML Previews",
            value: outcome.generated_previews.len().to_string(),
        },
        MetricRow {
            metric: "Errors",
            value: outcome.errors.len().to_string(),
        },
        MetricRow {
            metric: "Total Amount",
            value: format_money(outcome.total_amount, currency_symbol),
        },
    ];

    println!("Generation Results");
    println!("{}", Table::new(rows).with(Style::rounded()));

    if outcome.has_errors() {
        println!();
        println!("Errors encountered:");
        for error in &outcome.errors {
            println!("   • {error}");
        }
    }
}

/// Generate invoices for every row of a CSV file
fn cmd_generate(
    config: &Config,
    csv: &Path,
    template: Option<PathBuf>,
    output: Option<PathBuf>,
    preview_only: bool,
    no_report: bool,
) -> Result<()> {
    let gen_config = generator_config(config, template, output);

    // Problems with the file as a whole stop the run; bad rows are
    // reported and skipped during processing.
    let (blocking, row_issues): (Vec<_>, Vec<_>) =
        validate_csv(csv).into_iter().partition(|i| i.row.is_none());
    let mut blocking: Vec<String> = blocking.iter().map(ToString::to_string).collect();
    if !gen_config.template_path.exists() {
        blocking.push(format!(
            "Template file not found: {}",
            gen_config.template_path.display()
        ));
    }
    if !blocking.is_empty() {
        println!("Setup validation failed:");
        for issue in &blocking {
            println!("   • {issue}");
        }
        return Err(InvoiceError::ValidationFailed(blocking.len()));
    }
    if !row_issues.is_empty() {
        println!("Rows with problems will be skipped:");
        print_issues(&row_issues);
    }

    println!("CSV file:         {}", csv.display());
    println!("Template:         {}", gen_config.template_path.display());
    println!("Output directory: {}", gen_config.output_dir.display());

    let pdf = if preview_only {
        println!("Preview mode: only HTML files will be generated");
        PdfCapability::Unavailable
    } else {
        PdfCapability::detect(&config.pdf)
    };
    if !preview_only && !pdf.is_available() {
        println!(
            "PDF renderer '{}' not available - HTML previews only",
            config.pdf.command
        );
    }

    let currency_symbol = gen_config.currency_symbol.clone();
    let output_dir = gen_config.output_dir.clone();
    let generator = Generator::new(gen_config, pdf)?;

    let outcome = generator.process_csv(csv);
    for event in &outcome.events {
        event.emit();
    }

    println!();
    print_results(&outcome, &currency_symbol);

    if !no_report {
        let report_path = write_report(&outcome, generator.report_config(), &output_dir)?;
        println!();
        println!(
            "Summary report saved: {}",
            report_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        );
    }

    if !outcome.generated_previews.is_empty() || !outcome.generated_pdfs.is_empty() {
        println!("Files saved in: {}/", output_dir.display());
    }

    Ok(())
}

fn truncate_cell(value: &str) -> String {
    if value.chars().count() > PREVIEW_CELL_WIDTH {
        let head: String = value.chars().take(PREVIEW_CELL_WIDTH).collect();
        format!("{head}...")
    } else {
        value.to_string()
    }
}

/// Validate a CSV file and show a preview of its first rows
fn cmd_validate(csv: &Path) -> Result<()> {
    println!("Validating CSV file: {}", csv.display());

    let issues = validate_csv(csv);
    if !issues.is_empty() {
        println!("CSV validation failed:");
        print_issues(&issues);
        return Err(InvoiceError::ValidationFailed(issues.len()));
    }

    println!("CSV file is valid!");

    let mut reader = csv_reader(csv)?;
    let headers = reader.headers()?.clone();
    let records = reader.records().collect::<std::result::Result<Vec<_>, _>>()?;

    if records.is_empty() {
        println!("Total rows: 0");
        return Ok(());
    }

    let mut builder = Builder::default();
    builder.push_record(headers.iter().map(str::to_string));
    for record in records.iter().take(PREVIEW_ROWS) {
        builder.push_record(record.iter().map(truncate_cell));
    }
    println!("{}", builder.build().with(Style::rounded()));

    if records.len() > PREVIEW_ROWS {
        println!("... and {} more rows", records.len() - PREVIEW_ROWS);
    }
    println!("Total rows: {}", records.len());

    Ok(())
}

/// Render a single invoice to an HTML preview
fn cmd_preview(
    config: &Config,
    csv: &Path,
    template: Option<PathBuf>,
    output: Option<PathBuf>,
    invoice: Option<&str>,
) -> Result<()> {
    let gen_config = generator_config(config, template, output);
    let generator = Generator::new(gen_config, PdfCapability::Unavailable)?;

    let preview_path = generator.preview_csv(csv, invoice)?;
    let absolute = std::fs::canonicalize(&preview_path).unwrap_or_else(|_| preview_path.clone());

    println!(
        "Preview generated: {}",
        preview_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    );
    println!("Open in browser: file://{}", absolute.display());

    Ok(())
}

/// Check the environment and optionally create sample files
fn cmd_setup(config: &Config, dir: &Path, create: bool) -> Result<()> {
    println!("Setting up invoice-forge in {}", dir.display());
    println!("{}", "-".repeat(50));

    let report = run_setup(dir, &config.pdf, create)?;

    if report.pdf_available {
        println!("PDF renderer '{}' is available", report.pdf_command);
    } else {
        println!(
            "PDF renderer '{}' not found - only HTML previews will be available",
            report.pdf_command
        );
    }

    for file in &report.files {
        let state = match file.status {
            FileStatus::Found => "found",
            FileStatus::Missing => "not found",
            FileStatus::Created => "created",
        };
        println!("{:<22} {} ({})", file.description, file.path.display(), state);
    }

    let missing = report
        .files
        .iter()
        .any(|f| f.status == FileStatus::Missing);
    println!();
    if missing {
        println!("Run 'invoice-forge setup --create' to write the missing files.");
    } else {
        println!("Setup complete! You can now run: invoice-forge generate");
    }

    Ok(())
}
