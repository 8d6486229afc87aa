mod settings;

pub use settings::{Config, GeneratorConfig, GeneratorSettings, PdfSettings};

use crate::error::{InvoiceError, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the config file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "invoice-forge.toml";

/// Per-user config file (e.g. ~/.config/invoice-forge/invoice-forge.toml)
pub fn user_config_file() -> Option<PathBuf> {
    ProjectDirs::from("", "", "invoice-forge").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Expand ~ in paths
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_home() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Parse a config file
pub fn load_config_file(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Err(InvoiceError::ConfigFileNotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| InvoiceError::ConfigParse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load configuration.
///
/// An explicit path must exist. Otherwise `./invoice-forge.toml` is tried,
/// then the per-user config file, and finally the built-in defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        return load_config_file(path);
    }

    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return load_config_file(&local);
    }

    match user_config_file() {
        Some(path) if path.exists() => load_config_file(&path),
        _ => Ok(Config::default()),
    }
}

/// Template content for invoice-forge.toml
pub const CONFIG_TEMPLATE: &str = r#"[generator]
template = "invoice_template.html"
output_dir = "generated_invoices"
currency_symbol = "$"
grace_days = 30          # due date = issue date + grace_days

[pdf]
enabled = true
command = "wkhtmltopdf"  # any HTML to PDF program
args = ["--quiet", "{input}", "{output}"]
"#;

/// Sample invoice data written by `setup`
pub const SAMPLE_CSV: &str = r#"invoice_no,date,bill_to,contact_no,billing_address,product,quantity,price,payment_method,status
INV-001,2025-01-15,John Smith,+1-555-0123,"123 Main St, New York, NY 10001",Web Development|Hosting Services,1|12,1500.00|25.00,Credit Card,Paid
INV-002,2025-01-16,Sarah Johnson,+1-555-0456,"456 Oak Ave, Los Angeles, CA 90210",Logo Design|Business Cards,1|500,800.00|2.50,PayPal,Pending
"#;
