use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::expand_path;

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub generator: GeneratorSettings,
    #[serde(default)]
    pub pdf: PdfSettings,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct GeneratorSettings {
    pub template: String,
    pub output_dir: String,
    pub currency_symbol: String,
    pub grace_days: u32,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            template: "invoice_template.html".to_string(),
            output_dir: "generated_invoices".to_string(),
            currency_symbol: "$".to_string(),
            grace_days: 30,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct PdfSettings {
    pub enabled: bool,
    pub command: String,
    /// Arguments passed to `command`; `{input}` and `{output}` are replaced
    /// with the HTML and PDF paths
    pub args: Vec<String>,
}

impl Default for PdfSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            command: "wkhtmltopdf".to_string(),
            args: vec![
                "--quiet".to_string(),
                "{input}".to_string(),
                "{output}".to_string(),
            ],
        }
    }
}

/// Everything the batch generator needs, resolved from config and flags
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    pub template_path: PathBuf,
    pub output_dir: PathBuf,
    pub grace_days: u32,
    pub currency_symbol: String,
}

impl From<&GeneratorSettings> for GeneratorConfig {
    fn from(settings: &GeneratorSettings) -> Self {
        Self {
            template_path: expand_path(&settings.template),
            output_dir: expand_path(&settings.output_dir),
            grace_days: settings.grace_days,
            currency_symbol: settings.currency_symbol.clone(),
        }
    }
}
