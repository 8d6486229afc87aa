use std::io::Write;
use std::path::Path;
use std::process::Command;
use tempfile::NamedTempFile;

use super::PdfRenderer;
use crate::config::PdfSettings;
use crate::error::{InvoiceError, Result};

/// Argument placeholders substituted with the HTML input and PDF output paths
const INPUT_ARG: &str = "{input}";
const OUTPUT_ARG: &str = "{output}";

/// Renders PDFs by running an external HTML to PDF program
/// (wkhtmltopdf by default) on a temporary HTML file.
#[derive(Debug, Clone)]
pub struct CommandRenderer {
    program: String,
    args: Vec<String>,
}

impl CommandRenderer {
    /// Check that the program runs, then build a renderer for it
    pub fn probe(settings: &PdfSettings) -> Result<Self> {
        Command::new(&settings.command)
            .arg("--version")
            .output()
            .map_err(|_| InvoiceError::RendererNotFound(settings.command.clone()))?;

        Ok(Self {
            program: settings.command.clone(),
            args: settings.args.clone(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn expand_args(&self, input: &Path, output: &Path) -> Vec<String> {
        let input = input.to_string_lossy();
        let output = output.to_string_lossy();
        self.args
            .iter()
            .map(|arg| arg.replace(INPUT_ARG, &input).replace(OUTPUT_ARG, &output))
            .collect()
    }
}

/// Write the HTML to a uniquely named temporary file, removed on drop
fn write_input(html: &str) -> Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("invoice-forge-")
        .suffix(".html")
        .tempfile()?;
    file.write_all(html.as_bytes())?;
    file.flush()?;
    Ok(file)
}

impl PdfRenderer for CommandRenderer {
    fn render(&self, html: &str, output_path: &Path) -> Result<()> {
        let input = write_input(html)?;

        let output = Command::new(&self.program)
            .args(self.expand_args(input.path(), output_path))
            .output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(InvoiceError::PdfGeneration(stderr.trim().to_string()));
        }

        Ok(())
    }
}
