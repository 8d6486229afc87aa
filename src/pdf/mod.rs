mod command;

pub use command::CommandRenderer;

use std::fmt;
use std::path::Path;

use crate::config::PdfSettings;
use crate::error::Result;

/// Something that can turn an HTML document into a PDF file
pub trait PdfRenderer {
    fn render(&self, html: &str, output_path: &Path) -> Result<()>;
}

/// Whether PDF output is possible for this run.
///
/// Decided once at startup; `Unavailable` means HTML previews only.
pub enum PdfCapability {
    Available(Box<dyn PdfRenderer>),
    Unavailable,
}

impl PdfCapability {
    /// Probe the configured renderer once
    pub fn detect(settings: &PdfSettings) -> Self {
        if !settings.enabled {
            return PdfCapability::Unavailable;
        }
        match CommandRenderer::probe(settings) {
            Ok(renderer) => PdfCapability::Available(Box::new(renderer)),
            Err(_) => PdfCapability::Unavailable,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, PdfCapability::Available(_))
    }

    pub fn renderer(&self) -> Option<&dyn PdfRenderer> {
        match self {
            PdfCapability::Available(renderer) => Some(renderer.as_ref()),
            PdfCapability::Unavailable => None,
        }
    }
}

impl fmt::Debug for PdfCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PdfCapability::Available(_) => f.write_str("Available"),
            PdfCapability::Unavailable => f.write_str("Unavailable"),
        }
    }
}
