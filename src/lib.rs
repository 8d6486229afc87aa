pub mod config;
pub mod error;
pub mod invoice;
pub mod pdf;
pub mod pipeline;
pub mod render;
pub mod setup;

pub use config::{load_config, Config, GeneratorConfig, PdfSettings};
pub use error::{InvoiceError, MalformedRowError, Result};
pub use invoice::{parse_row, validate_csv, Invoice, InvoiceStatus, LineItem, Row};
pub use pdf::{PdfCapability, PdfRenderer};
pub use pipeline::{write_report, GenerationOutcome, Generator, RowFailure};
pub use render::{Renderer, RenderSettings};
