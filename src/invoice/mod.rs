mod model;
mod parser;
mod validate;

pub use model::{Invoice, InvoiceStatus, LineItem, DATE_FORMAT};
pub use parser::{parse_row, Row, ITEM_SEPARATOR, REQUIRED_COLUMNS};
pub use validate::{csv_reader, record_to_row, validate_csv, ValidationIssue};
