use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Date format used for issue and due dates in the input and output
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single line on the invoice
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItem {
    pub product: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

impl LineItem {
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_price
    }
}

/// Payment status of an invoice.
///
/// Values outside the known set are kept as-is in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InvoiceStatus {
    Paid,
    #[default]
    Pending,
    Overdue,
    Draft,
    Other(String),
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &str {
        match self {
            InvoiceStatus::Paid => "Paid",
            InvoiceStatus::Pending => "Pending",
            InvoiceStatus::Overdue => "Overdue",
            InvoiceStatus::Draft => "Draft",
            InvoiceStatus::Other(s) => s,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, InvoiceStatus::Other(_))
    }
}

impl FromStr for InvoiceStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "Paid" => InvoiceStatus::Paid,
            "Pending" => InvoiceStatus::Pending,
            "Overdue" => InvoiceStatus::Overdue,
            "Draft" => InvoiceStatus::Draft,
            other => InvoiceStatus::Other(other.to_string()),
        })
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for InvoiceStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One invoice, built from a single input row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Invoice {
    pub invoice_no: String,
    /// Issue date as written in the input, normally `YYYY-MM-DD`
    pub issue_date: String,
    pub bill_to: String,
    pub contact_no: String,
    pub billing_address: String,
    pub items: Vec<LineItem>,
    pub payment_method: String,
    pub status: InvoiceStatus,
}

impl Invoice {
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Tax is not charged yet; kept separate so a rate can be added later.
    pub fn tax_amount(&self) -> Decimal {
        Decimal::ZERO
    }

    pub fn total_amount(&self) -> Decimal {
        self.subtotal() + self.tax_amount()
    }

    /// Issue date plus `grace_days`, or the issue date unchanged when it
    /// is not a valid `YYYY-MM-DD` date.
    pub fn due_date(&self, grace_days: u32) -> String {
        NaiveDate::parse_from_str(&self.issue_date, DATE_FORMAT)
            .ok()
            .and_then(|d| d.checked_add_signed(chrono::Duration::days(grace_days as i64)))
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_else(|| self.issue_date.clone())
    }

    /// File-name-safe form of the invoice number
    pub fn file_stem(&self) -> String {
        self.invoice_no.replace('/', "_")
    }
}
