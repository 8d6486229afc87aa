use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;

use super::model::{Invoice, InvoiceStatus, LineItem};
use crate::error::MalformedRowError;

/// One input record keyed by column name
pub type Row = HashMap<String, String>;

/// Separator between items inside the product, quantity and price fields
pub const ITEM_SEPARATOR: char = '|';

/// Columns every input file must have, in canonical order
pub const REQUIRED_COLUMNS: [&str; 9] = [
    "invoice_no",
    "date",
    "bill_to",
    "contact_no",
    "billing_address",
    "product",
    "quantity",
    "price",
    "payment_method",
];

const DEFAULT_QUANTITY: u32 = 1;

fn field<'a>(row: &'a Row, name: &str) -> Result<&'a str, MalformedRowError> {
    row.get(name)
        .map(String::as_str)
        .ok_or_else(|| MalformedRowError::MissingField(name.to_string()))
}

fn non_empty_field(row: &Row, name: &str) -> Result<String, MalformedRowError> {
    let value = field(row, name)?.trim();
    if value.is_empty() {
        return Err(MalformedRowError::EmptyField(name.to_string()));
    }
    Ok(value.to_string())
}

/// Parse a quantity token like "12"
pub(crate) fn parse_quantity(token: &str) -> Result<u32, String> {
    token
        .trim()
        .parse::<u32>()
        .map_err(|_| "must be a non-negative whole number".to_string())
}

/// Parse a price token like "1500.00" (always '.' as decimal point)
pub(crate) fn parse_price(token: &str) -> Result<Decimal, String> {
    let price = Decimal::from_str(token.trim()).map_err(|_| "must be a number".to_string())?;
    if price.is_sign_negative() && !price.is_zero() {
        return Err("must not be negative".to_string());
    }
    Ok(price)
}

/// Zip the pipe-separated product, quantity and price fields into line items.
///
/// The product list decides how many items there are. Missing quantities
/// default to 1 and missing prices to 0; extra quantity or price tokens are
/// ignored.
fn parse_items(
    products: &str,
    quantities: &str,
    prices: &str,
) -> Result<Vec<LineItem>, MalformedRowError> {
    let quantities: Vec<&str> = quantities.split(ITEM_SEPARATOR).collect();
    let prices: Vec<&str> = prices.split(ITEM_SEPARATOR).collect();

    products
        .split(ITEM_SEPARATOR)
        .enumerate()
        .map(|(i, product)| -> Result<LineItem, MalformedRowError> {
            let product = product.trim().to_string();

            let quantity = match quantities.get(i) {
                Some(token) => parse_quantity(token).map_err(|reason| {
                    MalformedRowError::InvalidQuantity {
                        product: product.clone(),
                        token: token.trim().to_string(),
                        reason,
                    }
                })?,
                None => DEFAULT_QUANTITY,
            };

            let unit_price = match prices.get(i) {
                Some(token) => parse_price(token).map_err(|reason| {
                    MalformedRowError::InvalidPrice {
                        product: product.clone(),
                        token: token.trim().to_string(),
                        reason,
                    }
                })?,
                None => Decimal::ZERO,
            };

            Ok(LineItem {
                product,
                quantity,
                unit_price,
            })
        })
        .collect()
}

/// Every line total and the running subtotal must fit in a `Decimal`, so
/// the arithmetic on a built `Invoice` cannot overflow.
fn check_amounts(items: &[LineItem]) -> Result<Decimal, MalformedRowError> {
    items.iter().try_fold(Decimal::ZERO, |subtotal, item| {
        let line_total = Decimal::from(item.quantity)
            .checked_mul(item.unit_price)
            .ok_or_else(|| MalformedRowError::AmountOverflow(item.product.clone()))?;
        subtotal
            .checked_add(line_total)
            .ok_or_else(|| MalformedRowError::AmountOverflow("subtotal".to_string()))
    })
}

/// Convert one input row into an invoice
pub fn parse_row(row: &Row) -> Result<Invoice, MalformedRowError> {
    for column in REQUIRED_COLUMNS {
        field(row, column)?;
    }

    let invoice_no = non_empty_field(row, "invoice_no")?;
    let bill_to = non_empty_field(row, "bill_to")?;

    let items = parse_items(
        field(row, "product")?,
        field(row, "quantity")?,
        field(row, "price")?,
    )?;
    check_amounts(&items)?;

    let status = match row.get("status").map(|s| s.trim()) {
        Some(s) if !s.is_empty() => s.parse::<InvoiceStatus>().unwrap_or_default(),
        _ => InvoiceStatus::Pending,
    };

    Ok(Invoice {
        invoice_no,
        issue_date: field(row, "date")?.trim().to_string(),
        bill_to,
        contact_no: field(row, "contact_no")?.to_string(),
        billing_address: field(row, "billing_address")?.to_string(),
        items,
        payment_method: field(row, "payment_method")?.to_string(),
        status,
    })
}
