mod template;

pub use template::{load_template, DEFAULT_TEMPLATE};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::invoice::{Invoice, InvoiceStatus, LineItem, DATE_FORMAT};

/// Token replaced by the status color in the template
pub const STATUS_COLOR_TOKEN: &str = "__status_color__";

/// Placeholder for the generated line-item table rows
pub const ITEMS_TOKEN: &str = "{items_rows}";

const DRAFT_COLOR: &str = "#64748b";

/// Color used to highlight an invoice status
pub fn status_color(status: &InvoiceStatus) -> &'static str {
    match status {
        InvoiceStatus::Paid => "#10b981",
        InvoiceStatus::Pending => "#f59e0b",
        InvoiceStatus::Overdue => "#ef4444",
        InvoiceStatus::Draft | InvoiceStatus::Other(_) => DRAFT_COLOR,
    }
}

/// Format an amount with the currency symbol and exactly two decimals
pub fn format_money(amount: Decimal, currency_symbol: &str) -> String {
    format!("{}{:.2}", currency_symbol, amount.round_dp(2))
}

/// Escape text for inclusion in HTML content or attribute values
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Replace every placeholder occurrence in a single left-to-right pass.
///
/// Substituted values are never scanned again, and text that matches no
/// placeholder is copied through unchanged.
pub fn substitute(template: &str, replacements: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    loop {
        let next = replacements
            .iter()
            .filter_map(|(token, value)| rest.find(token).map(|pos| (pos, *token, value)))
            .min_by_key(|(pos, _, _)| *pos);

        match next {
            Some((pos, token, value)) => {
                out.push_str(&rest[..pos]);
                out.push_str(value);
                rest = &rest[pos + token.len()..];
            }
            None => {
                out.push_str(rest);
                return out;
            }
        }
    }
}

/// Values that stay fixed for every invoice rendered in one run
#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub currency_symbol: String,
    pub grace_days: u32,
    /// Date shown as the generation date on every invoice
    pub generated_on: NaiveDate,
}

/// Fills invoice templates with invoice data
#[derive(Debug, Clone)]
pub struct Renderer {
    settings: RenderSettings,
}

impl Renderer {
    pub fn new(settings: RenderSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    fn money(&self, amount: Decimal) -> String {
        escape_html(&format_money(amount, &self.settings.currency_symbol))
    }

    /// Table rows for the line items, in input order
    pub fn items_html(&self, items: &[LineItem]) -> String {
        items
            .iter()
            .map(|item| {
                format!(
                    r#"
                        <tr>
                            <td class="product-name">{}</td>
                            <td class="text-center">{}</td>
                            <td class="text-right font-mono">{}</td>
                            <td class="text-right font-mono">{}</td>
                        </tr>"#,
                    escape_html(&item.product),
                    item.quantity,
                    self.money(item.unit_price),
                    self.money(item.line_total()),
                )
            })
            .collect()
    }

    /// Render an invoice into the template
    pub fn render(&self, template: &str, invoice: &Invoice) -> String {
        let replacements: [(&str, String); 14] = [
            ("{invoice_no}", escape_html(&invoice.invoice_no)),
            (
                "{generated_date}",
                self.settings.generated_on.format(DATE_FORMAT).to_string(),
            ),
            ("{date}", escape_html(&invoice.issue_date)),
            (
                "{due_date}",
                escape_html(&invoice.due_date(self.settings.grace_days)),
            ),
            ("{bill_to}", escape_html(&invoice.bill_to)),
            ("{contact_no}", escape_html(&invoice.contact_no)),
            ("{billing_address}", escape_html(&invoice.billing_address)),
            (ITEMS_TOKEN, self.items_html(&invoice.items)),
            ("{subtotal}", self.money(invoice.subtotal())),
            ("{tax_amount}", self.money(invoice.tax_amount())),
            ("{total_bill}", self.money(invoice.total_amount())),
            ("{payment_method}", escape_html(&invoice.payment_method)),
            ("{status}", escape_html(invoice.status.as_str())),
            (STATUS_COLOR_TOKEN, status_color(&invoice.status).to_string()),
        ];

        substitute(template, &replacements)
    }
}
