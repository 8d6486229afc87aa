use std::fs;
use std::path::Path;

use crate::error::{InvoiceError, Result};

/// Read a template file from disk
pub fn load_template(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(InvoiceError::TemplateNotFound(path.to_path_buf()));
    }
    Ok(fs::read_to_string(path)?)
}

/// Built-in invoice template, written out by `setup`
pub const DEFAULT_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Invoice {invoice_no}</title>
    <style>
        * { box-sizing: border-box; margin: 0; padding: 0; }
        body {
            font-family: "Helvetica Neue", Helvetica, Arial, sans-serif;
            color: #1e293b;
            background: #f8fafc;
            font-size: 14px;
        }
        .invoice { max-width: 820px; margin: 32px auto; background: #ffffff; padding: 48px; border-radius: 12px; }
        .header { display: flex; justify-content: space-between; align-items: flex-start; margin-bottom: 40px; }
        .title { font-size: 32px; font-weight: 700; letter-spacing: 2px; }
        .meta td { padding: 2px 0 2px 16px; text-align: right; }
        .meta td.label { color: #64748b; }
        .status {
            display: inline-block;
            margin-top: 12px;
            padding: 4px 12px;
            border-radius: 999px;
            color: #ffffff;
            background: __status_color__;
            font-weight: 600;
            font-size: 12px;
            text-transform: uppercase;
        }
        .bill-to { margin-bottom: 32px; }
        .bill-to h3 { font-size: 12px; color: #64748b; text-transform: uppercase; margin-bottom: 8px; }
        .bill-to .name { font-size: 18px; font-weight: 600; }
        table.items { width: 100%; border-collapse: collapse; margin-bottom: 24px; }
        table.items th { text-align: left; background: #f1f5f9; padding: 10px; font-size: 12px; text-transform: uppercase; }
        table.items td { padding: 10px; border-bottom: 1px solid #e2e8f0; }
        .text-center { text-align: center; }
        .text-right { text-align: right; }
        .font-mono { font-family: "SFMono-Regular", Menlo, Consolas, monospace; }
        .totals { margin-left: auto; width: 300px; }
        .totals td { padding: 6px 0; }
        .totals tr.grand td { border-top: 2px solid #1e293b; font-size: 18px; font-weight: 700; padding-top: 10px; }
        .footer { margin-top: 48px; color: #64748b; font-size: 12px; display: flex; justify-content: space-between; }
        @media print {
            body { background: #ffffff; }
            .invoice { margin: 0; border-radius: 0; }
        }
    </style>
</head>
<body>
    <div class="invoice">
        <div class="header">
            <div>
                <div class="title">INVOICE</div>
                <span class="status">{status}</span>
            </div>
            <table class="meta">
                <tr><td class="label">Invoice #</td><td>{invoice_no}</td></tr>
                <tr><td class="label">Issue Date</td><td>{date}</td></tr>
                <tr><td class="label">Due Date</td><td>{due_date}</td></tr>
            </table>
        </div>

        <div class="bill-to">
            <h3>Bill To</h3>
            <div class="name">{bill_to}</div>
            <div>{billing_address}</div>
            <div>{contact_no}</div>
        </div>

        <table class="items">
            <thead>
                <tr>
                    <th>Product</th>
                    <th class="text-center">Qty</th>
                    <th class="text-right">Unit Price</th>
                    <th class="text-right">Total</th>
                </tr>
            </thead>
            <tbody>{items_rows}
            </tbody>
        </table>

        <table class="totals">
            <tr><td>Subtotal</td><td class="text-right font-mono">{subtotal}</td></tr>
            <tr><td>Tax</td><td class="text-right font-mono">{tax_amount}</td></tr>
            <tr class="grand"><td>Total</td><td class="text-right font-mono">{total_bill}</td></tr>
        </table>

        <div class="footer">
            <div>Payment method: {payment_method}</div>
            <div>Generated {generated_date}</div>
        </div>
    </div>
</body>
</html>
"##;
