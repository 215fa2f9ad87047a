//! Server-rendered HTML output
//!
//! Markup is assembled by hand with inline styles so the document renders
//! the same in browsers and email clients; every dynamic value is escaped.

use crate::money::{format_amount, format_currency, round_display};
use crate::render::{
    amount_words_block, displayed_tax_rate, DocumentFormat, RenderContext, RenderedDocument,
    ReportTable, SheetCell,
};
use crate::traits::DocumentRenderer;
use crate::types::{DocumentKind, DocumentResult};

/// Renders documents as standalone HTML pages
pub struct HtmlRenderer;

impl DocumentRenderer for HtmlRenderer {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Html
    }

    fn render(&self, ctx: &RenderContext<'_>) -> DocumentResult<RenderedDocument> {
        let html = render_html(ctx)?;
        Ok(RenderedDocument::new(
            html.into_bytes(),
            DocumentFormat::Html,
        ))
    }
}

/// Escape text for safe interpolation into markup
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const BODY_STYLE: &str = "margin:0;padding:24px;background-color:#f8fafc;font-family:Arial,Helvetica,sans-serif;color:#111827;";
const CARD_STYLE: &str = "max-width:760px;margin:0 auto;background-color:#ffffff;border:1px solid #e5e7eb;border-radius:8px;padding:32px;";
const TH_STYLE: &str = "text-align:left;padding:8px 10px;border-bottom:2px solid #e5e7eb;font-size:12px;text-transform:uppercase;letter-spacing:0.03em;color:#4b5563;";
const TD_STYLE: &str = "padding:8px 10px;font-size:14px;vertical-align:top;";
const NUM_STYLE: &str = "text-align:right;white-space:nowrap;";
// Alternating shade applied to odd rows only; purely presentational
const STRIPE_COLOR: &str = "#f3f4f6";

fn render_html(ctx: &RenderContext<'_>) -> DocumentResult<String> {
    let currency = ctx.meta.currency.as_str();
    let money = |amount: &bigdecimal::BigDecimal| format_currency(Some(amount), currency);

    let mut html = String::new();
    html.push_str("<!DOCTYPE html><html><head><meta charset=\"utf-8\"/><title>");
    html.push_str(&escape_html(&format!(
        "{} {}",
        ctx.kind.title(),
        ctx.meta.number
    )));
    html.push_str("</title></head>");
    html.push_str(&format!("<body style=\"{BODY_STYLE}\">"));
    html.push_str(&format!("<div style=\"{CARD_STYLE}\">"));

    // Header: company identity and document title
    html.push_str("<table style=\"width:100%;border-collapse:collapse;\"><tr>");
    html.push_str("<td style=\"vertical-align:top;\">");
    html.push_str(&format!(
        "<div style=\"font-size:20px;font-weight:700;\">{}</div>",
        escape_html(&ctx.company.name)
    ));
    for line in &ctx.company.address_lines {
        html.push_str(&format!(
            "<div style=\"font-size:13px;color:#4b5563;\">{}</div>",
            escape_html(line)
        ));
    }
    if let Some(gstin) = &ctx.company.gstin {
        html.push_str(&format!(
            "<div style=\"font-size:13px;color:#4b5563;\">GSTIN: {}</div>",
            escape_html(gstin)
        ));
    }
    html.push_str("</td>");
    html.push_str("<td style=\"vertical-align:top;text-align:right;\">");
    html.push_str(&format!(
        "<div style=\"font-size:24px;font-weight:700;color:#1f2937;\">{}</div>",
        escape_html(ctx.kind.title())
    ));
    html.push_str(&format!(
        "<div style=\"font-size:14px;margin-top:4px;\">{}</div>",
        escape_html(&ctx.meta.number)
    ));
    html.push_str(&format!(
        "<div style=\"font-size:13px;color:#4b5563;\">Date: {}</div>",
        ctx.meta.issue_date
    ));
    if let Some(due_date) = ctx.meta.due_date {
        html.push_str(&format!(
            "<div style=\"font-size:13px;color:#4b5563;\">Due: {due_date}</div>"
        ));
    }
    html.push_str("</td></tr></table>");

    // Counterparty
    html.push_str("<div style=\"margin-top:24px;\">");
    html.push_str("<div style=\"font-size:12px;font-weight:700;text-transform:uppercase;letter-spacing:0.03em;color:#6b7280;\">Billed To</div>");
    html.push_str(&format!(
        "<div style=\"font-size:15px;font-weight:600;margin-top:4px;\">{}</div>",
        escape_html(&ctx.counterparty.name)
    ));
    for line in &ctx.counterparty.address_lines {
        html.push_str(&format!(
            "<div style=\"font-size:13px;color:#4b5563;\">{}</div>",
            escape_html(line)
        ));
    }
    if let Some(gstin) = &ctx.counterparty.gstin {
        html.push_str(&format!(
            "<div style=\"font-size:13px;color:#4b5563;\">GSTIN: {}</div>",
            escape_html(gstin)
        ));
    }
    html.push_str("</div>");

    // Items table
    html.push_str("<table style=\"width:100%;border-collapse:collapse;margin-top:24px;\">");
    html.push_str("<tr>");
    html.push_str(&format!("<th style=\"{TH_STYLE}\">#</th>"));
    html.push_str(&format!("<th style=\"{TH_STYLE}\">Description</th>"));
    html.push_str(&format!("<th style=\"{TH_STYLE}{NUM_STYLE}\">Qty</th>"));
    html.push_str(&format!("<th style=\"{TH_STYLE}{NUM_STYLE}\">Unit Price</th>"));
    html.push_str(&format!("<th style=\"{TH_STYLE}{NUM_STYLE}\">Amount</th>"));
    html.push_str("</tr>");

    for (index, item) in ctx.line_items.iter().enumerate() {
        let stripe = if index % 2 == 1 {
            format!("background-color:{STRIPE_COLOR};")
        } else {
            String::new()
        };
        html.push_str(&format!("<tr style=\"{stripe}\">"));
        html.push_str(&format!("<td style=\"{TD_STYLE}\">{}</td>", index + 1));
        html.push_str(&format!(
            "<td style=\"{TD_STYLE}\">{}</td>",
            escape_html(&item.description)
        ));
        html.push_str(&format!(
            "<td style=\"{TD_STYLE}{NUM_STYLE}\">{}</td>",
            format_amount(&item.quantity, currency)
        ));
        html.push_str(&format!(
            "<td style=\"{TD_STYLE}{NUM_STYLE}\">{}</td>",
            money(&item.unit_price)
        ));
        html.push_str(&format!(
            "<td style=\"{TD_STYLE}{NUM_STYLE}\">{}</td>",
            money(&item.line_total())
        ));
        html.push_str("</tr>");
    }
    html.push_str("</table>");

    // Totals
    let totals = ctx.totals;
    html.push_str("<table style=\"width:320px;margin-left:auto;margin-top:16px;border-collapse:collapse;\">");
    push_total_row(&mut html, "Subtotal", &money(&totals.subtotal), false);
    if totals.discount_amount > bigdecimal::BigDecimal::from(0) {
        push_total_row(&mut html, "Discount", &money(&totals.discount_amount), false);
    }
    push_total_row(
        &mut html,
        &format!("GST ({}%)", displayed_tax_rate(totals)),
        &money(&totals.tax_amount),
        false,
    );
    push_total_row(&mut html, "Total", &money(&totals.total_amount), true);
    html.push_str("</table>");

    // Amount in words, derived from the computed total
    if let Some(words) = amount_words_block(totals, currency)? {
        html.push_str(&format!(
            "<div style=\"margin-top:12px;font-size:13px;color:#374151;\"><strong>Amount in Words:</strong> {}</div>",
            escape_html(&words)
        ));
    }

    // Payment block
    if ctx.kind == DocumentKind::Invoice {
        let has_bank = ctx.company.bank_details.is_some();
        if has_bank || ctx.upi_qr.is_some() {
            html.push_str("<table style=\"width:100%;border-collapse:collapse;margin-top:24px;border-top:1px solid #e5e7eb;\"><tr>");
            html.push_str("<td style=\"vertical-align:top;padding-top:16px;\">");
            html.push_str("<div style=\"font-size:12px;font-weight:700;text-transform:uppercase;letter-spacing:0.03em;color:#6b7280;\">Payment Details</div>");
            if let Some(bank) = &ctx.company.bank_details {
                for (label, value) in [
                    ("Bank", &bank.bank_name),
                    ("Account Name", &bank.account_name),
                    ("Account No", &bank.account_number),
                    ("IFSC", &bank.ifsc_code),
                ] {
                    html.push_str(&format!(
                        "<div style=\"font-size:13px;margin-top:2px;\">{label}: {}</div>",
                        escape_html(value)
                    ));
                }
            }
            html.push_str("</td>");
            if let Some(qr) = ctx.upi_qr {
                html.push_str("<td style=\"vertical-align:top;text-align:right;padding-top:16px;\">");
                html.push_str(&format!(
                    "<img src=\"{}\" alt=\"UPI payment QR\" width=\"132\" height=\"132\"/>",
                    qr.data_uri()
                ));
                html.push_str("<div style=\"font-size:12px;color:#6b7280;\">Scan to pay via UPI</div>");
                html.push_str("</td>");
            }
            html.push_str("</tr></table>");
        }
    }

    // Notes and terms
    for (label, body) in [
        ("Notes", ctx.meta.notes.as_deref()),
        ("Terms & Conditions", ctx.company.terms.as_deref()),
    ] {
        if let Some(body) = body {
            html.push_str(&format!(
                "<div style=\"margin-top:16px;\"><div style=\"font-size:12px;font-weight:700;text-transform:uppercase;letter-spacing:0.03em;color:#6b7280;\">{label}</div><div style=\"font-size:13px;color:#374151;white-space:pre-wrap;\">{}</div></div>",
                escape_html(body)
            ));
        }
    }

    html.push_str("</div></body></html>");
    Ok(html)
}

fn push_total_row(html: &mut String, label: &str, value: &str, emphasized: bool) {
    let (label_style, value_style) = if emphasized {
        (
            "padding:8px 10px;font-size:15px;font-weight:700;border-top:2px solid #1f2937;",
            "padding:8px 10px;font-size:15px;font-weight:700;border-top:2px solid #1f2937;text-align:right;",
        )
    } else {
        (
            "padding:4px 10px;font-size:13px;color:#4b5563;",
            "padding:4px 10px;font-size:13px;text-align:right;",
        )
    };
    html.push_str(&format!(
        "<tr><td style=\"{label_style}\">{}</td><td style=\"{value_style}\">{}</td></tr>",
        escape_html(label),
        escape_html(value)
    ));
}

/// Render pre-grouped report rows as an HTML table
pub fn render_report_html(table: &ReportTable) -> String {
    let mut html = String::new();
    html.push_str(&format!("<body style=\"{BODY_STYLE}\">"));
    html.push_str(&format!("<div style=\"{CARD_STYLE}\">"));
    html.push_str(&format!(
        "<div style=\"font-size:18px;font-weight:700;\">{}</div>",
        escape_html(&table.title)
    ));

    html.push_str("<table style=\"width:100%;border-collapse:collapse;margin-top:16px;\"><tr>");
    for column in &table.columns {
        html.push_str(&format!("<th style=\"{TH_STYLE}\">{}</th>", escape_html(column)));
    }
    html.push_str("</tr>");

    for (index, row) in table.rows.iter().enumerate() {
        let stripe = if index % 2 == 1 {
            format!("background-color:{STRIPE_COLOR};")
        } else {
            String::new()
        };
        html.push_str(&format!("<tr style=\"{stripe}\">"));
        for cell in row {
            match cell {
                SheetCell::Text(text) => html.push_str(&format!(
                    "<td style=\"{TD_STYLE}\">{}</td>",
                    escape_html(text)
                )),
                SheetCell::Number(number) => html.push_str(&format!(
                    "<td style=\"{TD_STYLE}{NUM_STYLE}\">{}</td>",
                    round_display(number)
                )),
            }
        }
        html.push_str("</tr>");
    }
    html.push_str("</table>");

    if !table.totals.is_empty() {
        html.push_str("<table style=\"width:320px;margin-left:auto;margin-top:12px;border-collapse:collapse;\">");
        for (label, cell) in &table.totals {
            let value = match cell {
                SheetCell::Text(text) => text.clone(),
                SheetCell::Number(number) => round_display(number).to_string(),
            };
            push_total_row(&mut html, label, &value, false);
        }
        html.push_str("</table>");
    }

    html.push_str("</div></body>");
    html
}
