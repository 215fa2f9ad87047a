//! Tabular spreadsheet export
//!
//! Produces CSV with typed cells: numeric columns are written as bare
//! two-decimal numbers so spreadsheet applications apply a numeric display
//! format, while labels stay quoted text. A totals/summary block follows the
//! last data row.

use crate::money::round_display;
use crate::render::{
    amount_words_block, displayed_tax_rate, DocumentFormat, RenderContext, RenderedDocument,
    ReportTable, SheetCell,
};
use crate::traits::DocumentRenderer;
use crate::types::{DocumentError, DocumentResult};

/// Content-line budget per exported page; when a run of rows exceeds it the
/// column header row is reprinted, mirroring the paginated PDF layout
const PAGE_LINE_BUDGET: usize = 40;
/// Characters of description that fit one content line
const DESC_LINE_CHARS: usize = 60;

/// Renders documents and report tables as CSV spreadsheets
pub struct SheetRenderer;

impl DocumentRenderer for SheetRenderer {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Spreadsheet
    }

    fn render(&self, ctx: &RenderContext<'_>) -> DocumentResult<RenderedDocument> {
        let bytes = render_sheet(ctx)?;
        Ok(RenderedDocument::new(bytes, DocumentFormat::Spreadsheet))
    }
}

fn writer() -> csv::Writer<Vec<u8>> {
    // Header, meta, and summary rows have differing widths
    csv::WriterBuilder::new().flexible(true).from_writer(Vec::new())
}

fn finish(writer: csv::Writer<Vec<u8>>) -> DocumentResult<Vec<u8>> {
    writer
        .into_inner()
        .map_err(|e| DocumentError::Render(e.to_string()))
}

fn write_row(writer: &mut csv::Writer<Vec<u8>>, cells: &[SheetCell]) -> DocumentResult<()> {
    let fields: Vec<String> = cells
        .iter()
        .map(|cell| match cell {
            SheetCell::Text(text) => text.clone(),
            SheetCell::Number(number) => round_display(number).to_string(),
        })
        .collect();
    writer
        .write_record(&fields)
        .map_err(|e| DocumentError::Render(e.to_string()))
}

/// Content lines a row occupies, driven by the description length
fn row_lines(description: &str) -> usize {
    description.len().div_ceil(DESC_LINE_CHARS).max(1)
}

const ITEM_COLUMNS: [&str; 5] = ["#", "Description", "Qty", "Unit Price", "Amount"];

fn blank_row(writer: &mut csv::Writer<Vec<u8>>) -> DocumentResult<()> {
    write_row(writer, &[SheetCell::text("")])
}

fn write_item_header(writer: &mut csv::Writer<Vec<u8>>) -> DocumentResult<()> {
    let cells: Vec<SheetCell> = ITEM_COLUMNS.iter().map(SheetCell::text).collect();
    write_row(writer, &cells)
}

fn render_sheet(ctx: &RenderContext<'_>) -> DocumentResult<Vec<u8>> {
    let mut out = writer();

    // Document header block
    write_row(&mut out, &[SheetCell::text(&ctx.company.name)])?;
    write_row(
        &mut out,
        &[
            SheetCell::text(ctx.kind.title()),
            SheetCell::text(&ctx.meta.number),
        ],
    )?;
    write_row(
        &mut out,
        &[
            SheetCell::text("Date"),
            SheetCell::text(ctx.meta.issue_date),
        ],
    )?;
    if let Some(due_date) = ctx.meta.due_date {
        write_row(
            &mut out,
            &[SheetCell::text("Due Date"), SheetCell::text(due_date)],
        )?;
    }
    write_row(
        &mut out,
        &[
            SheetCell::text("Billed To"),
            SheetCell::text(&ctx.counterparty.name),
        ],
    )?;
    blank_row(&mut out)?;

    // Items with content-driven header reprints
    write_item_header(&mut out)?;
    let mut lines_used = 0usize;
    for (index, item) in ctx.line_items.iter().enumerate() {
        let lines = row_lines(&item.description);
        if lines_used > 0 && lines_used + lines > PAGE_LINE_BUDGET {
            write_item_header(&mut out)?;
            lines_used = 0;
        }
        lines_used += lines;

        write_row(
            &mut out,
            &[
                SheetCell::text(index + 1),
                SheetCell::text(&item.description),
                SheetCell::number(&item.quantity),
                SheetCell::number(&item.unit_price),
                SheetCell::number(&item.line_total()),
            ],
        )?;
    }

    // Summary block after the last data row
    let totals = ctx.totals;
    blank_row(&mut out)?;
    write_row(
        &mut out,
        &[
            SheetCell::text(""),
            SheetCell::text("Subtotal"),
            SheetCell::text(""),
            SheetCell::text(""),
            SheetCell::number(&totals.subtotal),
        ],
    )?;
    if totals.discount_amount > bigdecimal::BigDecimal::from(0) {
        write_row(
            &mut out,
            &[
                SheetCell::text(""),
                SheetCell::text("Discount"),
                SheetCell::text(""),
                SheetCell::text(""),
                SheetCell::number(&totals.discount_amount),
            ],
        )?;
    }
    write_row(
        &mut out,
        &[
            SheetCell::text(""),
            SheetCell::text(format!("GST ({}%)", displayed_tax_rate(totals))),
            SheetCell::text(""),
            SheetCell::text(""),
            SheetCell::number(&totals.tax_amount),
        ],
    )?;
    write_row(
        &mut out,
        &[
            SheetCell::text(""),
            SheetCell::text("Total"),
            SheetCell::text(""),
            SheetCell::text(""),
            SheetCell::number(&totals.total_amount),
        ],
    )?;

    if let Some(words) = amount_words_block(totals, &ctx.meta.currency)? {
        write_row(
            &mut out,
            &[SheetCell::text("Amount in Words"), SheetCell::text(words)],
        )?;
    }

    finish(out)
}

/// Render pre-grouped report rows as a CSV spreadsheet
pub fn render_report_csv(table: &ReportTable) -> DocumentResult<Vec<u8>> {
    let mut out = writer();

    write_row(&mut out, &[SheetCell::text(&table.title)])?;
    blank_row(&mut out)?;

    let header: Vec<SheetCell> = table.columns.iter().map(SheetCell::text).collect();
    write_row(&mut out, &header)?;
    for row in &table.rows {
        write_row(&mut out, row)?;
    }

    if !table.totals.is_empty() {
        blank_row(&mut out)?;
        for (label, cell) in &table.totals {
            write_row(&mut out, &[SheetCell::text(label), cell.clone()])?;
        }
    }

    finish(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::compute_totals;
    use crate::types::*;
    use bigdecimal::BigDecimal;
    use std::str::FromStr;

    fn dec(value: &str) -> BigDecimal {
        BigDecimal::from_str(value).unwrap()
    }

    fn render_csv(items: &[LineItem]) -> String {
        let meta = DocumentMeta::new(
            "INV-100".to_string(),
            chrono::NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        );
        let company = CompanyProfile {
            name: "Acme Studio".to_string(),
            address_lines: vec![],
            gstin: None,
            state: None,
            email: None,
            bank_details: None,
            upi_id: None,
            terms: None,
            logo_url: None,
        };
        let counterparty = Counterparty::named("Globex, Pvt Ltd".to_string());
        let totals = compute_totals(items, &DiscountSpec::none(), &TaxSpec::rate(dec("18"))).unwrap();
        let rate = dec("18");

        let ctx = RenderContext {
            kind: DocumentKind::Invoice,
            meta: &meta,
            company: &company,
            counterparty: &counterparty,
            line_items: items,
            totals: &totals,
            entered_tax_rate: &rate,
            upi_qr: None,
        };
        let rendered = SheetRenderer.render(&ctx).unwrap();
        String::from_utf8(rendered.bytes).unwrap()
    }

    #[test]
    fn test_numeric_cells_are_bare_numbers() {
        let csv = render_csv(&[LineItem::new("Design".to_string(), dec("2"), dec("500"))]);
        // quantity, unit price, amount as unquoted 2-decimal numbers
        assert!(csv.contains("1,Design,2.00,500.00,1000.00"));
    }

    #[test]
    fn test_text_with_commas_stays_one_cell() {
        let csv = render_csv(&[LineItem::new("Design".to_string(), dec("1"), dec("10"))]);
        assert!(csv.contains("\"Globex, Pvt Ltd\""));
    }

    #[test]
    fn test_summary_block_follows_data_rows() {
        let csv = render_csv(&[LineItem::new("Design".to_string(), dec("2"), dec("50"))]);
        let data_pos = csv.find("1,Design").unwrap();
        let subtotal_pos = csv.find(",Subtotal,").unwrap();
        let total_pos = csv.rfind(",Total,").unwrap();
        assert!(data_pos < subtotal_pos && subtotal_pos < total_pos);
        assert!(csv.contains(",Subtotal,,,100.00"));
        assert!(csv.contains(",Total,,,118.00"));
        assert!(csv.contains("Amount in Words,"));
    }

    #[test]
    fn test_header_reprinted_when_budget_exceeded() {
        let items: Vec<LineItem> = (0..PAGE_LINE_BUDGET + 5)
            .map(|i| LineItem::new(format!("Item {i}"), dec("1"), dec("10")))
            .collect();
        let csv = render_csv(&items);
        let header_count = csv.matches("#,Description,Qty,Unit Price,Amount").count();
        assert!(header_count >= 2, "expected a header reprint, got {header_count}");
    }

    #[test]
    fn test_report_csv_round_trips_rows() {
        let table = ReportTable {
            title: "Aging".to_string(),
            columns: vec!["Invoice".to_string(), "Days Overdue".to_string()],
            rows: vec![vec![SheetCell::text("INV-1"), SheetCell::number(&dec("30"))]],
            totals: vec![("Outstanding".to_string(), SheetCell::number(&dec("5000")))],
        };
        let bytes = render_report_csv(&table).unwrap();
        let csv = String::from_utf8(bytes).unwrap();
        assert!(csv.starts_with("Aging\n"));
        assert!(csv.contains("INV-1,30.00"));
        assert!(csv.contains("Outstanding,5000.00"));
    }
}
