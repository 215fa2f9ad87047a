//! Structured PDF layout for invoices and proposals

use printpdf::{
    BuiltinFont, ImageTransform, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference,
};

use crate::money::{currency_ascii, format_amount};
use crate::render::{amount_words_block, displayed_tax_rate, DocumentFormat, RenderContext, RenderedDocument};
use crate::traits::DocumentRenderer;
use crate::types::{DocumentError, DocumentKind, DocumentResult};

const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const MARGIN_X: f32 = 15.0;
const MARGIN_TOP: f32 = 14.0;
const MARGIN_BOTTOM: f32 = 16.0;
const LINE_H: f32 = 5.0;
const ROW_PAD: f32 = 1.5;

const CONTENT_RIGHT: f32 = PAGE_W - MARGIN_X;

// Items table column positions
const COL_INDEX_X: f32 = MARGIN_X;
const COL_DESC_X: f32 = MARGIN_X + 9.0;
const COL_QTY_RIGHT: f32 = 132.0;
const COL_PRICE_RIGHT: f32 = 163.0;
const COL_AMOUNT_RIGHT: f32 = CONTENT_RIGHT;
const DESC_WRAP_CHARS: usize = 44;

const QR_SIZE_MM: f32 = 28.0;
const QR_DPI: f32 = 96.0;

/// Renders documents as paginated A4 PDFs
pub struct PdfRenderer;

impl DocumentRenderer for PdfRenderer {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Pdf
    }

    fn render(&self, ctx: &RenderContext<'_>) -> DocumentResult<RenderedDocument> {
        render_pdf(ctx)
    }
}

/// Cursor over the current page and layer; starting a new page resets it
struct PageWriter<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    y: f32,
}

impl PageWriter<'_> {
    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_H - MARGIN_TOP;
    }

    /// Start a new page when fewer than `needed` millimeters remain.
    /// Returns true when a page break happened.
    fn ensure(&mut self, needed: f32) -> bool {
        if self.y - needed < MARGIN_BOTTOM {
            self.new_page();
            true
        } else {
            false
        }
    }

    fn text(&self, font: &IndirectFontRef, text: &str, size: f32, x: f32) {
        self.layer.use_text(text, size, Mm(x), Mm(self.y), font);
    }

    /// Right-aligned text using an average-advance estimate; printpdf does
    /// not expose metrics for built-in fonts
    fn text_right(&self, font: &IndirectFontRef, text: &str, size: f32, x_right: f32) {
        let width_est = text.chars().count() as f32 * size * 0.2;
        let x = (x_right - width_est).max(MARGIN_X);
        self.text(font, text, size, x);
    }

    fn rule(&self, x1: f32, x2: f32, thickness: f32) {
        self.layer.set_outline_thickness(thickness);
        self.layer.add_line(printpdf::Line {
            points: vec![
                (printpdf::Point::new(Mm(x1), Mm(self.y)), false),
                (printpdf::Point::new(Mm(x2), Mm(self.y)), false),
            ],
            is_closed: false,
        });
    }

    fn advance(&mut self, by: f32) {
        self.y -= by;
    }
}

/// Greedy word wrap at a character budget
fn wrap_text_lines(input: &str, max_chars: usize) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in input.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }

        if current.len() + 1 + word.len() <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            out.push(current);
            current = word.to_string();
        }
    }

    if !current.is_empty() {
        out.push(current);
    }

    out
}

fn render_pdf(ctx: &RenderContext<'_>) -> DocumentResult<RenderedDocument> {
    let title = format!("{} {}", ctx.kind.title(), ctx.meta.number);
    let (doc, page1, layer1) = PdfDocument::new(&title, Mm(PAGE_W), Mm(PAGE_H), "Layer 1");

    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| DocumentError::Render(e.to_string()))?;
    let font_bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| DocumentError::Render(e.to_string()))?;

    let mut page = PageWriter {
        doc: &doc,
        layer: doc.get_page(page1).get_layer(layer1),
        y: PAGE_H - MARGIN_TOP,
    };

    let currency = ctx.meta.currency.as_str();
    // Built-in Helvetica cannot encode the rupee sign, so PDF output uses
    // the ASCII currency label throughout.
    let money = |amount: &bigdecimal::BigDecimal| {
        format!("{} {}", currency_ascii(currency), format_amount(amount, currency))
    };

    // --- Header: company identity left, document title right ---
    page.text(&font_bold, &ctx.company.name, 14.0, MARGIN_X);
    page.text_right(&font_bold, ctx.kind.title(), 15.0, CONTENT_RIGHT);
    page.advance(LINE_H + 1.5);

    for line in &ctx.company.address_lines {
        page.text(&font, line, 9.0, MARGIN_X);
        page.advance(LINE_H - 0.8);
    }
    if let Some(gstin) = &ctx.company.gstin {
        page.text(&font, &format!("GSTIN: {gstin}"), 9.0, MARGIN_X);
        page.advance(LINE_H - 0.8);
    }
    if let Some(email) = &ctx.company.email {
        page.text(&font, email, 9.0, MARGIN_X);
        page.advance(LINE_H - 0.8);
    }

    page.advance(2.0);
    page.rule(MARGIN_X, CONTENT_RIGHT, 0.6);
    page.advance(LINE_H + 2.0);

    // --- Counterparty block left, document meta right ---
    let block_top = page.y;
    page.text(&font_bold, "Billed To", 10.0, MARGIN_X);
    page.advance(LINE_H);
    page.text(&font, &ctx.counterparty.name, 9.5, MARGIN_X);
    page.advance(LINE_H - 0.8);
    for line in &ctx.counterparty.address_lines {
        page.text(&font, line, 9.0, MARGIN_X);
        page.advance(LINE_H - 0.8);
    }
    if let Some(gstin) = &ctx.counterparty.gstin {
        page.text(&font, &format!("GSTIN: {gstin}"), 9.0, MARGIN_X);
        page.advance(LINE_H - 0.8);
    }
    let left_bottom = page.y;

    // Meta column on the right, starting level with the counterparty block
    page.y = block_top;
    let label_x = 130.0;
    let mut meta_rows: Vec<(String, String)> = vec![
        (
            format!("{} No.", ctx.kind.title()),
            ctx.meta.number.clone(),
        ),
        ("Date".to_string(), ctx.meta.issue_date.to_string()),
    ];
    if let Some(due_date) = ctx.meta.due_date {
        meta_rows.push(("Due Date".to_string(), due_date.to_string()));
    }
    meta_rows.push(("Currency".to_string(), currency.to_string()));
    for (label, value) in meta_rows {
        page.text(&font_bold, &label, 9.0, label_x);
        page.text_right(&font, &value, 9.0, CONTENT_RIGHT);
        page.advance(LINE_H - 0.5);
    }

    page.y = page.y.min(left_bottom);
    page.advance(LINE_H + 1.0);

    // --- Items table ---
    draw_table_header(&mut page, &font_bold);

    for (index, item) in ctx.line_items.iter().enumerate() {
        let wrapped = wrap_text_lines(&item.description, DESC_WRAP_CHARS);
        let line_count = wrapped.len().max(1);
        let row_height = line_count as f32 * (LINE_H - 0.6) + ROW_PAD;

        // Row-to-page assignment is content-driven: a row that does not fit
        // moves whole to the next page, which reprints the header.
        if page.ensure(row_height + 4.0) {
            draw_table_header(&mut page, &font_bold);
        }

        page.text(&font, &format!("{}", index + 1), 9.0, COL_INDEX_X);
        page.text_right(
            &font,
            &format_amount(&item.quantity, currency),
            9.0,
            COL_QTY_RIGHT,
        );
        page.text_right(&font, &money(&item.unit_price), 9.0, COL_PRICE_RIGHT);
        page.text_right(&font, &money(&item.line_total()), 9.0, COL_AMOUNT_RIGHT);

        for line in wrapped {
            page.text(&font, &line, 9.0, COL_DESC_X);
            page.advance(LINE_H - 0.6);
        }
        page.advance(ROW_PAD);
    }

    page.advance(1.0);
    page.rule(MARGIN_X, CONTENT_RIGHT, 0.4);
    page.advance(LINE_H + 1.0);

    // --- Totals block, right-aligned ---
    let totals = ctx.totals;
    let mut totals_rows: Vec<(String, String)> = vec![("Subtotal".to_string(), money(&totals.subtotal))];
    if totals.discount_amount > bigdecimal::BigDecimal::from(0) {
        totals_rows.push(("Discount".to_string(), money(&totals.discount_amount)));
    }
    totals_rows.push((
        format!("GST ({}%)", displayed_tax_rate(totals)),
        money(&totals.tax_amount),
    ));

    let totals_height = (totals_rows.len() + 2) as f32 * LINE_H + 6.0;
    if page.ensure(totals_height) {
        page.advance(LINE_H);
    }

    for (label, value) in &totals_rows {
        page.text(&font, label, 9.5, label_x);
        page.text_right(&font, value, 9.5, CONTENT_RIGHT);
        page.advance(LINE_H - 0.3);
    }
    page.advance(0.7);
    page.rule(label_x, CONTENT_RIGHT, 0.6);
    page.advance(LINE_H);
    page.text(&font_bold, "Total", 10.5, label_x);
    page.text_right(&font_bold, &money(&totals.total_amount), 10.5, CONTENT_RIGHT);
    page.advance(LINE_H + 2.0);

    // --- Amount in words, single source of textual truth ---
    if let Some(words) = amount_words_block(totals, currency)? {
        let wrapped = wrap_text_lines(&words, 90);
        if page.ensure((wrapped.len() + 1) as f32 * LINE_H) {
            page.advance(LINE_H);
        }
        page.text(&font_bold, "Amount in Words:", 9.0, MARGIN_X);
        page.advance(LINE_H - 0.5);
        for line in wrapped {
            page.text(&font, &line, 9.0, MARGIN_X);
            page.advance(LINE_H - 0.8);
        }
        page.advance(2.0);
    }

    // --- Payment details and QR ---
    if ctx.kind == DocumentKind::Invoice {
        let bank_lines: Vec<String> = match &ctx.company.bank_details {
            Some(bank) => vec![
                format!("Bank: {}", bank.bank_name),
                format!("Account Name: {}", bank.account_name),
                format!("Account No: {}", bank.account_number),
                format!("IFSC: {}", bank.ifsc_code),
            ],
            None => Vec::new(),
        };

        if !bank_lines.is_empty() || ctx.upi_qr.is_some() {
            let needed = (bank_lines.len().max(1) as f32 * LINE_H)
                .max(QR_SIZE_MM + LINE_H)
                + LINE_H * 2.0;
            if page.ensure(needed) {
                page.advance(LINE_H);
            }

            page.text(&font_bold, "Payment Details", 10.0, MARGIN_X);
            page.advance(LINE_H);

            let block_top = page.y;
            for line in &bank_lines {
                page.text(&font, line, 9.0, MARGIN_X);
                page.advance(LINE_H - 0.8);
            }

            if let Some(qr) = ctx.upi_qr {
                embed_qr(&page, qr, block_top);
                page.y = page.y.min(block_top - QR_SIZE_MM);
            }
            page.advance(LINE_H);
        }
    }

    // --- Notes and terms ---
    for (label, body) in [
        ("Notes", ctx.meta.notes.as_deref()),
        ("Terms & Conditions", ctx.company.terms.as_deref()),
    ] {
        if let Some(body) = body {
            let wrapped = wrap_text_lines(body, 100);
            if page.ensure((wrapped.len() + 2) as f32 * (LINE_H - 0.8)) {
                page.advance(LINE_H);
            }
            page.text(&font_bold, label, 9.0, MARGIN_X);
            page.advance(LINE_H - 0.8);
            for line in wrapped {
                page.text(&font, &line, 8.5, MARGIN_X);
                page.advance(LINE_H - 1.0);
            }
            page.advance(1.5);
        }
    }

    let mut writer = std::io::BufWriter::new(Vec::<u8>::new());
    doc.save(&mut writer)
        .map_err(|e| DocumentError::Render(e.to_string()))?;
    let bytes = writer
        .into_inner()
        .map_err(|e| DocumentError::Render(e.to_string()))?;

    Ok(RenderedDocument::new(bytes, DocumentFormat::Pdf))
}

fn draw_table_header(page: &mut PageWriter<'_>, font_bold: &IndirectFontRef) {
    page.text(font_bold, "#", 9.0, COL_INDEX_X);
    page.text(font_bold, "Description", 9.0, COL_DESC_X);
    page.text_right(font_bold, "Qty", 9.0, COL_QTY_RIGHT);
    page.text_right(font_bold, "Unit Price", 9.0, COL_PRICE_RIGHT);
    page.text_right(font_bold, "Amount", 9.0, COL_AMOUNT_RIGHT);
    page.advance(1.8);
    page.rule(MARGIN_X, CONTENT_RIGHT, 0.5);
    page.advance(LINE_H);
}

/// Place the payment QR at the right edge, top-aligned with the payment
/// block. Decoding our own PNG bytes keeps the image stack inside printpdf.
fn embed_qr(page: &PageWriter<'_>, qr: &crate::upi::UpiQr, block_top: f32) {
    let Ok(decoded) = printpdf::image_crate::load_from_memory(&qr.png) else {
        // The document is still complete without the QR block
        tracing::warn!("payment QR could not be decoded for PDF embedding");
        return;
    };

    let natural_w_mm = qr.width as f32 * 25.4 / QR_DPI;
    let scale = QR_SIZE_MM / natural_w_mm.max(1.0);

    let image = printpdf::Image::from_dynamic_image(&decoded);
    image.add_to_layer(
        page.layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(CONTENT_RIGHT - QR_SIZE_MM)),
            translate_y: Some(Mm(block_top - QR_SIZE_MM)),
            rotate: None,
            scale_x: Some(scale),
            scale_y: Some(scale),
            dpi: Some(QR_DPI),
        },
    );
}
