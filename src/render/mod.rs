//! Document renderers sharing a single computation contract
//!
//! All three renderers consume the same computed totals and derive the
//! textual amount from the money formatter; none of them recomputes or
//! re-enters a numeric value.

use bigdecimal::rounding::RoundingMode;
use bigdecimal::BigDecimal;

use crate::money::amount_in_words;
use crate::types::*;
use crate::upi::UpiQr;

pub mod html;
pub mod pdf;
pub mod sheet;

pub use html::*;
pub use pdf::*;
pub use sheet::*;

/// Output format of a rendered document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    Pdf,
    Html,
    Spreadsheet,
}

impl DocumentFormat {
    /// MIME type of the produced byte stream
    pub fn content_type(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "application/pdf",
            DocumentFormat::Html => "text/html; charset=utf-8",
            DocumentFormat::Spreadsheet => "text/csv; charset=utf-8",
        }
    }

    /// File extension for downloads
    pub fn file_extension(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Html => "html",
            DocumentFormat::Spreadsheet => "csv",
        }
    }
}

/// Everything a renderer needs to produce a document
///
/// Totals arrive already computed; renderers treat them as the only source
/// of numeric truth.
#[derive(Debug)]
pub struct RenderContext<'a> {
    pub kind: DocumentKind,
    pub meta: &'a DocumentMeta,
    pub company: &'a CompanyProfile,
    pub counterparty: &'a Counterparty,
    pub line_items: &'a [LineItem],
    pub totals: &'a DocumentTotals,
    /// The tax rate the document was computed with, for display-drift checks
    pub entered_tax_rate: &'a BigDecimal,
    /// Payment QR, absent for proposals or when generation degraded
    pub upi_qr: Option<&'a UpiQr>,
}

/// A rendered document ready to stream to the caller
#[derive(Debug)]
pub struct RenderedDocument {
    /// Output bytes
    pub bytes: Vec<u8>,
    /// MIME type of `bytes`
    pub content_type: &'static str,
    /// Non-fatal consistency warnings gathered during rendering
    pub warnings: Vec<String>,
}

impl RenderedDocument {
    /// Wrap bytes for a format with no warnings
    pub fn new(bytes: Vec<u8>, format: DocumentFormat) -> Self {
        Self {
            bytes,
            content_type: format.content_type(),
            warnings: Vec::new(),
        }
    }
}

/// Tax rate label shown on documents, re-derived from the computed amounts
///
/// `round(tax / taxable * 100)` when tax was charged, zero otherwise. The
/// entered rate stays the computation source; this is display only.
pub fn displayed_tax_rate(totals: &DocumentTotals) -> BigDecimal {
    if totals.tax_amount <= BigDecimal::from(0) || totals.taxable_amount <= BigDecimal::from(0) {
        return BigDecimal::from(0);
    }
    (&totals.tax_amount / &totals.taxable_amount * BigDecimal::from(100))
        .with_scale_round(0, RoundingMode::HalfUp)
}

/// Drift between the displayed tax rate and the entered one, when it
/// exceeds the 0.5 percentage-point display tolerance
///
/// With a zero taxable base no rate can be inferred, so no drift is
/// reported. A reported drift is a data-consistency signal, never fatal.
pub fn rate_drift(entered_rate: &BigDecimal, totals: &DocumentTotals) -> Option<BigDecimal> {
    if totals.taxable_amount <= BigDecimal::from(0) {
        return None;
    }

    let displayed = displayed_tax_rate(totals);
    let drift = (displayed - entered_rate).abs();
    let tolerance = BigDecimal::from(1) / BigDecimal::from(2);
    if drift > tolerance {
        Some(drift)
    } else {
        None
    }
}

/// The "Amount in Words" block, derived from the computed grand total
///
/// Single source of textual truth for every renderer. The Indian-scale
/// wording only applies to rupee documents; other currencies omit the block.
pub fn amount_words_block(totals: &DocumentTotals, currency: &str) -> DocumentResult<Option<String>> {
    if !currency.eq_ignore_ascii_case("INR") {
        return Ok(None);
    }
    amount_in_words(&totals.total_amount).map(Some)
}

/// A typed cell for tabular output
///
/// Numbers stay numbers all the way to the output medium so spreadsheet
/// applications apply a numeric display format instead of seeing text.
#[derive(Debug, Clone, PartialEq)]
pub enum SheetCell {
    Text(String),
    Number(BigDecimal),
}

impl SheetCell {
    /// Text cell from anything displayable
    pub fn text(value: impl ToString) -> Self {
        SheetCell::Text(value.to_string())
    }

    /// Numeric cell, rendered with two decimals
    pub fn number(value: &BigDecimal) -> Self {
        SheetCell::Number(value.clone())
    }
}

/// Pre-grouped report rows shaped for the renderer layer
///
/// Lets aggregator output flow through the same HTML/spreadsheet renderers
/// that documents use.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportTable {
    /// Report heading
    pub title: String,
    /// Column header labels
    pub columns: Vec<String>,
    /// Data rows, one cell per column
    pub rows: Vec<Vec<SheetCell>>,
    /// Summary block appended after the last data row
    pub totals: Vec<(String, SheetCell)>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(value: &str) -> BigDecimal {
        BigDecimal::from_str(value).unwrap()
    }

    fn totals(taxable: &str, tax: &str) -> DocumentTotals {
        DocumentTotals {
            subtotal: dec(taxable),
            discount_amount: dec("0"),
            taxable_amount: dec(taxable),
            tax_amount: dec(tax),
            total_amount: &dec(taxable) + &dec(tax),
        }
    }

    #[test]
    fn test_displayed_rate_rederived_from_amounts() {
        assert_eq!(displayed_tax_rate(&totals("90", "16.2")), BigDecimal::from(18));
        assert_eq!(displayed_tax_rate(&totals("100", "0")), BigDecimal::from(0));
    }

    #[test]
    fn test_no_drift_within_tolerance() {
        assert!(rate_drift(&dec("18"), &totals("90", "16.2")).is_none());
        // displayed rounds 17.6 -> 18, drift 0.4 stays inside 0.5pp
        assert!(rate_drift(&dec("17.6"), &totals("100", "17.6")).is_none());
    }

    #[test]
    fn test_drift_beyond_tolerance_is_flagged() {
        // entered 12 but amounts imply 18
        let drift = rate_drift(&dec("12"), &totals("100", "18")).unwrap();
        assert_eq!(drift, BigDecimal::from(6));
    }

    #[test]
    fn test_zero_taxable_base_reports_no_drift() {
        let fully_discounted = DocumentTotals {
            subtotal: dec("100"),
            discount_amount: dec("100"),
            taxable_amount: dec("0"),
            tax_amount: dec("0"),
            total_amount: dec("0"),
        };
        assert!(rate_drift(&dec("18"), &fully_discounted).is_none());
    }

    #[test]
    fn test_words_block_only_for_inr() {
        let t = totals("100", "18");
        assert!(amount_words_block(&t, "INR").unwrap().is_some());
        assert!(amount_words_block(&t, "USD").unwrap().is_none());
    }
}
