//! Core types and data structures for the billing document pipeline

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Kind of financial document produced by the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentKind {
    /// Tax invoice issued to a client
    Invoice,
    /// Proposal/quotation sent before work is agreed
    Proposal,
}

impl DocumentKind {
    /// Human-readable document title used by the renderers
    pub fn title(&self) -> &'static str {
        match self {
            DocumentKind::Invoice => "Tax Invoice",
            DocumentKind::Proposal => "Proposal",
        }
    }
}

/// How a discount is applied to the sum of line totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiscountType {
    /// Flat amount subtracted from the subtotal
    Fixed,
    /// Percentage of the subtotal
    Percentage,
}

/// Discount configuration applied once to the document subtotal
///
/// The derived discount amount is clamped so it never exceeds the subtotal
/// and never goes below zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountSpec {
    /// Fixed or percentage discount
    pub discount_type: DiscountType,
    /// Flat amount or percentage value depending on `discount_type`
    pub value: BigDecimal,
}

impl DiscountSpec {
    /// No discount
    pub fn none() -> Self {
        Self::fixed(BigDecimal::from(0))
    }

    /// Flat discount of the given amount
    pub fn fixed(value: BigDecimal) -> Self {
        Self {
            discount_type: DiscountType::Fixed,
            value,
        }
    }

    /// Percentage discount of the subtotal
    pub fn percentage(value: BigDecimal) -> Self {
        Self {
            discount_type: DiscountType::Percentage,
            value,
        }
    }
}

/// Tax configuration applied to the discounted subtotal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxSpec {
    /// Tax rate percentage, must lie in [0, 100]
    pub rate: BigDecimal,
}

impl TaxSpec {
    /// Zero-rated tax
    pub fn none() -> Self {
        Self::rate(BigDecimal::from(0))
    }

    /// Tax at the given rate percentage
    pub fn rate(rate: BigDecimal) -> Self {
        Self { rate }
    }

    /// Validate that the rate lies in [0, 100]
    pub fn validate(&self) -> DocumentResult<()> {
        if self.rate < BigDecimal::from(0) || self.rate > BigDecimal::from(100) {
            return Err(DocumentError::Validation(format!(
                "Tax rate must be between 0 and 100, got {}",
                self.rate
            )));
        }
        Ok(())
    }
}

/// One billable row on an invoice or proposal
///
/// Immutable once attached to a finalized document; the line total is always
/// derived from quantity and unit price, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Description of the goods or service
    pub description: String,
    /// Billed quantity, must be positive
    pub quantity: BigDecimal,
    /// Price per unit before tax, must not be negative
    pub unit_price: BigDecimal,
}

impl LineItem {
    /// Create a new line item
    pub fn new(description: String, quantity: BigDecimal, unit_price: BigDecimal) -> Self {
        Self {
            description,
            quantity,
            unit_price,
        }
    }

    /// Line total (quantity x unit price), computed at full precision
    pub fn line_total(&self) -> BigDecimal {
        &self.quantity * &self.unit_price
    }
}

/// Derived monetary totals for a document
///
/// Never stored independently of their inputs; recomputed whenever line
/// items or specs change. Values keep full precision internally and are
/// rounded to two decimal places at presentation time only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentTotals {
    /// Sum of all line totals before discount and tax
    pub subtotal: BigDecimal,
    /// Discount amount after clamping to [0, subtotal]
    pub discount_amount: BigDecimal,
    /// Subtotal minus discount, the base the tax applies to
    pub taxable_amount: BigDecimal,
    /// Tax on the taxable amount
    pub tax_amount: BigDecimal,
    /// Grand total: taxable amount plus tax
    pub total_amount: BigDecimal,
}

/// Identity and billing details of the issuing company
///
/// Read-only input to the renderers, owned by the settings subsystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    /// Registered company name
    pub name: String,
    /// Postal address, one line per element
    pub address_lines: Vec<String>,
    /// GST identification number, if registered
    pub gstin: Option<String>,
    /// State the company is registered in
    pub state: Option<String>,
    /// Contact email shown on documents
    pub email: Option<String>,
    /// Bank account details printed on invoices
    pub bank_details: Option<BankDetails>,
    /// UPI id (virtual payment address) for payment collection
    pub upi_id: Option<String>,
    /// Terms and conditions text printed at the bottom of documents
    pub terms: Option<String>,
    /// URL of the company logo; fetch failures degrade gracefully
    pub logo_url: Option<String>,
}

/// Bank account details for invoice payment instructions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankDetails {
    pub bank_name: String,
    pub account_name: String,
    pub account_number: String,
    pub ifsc_code: String,
}

/// The client or vendor a document is addressed to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Counterparty {
    /// Client or vendor name
    pub name: String,
    /// Postal address, one line per element
    pub address_lines: Vec<String>,
    /// GST identification number, if registered
    pub gstin: Option<String>,
    /// State used for intra/inter-state tax classification upstream
    pub state: Option<String>,
    /// Contact email
    pub email: Option<String>,
}

impl Counterparty {
    /// Create a counterparty with just a name
    pub fn named(name: String) -> Self {
        Self {
            name,
            address_lines: Vec::new(),
            gstin: None,
            state: None,
            email: None,
        }
    }
}

/// Document header data: number, dates, currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMeta {
    /// Unique identifier for the document
    pub id: Uuid,
    /// Human-facing document number (e.g. "INV-2024-001")
    pub number: String,
    /// Date the document was issued
    pub issue_date: NaiveDate,
    /// Payment due date, invoices only
    pub due_date: Option<NaiveDate>,
    /// ISO-ish currency code, defaults to "INR"
    pub currency: String,
    /// Free-form notes printed on the document
    pub notes: Option<String>,
    /// Additional metadata
    pub metadata: HashMap<String, String>,
}

impl DocumentMeta {
    /// Create document metadata with a fresh id and INR currency
    pub fn new(number: String, issue_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            number,
            issue_date,
            due_date: None,
            currency: "INR".to_string(),
            notes: None,
            metadata: HashMap::new(),
        }
    }
}

/// A date supplied by the HTTP glue layer
///
/// Callers may pass either a native date or an ISO-8601 string (plain date,
/// datetime, or RFC 3339); both are accepted and resolved here, once, at the
/// boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateInput {
    /// Already-parsed native date
    Date(NaiveDate),
    /// ISO-8601 date or datetime string
    Iso(String),
}

impl DateInput {
    /// Resolve to a plain date, parsing string forms
    pub fn resolve(&self) -> DocumentResult<NaiveDate> {
        match self {
            DateInput::Date(date) => Ok(*date),
            DateInput::Iso(raw) => {
                let raw = raw.trim();
                if let Ok(date) = raw.parse::<NaiveDate>() {
                    return Ok(date);
                }
                if let Ok(datetime) = chrono::DateTime::parse_from_rfc3339(raw) {
                    return Ok(datetime.date_naive());
                }
                if let Ok(datetime) = raw.parse::<chrono::NaiveDateTime>() {
                    return Ok(datetime.date());
                }
                Err(DocumentError::InvalidDate(format!(
                    "'{raw}' is not an ISO-8601 date"
                )))
            }
        }
    }
}

impl From<NaiveDate> for DateInput {
    fn from(date: NaiveDate) -> Self {
        DateInput::Date(date)
    }
}

impl From<&str> for DateInput {
    fn from(raw: &str) -> Self {
        DateInput::Iso(raw.to_string())
    }
}

impl From<String> for DateInput {
    fn from(raw: String) -> Self {
        DateInput::Iso(raw)
    }
}

/// Opaque metadata for an uploaded attachment
///
/// The pipeline never interprets attachment content; file persistence is
/// handled elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachmentMeta {
    pub name: String,
    pub url: String,
    pub size: u64,
    pub content_type: String,
}

/// CGST/SGST vs IGST classification of an invoice's tax
///
/// The intra/inter-state decision is a business/legal input made upstream
/// from a state comparison; this type carries the classification, it never
/// derives it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GstSplit {
    /// Intra-state supply: tax splits into CGST and SGST halves
    IntraState { cgst: BigDecimal, sgst: BigDecimal },
    /// Inter-state supply: the whole tax is IGST
    InterState { igst: BigDecimal },
}

impl GstSplit {
    /// Split an intra-state tax amount into equal CGST/SGST halves
    pub fn intra_state(tax_amount: &BigDecimal) -> Self {
        let half = tax_amount / BigDecimal::from(2);
        Self::IntraState {
            cgst: half.clone(),
            sgst: half,
        }
    }

    /// Classify an inter-state tax amount as IGST
    pub fn inter_state(tax_amount: &BigDecimal) -> Self {
        Self::InterState {
            igst: tax_amount.clone(),
        }
    }

    /// Total tax across the split components
    pub fn total_tax(&self) -> BigDecimal {
        match self {
            GstSplit::IntraState { cgst, sgst } => cgst + sgst,
            GstSplit::InterState { igst } => igst.clone(),
        }
    }
}

/// Materialized invoice record supplied by the storage layer
///
/// The pipeline receives these fully validated; it never queries a database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// Human-facing invoice number
    pub number: String,
    /// Name of the billed client
    pub client_name: String,
    /// Date the invoice was issued
    pub issue_date: NaiveDate,
    /// Payment due date
    pub due_date: NaiveDate,
    /// Taxable base after discount
    pub taxable_amount: BigDecimal,
    /// Total tax charged
    pub tax_amount: BigDecimal,
    /// Grand total including tax
    pub total_amount: BigDecimal,
    /// Provided CGST/SGST vs IGST classification
    pub gst: GstSplit,
    /// Whether the invoice has been settled
    pub paid: bool,
}

/// Materialized expense record supplied by the storage layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    /// Client the expense is attributable to, if any
    pub client_name: Option<String>,
    /// Date the expense was incurred
    pub date: NaiveDate,
    /// Expense amount
    pub amount: BigDecimal,
    /// Expense category (e.g. "travel", "software")
    pub category: Option<String>,
    /// Uploaded receipts, carried as opaque metadata
    pub attachments: Vec<AttachmentMeta>,
}

/// Errors that can occur in the document pipeline
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Render error: {0}")]
    Render(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Record source error: {0}")]
    RecordSource(String),
}

/// Result type for pipeline operations
pub type DocumentResult<T> = Result<T, DocumentError>;
