//! Traits for storage abstraction and renderer/validator seams

use async_trait::async_trait;

use crate::document::FinancialDocument;
use crate::render::{DocumentFormat, RenderContext, RenderedDocument};
use crate::reports::ReportWindow;
use crate::types::*;

/// Storage abstraction feeding the report aggregator
///
/// The pipeline never queries a database; any backend (PostgreSQL, SQLite,
/// in-memory, a remote service) can supply fully materialized records by
/// implementing these methods.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Invoices matching the filter window
    async fn invoices(&self, window: &ReportWindow) -> DocumentResult<Vec<InvoiceRecord>>;

    /// Expenses matching the filter window
    async fn expenses(&self, window: &ReportWindow) -> DocumentResult<Vec<ExpenseRecord>>;
}

/// Shared contract of the PDF, HTML, and spreadsheet renderers
pub trait DocumentRenderer: Send + Sync {
    /// The format this renderer produces
    fn format(&self) -> DocumentFormat;

    /// Produce the output byte stream from computed inputs
    fn render(&self, ctx: &RenderContext<'_>) -> DocumentResult<RenderedDocument>;
}

/// Trait for implementing custom document validation rules
pub trait DocumentValidator: Send + Sync {
    /// Validate a document before totals computation and rendering
    fn validate_document(&self, document: &FinancialDocument) -> DocumentResult<()>;
}

/// Default validator applying the standard document rules
pub struct DefaultDocumentValidator;

impl DocumentValidator for DefaultDocumentValidator {
    fn validate_document(&self, document: &FinancialDocument) -> DocumentResult<()> {
        document.validate()
    }
}
