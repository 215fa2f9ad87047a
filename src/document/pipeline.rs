//! Orchestration of totals computation and document rendering

use tracing::warn;

use crate::document::FinancialDocument;
use crate::money::round_display;
use crate::render::{
    rate_drift, DocumentFormat, HtmlRenderer, PdfRenderer, RenderContext, RenderedDocument,
    SheetRenderer,
};
use crate::traits::{DefaultDocumentValidator, DocumentRenderer, DocumentValidator};
use crate::types::*;
use crate::upi::{UpiPayment, UpiQr};

/// Renders validated documents against a company profile
///
/// Holds no mutable state: every render computes totals from the document's
/// own line items and specs, so concurrent requests are independent.
pub struct DocumentPipeline {
    company: CompanyProfile,
    validator: Box<dyn DocumentValidator>,
}

impl DocumentPipeline {
    /// Create a pipeline for the given company profile
    pub fn new(company: CompanyProfile) -> Self {
        Self {
            company,
            validator: Box::new(DefaultDocumentValidator),
        }
    }

    /// Create a pipeline with a custom document validator
    pub fn with_validator(company: CompanyProfile, validator: Box<dyn DocumentValidator>) -> Self {
        Self { company, validator }
    }

    /// The profile documents are rendered against
    pub fn company(&self) -> &CompanyProfile {
        &self.company
    }

    /// Validate, compute totals, and render a document in the requested
    /// format
    ///
    /// Computation failures are fatal to the request. Rendering-stage
    /// degradations (a QR that fails to encode) and consistency warnings are
    /// surfaced on the result without failing the document.
    pub fn render(
        &self,
        document: &FinancialDocument,
        counterparty: &Counterparty,
        format: DocumentFormat,
    ) -> DocumentResult<RenderedDocument> {
        self.validator.validate_document(document)?;
        let totals = document.totals()?;

        let mut warnings = Vec::new();
        if let Some(drift) = rate_drift(&document.tax.rate, &totals) {
            let message = format!(
                "Displayed tax rate drifts {drift} percentage points from the entered rate {} on {}",
                document.tax.rate, document.meta.number
            );
            warn!(document = %document.meta.number, %drift, "tax rate display drift");
            warnings.push(message);
        }

        let upi_qr = self.payment_qr(document, &totals, &mut warnings);

        let ctx = RenderContext {
            kind: document.kind,
            meta: &document.meta,
            company: &self.company,
            counterparty,
            line_items: &document.line_items,
            totals: &totals,
            entered_tax_rate: &document.tax.rate,
            upi_qr: upi_qr.as_ref(),
        };

        let renderer: Box<dyn DocumentRenderer> = match format {
            DocumentFormat::Pdf => Box::new(PdfRenderer),
            DocumentFormat::Html => Box::new(HtmlRenderer),
            DocumentFormat::Spreadsheet => Box::new(SheetRenderer),
        };

        let mut rendered = renderer.render(&ctx)?;
        rendered.warnings.extend(warnings);
        Ok(rendered)
    }

    /// Build the payment QR for invoices when the profile carries a UPI id.
    /// A failed encode degrades to a document without the QR block.
    fn payment_qr(
        &self,
        document: &FinancialDocument,
        totals: &DocumentTotals,
        warnings: &mut Vec<String>,
    ) -> Option<UpiQr> {
        if document.kind != DocumentKind::Invoice {
            return None;
        }
        let upi_id = self.company.upi_id.as_ref()?;

        let payment = UpiPayment::new(upi_id.clone(), self.company.name.clone())
            .amount(round_display(&totals.total_amount))
            .note(document.meta.number.clone());

        match UpiQr::generate(&payment.to_uri()) {
            Ok(qr) => Some(qr),
            Err(err) => {
                warn!(document = %document.meta.number, error = %err, "payment QR degraded");
                warnings.push(format!(
                    "Payment QR omitted from {}: {err}",
                    document.meta.number
                ));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentBuilder;
    use bigdecimal::BigDecimal;
    use std::str::FromStr;

    fn dec(value: &str) -> BigDecimal {
        BigDecimal::from_str(value).unwrap()
    }

    fn company() -> CompanyProfile {
        CompanyProfile {
            name: "Acme Studio".to_string(),
            address_lines: vec!["12 MG Road".to_string()],
            gstin: Some("29ABCDE1234F1Z5".to_string()),
            state: Some("Karnataka".to_string()),
            email: None,
            bank_details: None,
            upi_id: Some("acme@okhdfcbank".to_string()),
            terms: None,
            logo_url: None,
        }
    }

    fn invoice() -> FinancialDocument {
        DocumentBuilder::invoice("INV-001".to_string(), "2024-03-01")
            .due_date("2024-03-31")
            .line_item("Consulting".to_string(), dec("2"), dec("50"))
            .discount(DiscountSpec::percentage(dec("10")))
            .tax_rate(dec("18"))
            .build()
            .unwrap()
    }

    #[test]
    fn test_render_all_formats() {
        let pipeline = DocumentPipeline::new(company());
        let document = invoice();
        let counterparty = Counterparty::named("Globex".to_string());

        for format in [
            DocumentFormat::Pdf,
            DocumentFormat::Html,
            DocumentFormat::Spreadsheet,
        ] {
            let rendered = pipeline.render(&document, &counterparty, format).unwrap();
            assert!(!rendered.bytes.is_empty());
            assert_eq!(rendered.content_type, format.content_type());
            assert!(rendered.warnings.is_empty());
        }
    }

    #[test]
    fn test_invoice_html_carries_payment_qr() {
        let pipeline = DocumentPipeline::new(company());
        let rendered = pipeline
            .render(
                &invoice(),
                &Counterparty::named("Globex".to_string()),
                DocumentFormat::Html,
            )
            .unwrap();
        let html = String::from_utf8(rendered.bytes).unwrap();
        assert!(html.contains("data:image/png;base64,"));
    }

    #[test]
    fn test_proposal_has_no_payment_qr() {
        let pipeline = DocumentPipeline::new(company());
        let proposal = DocumentBuilder::proposal("PRO-001".to_string(), "2024-03-01")
            .line_item("Scope of work".to_string(), dec("1"), dec("75000"))
            .build()
            .unwrap();

        let rendered = pipeline
            .render(
                &proposal,
                &Counterparty::named("Globex".to_string()),
                DocumentFormat::Html,
            )
            .unwrap();
        let html = String::from_utf8(rendered.bytes).unwrap();
        assert!(!html.contains("data:image/png;base64,"));
    }

    #[test]
    fn test_invalid_document_is_fatal() {
        let pipeline = DocumentPipeline::new(company());
        let mut document = invoice();
        document.line_items.clear();

        let result = pipeline.render(
            &document,
            &Counterparty::named("Globex".to_string()),
            DocumentFormat::Html,
        );
        assert!(matches!(result, Err(DocumentError::Validation(_))));
    }
}
