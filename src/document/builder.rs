//! Fluent construction of invoices and proposals

use bigdecimal::BigDecimal;

use crate::document::totals::compute_totals;
use crate::types::*;
use crate::utils::validation;

/// A complete invoice or proposal ready for rendering
///
/// Totals are never stored on the document; they are recomputed from the
/// line items and specs whenever they are needed.
#[derive(Debug, Clone, PartialEq)]
pub struct FinancialDocument {
    /// Invoice or proposal
    pub kind: DocumentKind,
    /// Number, dates, and currency
    pub meta: DocumentMeta,
    /// Billable rows, immutable once the document is built
    pub line_items: Vec<LineItem>,
    /// Discount applied once to the subtotal
    pub discount: DiscountSpec,
    /// Tax applied to the discounted subtotal
    pub tax: TaxSpec,
}

impl FinancialDocument {
    /// Derive the document totals from the current line items and specs
    pub fn totals(&self) -> DocumentResult<DocumentTotals> {
        compute_totals(&self.line_items, &self.discount, &self.tax)
    }

    /// Validate the document in full
    pub fn validate(&self) -> DocumentResult<()> {
        if self.line_items.is_empty() {
            return Err(DocumentError::Validation(
                "Document must have at least one line item".to_string(),
            ));
        }
        for item in &self.line_items {
            validation::validate_line_item(item)?;
        }
        validation::validate_discount(&self.discount)?;
        self.tax.validate()?;
        validation::validate_currency_code(&self.meta.currency)?;

        if self.meta.number.trim().is_empty() {
            return Err(DocumentError::Validation(
                "Document number cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for invoices and proposals
///
/// Dates are accepted as native values or ISO-8601 strings and resolved
/// once, when the document is built.
#[derive(Debug)]
pub struct DocumentBuilder {
    kind: DocumentKind,
    number: String,
    issue_date: DateInput,
    due_date: Option<DateInput>,
    currency: String,
    notes: Option<String>,
    line_items: Vec<LineItem>,
    discount: DiscountSpec,
    tax: TaxSpec,
}

impl DocumentBuilder {
    /// Start building an invoice
    pub fn invoice(number: String, issue_date: impl Into<DateInput>) -> Self {
        Self::new(DocumentKind::Invoice, number, issue_date)
    }

    /// Start building a proposal
    pub fn proposal(number: String, issue_date: impl Into<DateInput>) -> Self {
        Self::new(DocumentKind::Proposal, number, issue_date)
    }

    fn new(kind: DocumentKind, number: String, issue_date: impl Into<DateInput>) -> Self {
        Self {
            kind,
            number,
            issue_date: issue_date.into(),
            due_date: None,
            currency: "INR".to_string(),
            notes: None,
            line_items: Vec::new(),
            discount: DiscountSpec::none(),
            tax: TaxSpec::none(),
        }
    }

    /// Set the payment due date
    pub fn due_date(mut self, due_date: impl Into<DateInput>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }

    /// Override the default INR currency
    pub fn currency(mut self, currency: String) -> Self {
        self.currency = currency;
        self
    }

    /// Attach free-form notes
    pub fn notes(mut self, notes: String) -> Self {
        self.notes = Some(notes);
        self
    }

    /// Add a billable row
    pub fn line_item(
        mut self,
        description: String,
        quantity: BigDecimal,
        unit_price: BigDecimal,
    ) -> Self {
        self.line_items
            .push(LineItem::new(description, quantity, unit_price));
        self
    }

    /// Apply a discount to the subtotal
    pub fn discount(mut self, discount: DiscountSpec) -> Self {
        self.discount = discount;
        self
    }

    /// Apply tax at the given rate percentage
    pub fn tax_rate(mut self, rate: BigDecimal) -> Self {
        self.tax = TaxSpec::rate(rate);
        self
    }

    /// Resolve dates, validate, and produce the finished document
    pub fn build(self) -> DocumentResult<FinancialDocument> {
        let issue_date = self.issue_date.resolve()?;
        let due_date = self.due_date.as_ref().map(DateInput::resolve).transpose()?;

        let mut meta = DocumentMeta::new(self.number, issue_date);
        meta.due_date = due_date;
        meta.currency = self.currency;
        meta.notes = self.notes;

        let document = FinancialDocument {
            kind: self.kind,
            meta,
            line_items: self.line_items,
            discount: self.discount,
            tax: self.tax,
        };
        document.validate()?;
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(value: &str) -> BigDecimal {
        BigDecimal::from_str(value).unwrap()
    }

    #[test]
    fn test_build_invoice_with_iso_dates() {
        let invoice = DocumentBuilder::invoice("INV-001".to_string(), "2024-03-01")
            .due_date("2024-03-31")
            .line_item("Retainer".to_string(), dec("1"), dec("50000"))
            .tax_rate(dec("18"))
            .build()
            .unwrap();

        assert_eq!(invoice.kind, DocumentKind::Invoice);
        assert_eq!(
            invoice.meta.issue_date,
            chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
        assert_eq!(
            invoice.meta.due_date,
            Some(chrono::NaiveDate::from_ymd_opt(2024, 3, 31).unwrap())
        );
        assert_eq!(invoice.meta.currency, "INR");

        let totals = invoice.totals().unwrap();
        assert_eq!(totals.total_amount, dec("59000"));
    }

    #[test]
    fn test_build_rejects_empty_documents() {
        let result = DocumentBuilder::proposal("PRO-001".to_string(), "2024-03-01").build();
        assert!(matches!(result, Err(DocumentError::Validation(_))));
    }

    #[test]
    fn test_build_rejects_bad_issue_date() {
        let result = DocumentBuilder::invoice("INV-002".to_string(), "03/15/2024")
            .line_item("Work".to_string(), dec("1"), dec("100"))
            .build();
        assert!(matches!(result, Err(DocumentError::InvalidDate(_))));
    }

    #[test]
    fn test_build_rejects_bad_currency() {
        let result = DocumentBuilder::invoice("INV-003".to_string(), "2024-03-01")
            .currency("RUPEE".to_string())
            .line_item("Work".to_string(), dec("1"), dec("100"))
            .build();
        assert!(matches!(result, Err(DocumentError::Validation(_))));
    }
}
