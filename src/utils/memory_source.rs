//! In-memory record source for testing and development

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::reports::ReportWindow;
use crate::traits::RecordSource;
use crate::types::*;

/// In-memory record source backing the report aggregator in tests and demos
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    invoices: Arc<RwLock<Vec<InvoiceRecord>>>,
    expenses: Arc<RwLock<Vec<ExpenseRecord>>>,
}

impl MemorySource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an invoice record
    pub fn add_invoice(&self, invoice: InvoiceRecord) {
        self.invoices.write().unwrap().push(invoice);
    }

    /// Add an expense record
    pub fn add_expense(&self, expense: ExpenseRecord) {
        self.expenses.write().unwrap().push(expense);
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) {
        self.invoices.write().unwrap().clear();
        self.expenses.write().unwrap().clear();
    }
}

#[async_trait]
impl RecordSource for MemorySource {
    async fn invoices(&self, window: &ReportWindow) -> DocumentResult<Vec<InvoiceRecord>> {
        let invoices = self.invoices.read().unwrap();
        let filtered: Vec<InvoiceRecord> = invoices
            .iter()
            .filter(|invoice| {
                window.contains(invoice.issue_date)
                    && window.matches_client(Some(invoice.client_name.as_str()))
            })
            .cloned()
            .collect();
        Ok(filtered)
    }

    async fn expenses(&self, window: &ReportWindow) -> DocumentResult<Vec<ExpenseRecord>> {
        let expenses = self.expenses.read().unwrap();
        let filtered: Vec<ExpenseRecord> = expenses
            .iter()
            .filter(|expense| {
                window.contains(expense.date)
                    && window.matches_client(expense.client_name.as_deref())
                    && window.matches_category(expense.category.as_deref())
            })
            .cloned()
            .collect();
        Ok(filtered)
    }
}
