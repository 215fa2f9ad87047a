//! Receivables aging buckets

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::render::{ReportTable, SheetCell};
use crate::types::InvoiceRecord;

/// Day-range classification of overdue receivables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgingBucket {
    /// Not yet due
    Current,
    Days1To30,
    Days31To60,
    Days61To90,
    Over90,
}

impl AgingBucket {
    /// Bucket for a number of days overdue
    ///
    /// Boundaries are exact: 30 days falls in "1-30", 31 in "31-60"; there
    /// is no overlap or gap between buckets.
    pub fn for_days_overdue(days: i64) -> Self {
        match days {
            i64::MIN..=0 => AgingBucket::Current,
            1..=30 => AgingBucket::Days1To30,
            31..=60 => AgingBucket::Days31To60,
            61..=90 => AgingBucket::Days61To90,
            _ => AgingBucket::Over90,
        }
    }

    /// Display label for report output
    pub fn label(&self) -> &'static str {
        match self {
            AgingBucket::Current => "Current",
            AgingBucket::Days1To30 => "1-30",
            AgingBucket::Days31To60 => "31-60",
            AgingBucket::Days61To90 => "61-90",
            AgingBucket::Over90 => "90+",
        }
    }
}

/// One unpaid invoice classified by age
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgingRow {
    pub invoice_number: String,
    pub client_name: String,
    pub due_date: NaiveDate,
    /// Days past due, floored at zero for invoices not yet due
    pub days_overdue: i64,
    pub bucket: AgingBucket,
    /// Amount still receivable
    pub outstanding: BigDecimal,
}

/// Classify unpaid invoices into aging rows as of `today`
///
/// Paid invoices carry no receivable and are excluded.
pub fn aging_rows(invoices: &[InvoiceRecord], today: NaiveDate) -> Vec<AgingRow> {
    invoices
        .iter()
        .filter(|invoice| !invoice.paid)
        .map(|invoice| {
            let days_overdue = (today - invoice.due_date).num_days().max(0);
            AgingRow {
                invoice_number: invoice.number.clone(),
                client_name: invoice.client_name.clone(),
                due_date: invoice.due_date,
                days_overdue,
                bucket: AgingBucket::for_days_overdue(days_overdue),
                outstanding: invoice.total_amount.clone(),
            }
        })
        .collect()
}

/// Shape aging rows for the renderer layer
pub fn aging_table(rows: &[AgingRow]) -> ReportTable {
    let total_outstanding: BigDecimal = rows.iter().map(|row| &row.outstanding).sum();

    ReportTable {
        title: "Receivables Aging".to_string(),
        columns: vec![
            "Invoice".to_string(),
            "Client".to_string(),
            "Due Date".to_string(),
            "Days Overdue".to_string(),
            "Bucket".to_string(),
            "Outstanding".to_string(),
        ],
        rows: rows
            .iter()
            .map(|row| {
                vec![
                    SheetCell::text(&row.invoice_number),
                    SheetCell::text(&row.client_name),
                    SheetCell::text(row.due_date),
                    SheetCell::text(row.days_overdue),
                    SheetCell::text(row.bucket.label()),
                    SheetCell::number(&row.outstanding),
                ]
            })
            .collect(),
        totals: vec![(
            "Total Outstanding".to_string(),
            SheetCell::number(&total_outstanding),
        )],
    }
}
