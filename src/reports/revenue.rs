//! Revenue and profit grouped by client

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::render::{ReportTable, SheetCell};
use crate::types::{ExpenseRecord, InvoiceRecord};

/// Per-client revenue, expense, and profit totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueRow {
    pub client_name: String,
    /// Sum of invoice grand totals
    pub revenue: BigDecimal,
    /// Sum of expenses attributed to the client
    pub expenses: BigDecimal,
    /// Revenue minus expenses
    pub profit: BigDecimal,
    /// Profit as a percentage of revenue; absent when revenue is zero
    pub margin: Option<BigDecimal>,
}

/// Group invoices and expenses by client and derive profit and margin
///
/// Expenses without a client attribution are company-wide and stay out of
/// per-client rows. Clients are ordered by name so the output is stable for
/// a given snapshot.
pub fn revenue_rows(invoices: &[InvoiceRecord], expenses: &[ExpenseRecord]) -> Vec<RevenueRow> {
    let zero = BigDecimal::from(0);
    let mut by_client: BTreeMap<String, (BigDecimal, BigDecimal)> = BTreeMap::new();

    for invoice in invoices {
        let entry = by_client
            .entry(invoice.client_name.clone())
            .or_insert_with(|| (zero.clone(), zero.clone()));
        entry.0 += &invoice.total_amount;
    }

    for expense in expenses {
        let Some(client_name) = &expense.client_name else {
            continue;
        };
        let entry = by_client
            .entry(client_name.clone())
            .or_insert_with(|| (zero.clone(), zero.clone()));
        entry.1 += &expense.amount;
    }

    by_client
        .into_iter()
        .map(|(client_name, (revenue, expenses))| {
            let profit = &revenue - &expenses;
            // No margin without revenue; dividing by zero is never an option
            let margin = if revenue > BigDecimal::from(0) {
                Some(&profit / &revenue * BigDecimal::from(100))
            } else {
                None
            };
            RevenueRow {
                client_name,
                revenue,
                expenses,
                profit,
                margin,
            }
        })
        .collect()
}

/// Shape revenue rows for the renderer layer
pub fn revenue_table(rows: &[RevenueRow]) -> ReportTable {
    let total_revenue: BigDecimal = rows.iter().map(|row| &row.revenue).sum();
    let total_expenses: BigDecimal = rows.iter().map(|row| &row.expenses).sum();
    let total_profit = &total_revenue - &total_expenses;

    ReportTable {
        title: "Revenue & Profit by Client".to_string(),
        columns: vec![
            "Client".to_string(),
            "Revenue".to_string(),
            "Expenses".to_string(),
            "Profit".to_string(),
            "Margin %".to_string(),
        ],
        rows: rows
            .iter()
            .map(|row| {
                let margin_cell = match &row.margin {
                    Some(margin) => SheetCell::number(margin),
                    None => SheetCell::text(""),
                };
                vec![
                    SheetCell::text(&row.client_name),
                    SheetCell::number(&row.revenue),
                    SheetCell::number(&row.expenses),
                    SheetCell::number(&row.profit),
                    margin_cell,
                ]
            })
            .collect(),
        totals: vec![
            ("Total Revenue".to_string(), SheetCell::number(&total_revenue)),
            (
                "Total Expenses".to_string(),
                SheetCell::number(&total_expenses),
            ),
            ("Total Profit".to_string(), SheetCell::number(&total_profit)),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GstSplit;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn invoice(client: &str, total: i64) -> InvoiceRecord {
        let tax = BigDecimal::from(0);
        InvoiceRecord {
            number: format!("INV-{client}-{total}"),
            client_name: client.to_string(),
            issue_date: date(2024, 1, 10),
            due_date: date(2024, 2, 10),
            taxable_amount: BigDecimal::from(total),
            tax_amount: tax.clone(),
            total_amount: BigDecimal::from(total),
            gst: GstSplit::intra_state(&tax),
            paid: false,
        }
    }

    fn expense(client: Option<&str>, amount: i64) -> ExpenseRecord {
        ExpenseRecord {
            client_name: client.map(str::to_string),
            date: date(2024, 1, 15),
            amount: BigDecimal::from(amount),
            category: Some("travel".to_string()),
            attachments: Vec::new(),
        }
    }

    #[test]
    fn test_profit_and_margin_per_client() {
        let rows = revenue_rows(
            &[invoice("Globex", 200), invoice("Globex", 300)],
            &[expense(Some("Globex"), 100)],
        );

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].revenue, BigDecimal::from(500));
        assert_eq!(rows[0].expenses, BigDecimal::from(100));
        assert_eq!(rows[0].profit, BigDecimal::from(400));
        assert_eq!(rows[0].margin, Some(BigDecimal::from(80)));
    }

    #[test]
    fn test_zero_revenue_client_has_no_margin() {
        let rows = revenue_rows(&[], &[expense(Some("Globex"), 250)]);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].revenue, BigDecimal::from(0));
        assert_eq!(rows[0].profit, BigDecimal::from(-250));
        assert_eq!(rows[0].margin, None);
    }

    #[test]
    fn test_unattributed_expenses_stay_out() {
        let rows = revenue_rows(&[invoice("Globex", 100)], &[expense(None, 40)]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].expenses, BigDecimal::from(0));
    }

    #[test]
    fn test_rows_ordered_by_client_name() {
        let rows = revenue_rows(&[invoice("Initech", 100), invoice("Acme", 100)], &[]);
        let names: Vec<&str> = rows.iter().map(|row| row.client_name.as_str()).collect();
        assert_eq!(names, ["Acme", "Initech"]);
    }

    #[test]
    fn test_idempotent_over_same_snapshot() {
        let invoices = [invoice("Globex", 500)];
        let expenses = [expense(Some("Globex"), 200)];
        assert_eq!(
            revenue_rows(&invoices, &expenses),
            revenue_rows(&invoices, &expenses)
        );
    }
}
