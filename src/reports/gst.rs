//! GST register aggregation
//!
//! Splits each invoice's tax into CGST/SGST (intra-state) vs IGST
//! (inter-state) columns using the classification provided with the record.
//! The state-comparison rule that produces the classification is a business
//! decision made upstream; it is never derived here.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::render::{ReportTable, SheetCell};
use crate::types::{GstSplit, InvoiceRecord};

/// One invoice in the GST register
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GstRegisterRow {
    pub invoice_number: String,
    pub client_name: String,
    pub issue_date: chrono::NaiveDate,
    pub taxable_amount: BigDecimal,
    pub cgst: BigDecimal,
    pub sgst: BigDecimal,
    pub igst: BigDecimal,
    pub total_tax: BigDecimal,
}

/// GST register with column totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GstRegister {
    pub rows: Vec<GstRegisterRow>,
    pub total_taxable: BigDecimal,
    pub total_cgst: BigDecimal,
    pub total_sgst: BigDecimal,
    pub total_igst: BigDecimal,
    pub total_tax: BigDecimal,
}

/// Build the GST register from invoice records
///
/// A provided split whose components disagree with the invoice's tax amount
/// beyond a paisa of rounding is logged as a consistency warning and carried
/// into the register as given; correcting a legal classification is not this
/// layer's call.
pub fn build_gst_register(invoices: &[InvoiceRecord]) -> GstRegister {
    let zero = BigDecimal::from(0);
    let paisa = BigDecimal::from(1) / BigDecimal::from(100);

    let rows: Vec<GstRegisterRow> = invoices
        .iter()
        .map(|invoice| {
            let split_total = invoice.gst.total_tax();
            if (&split_total - &invoice.tax_amount).abs() > paisa {
                warn!(
                    invoice = %invoice.number,
                    split_total = %split_total,
                    tax_amount = %invoice.tax_amount,
                    "GST split disagrees with invoice tax amount"
                );
            }

            let (cgst, sgst, igst) = match &invoice.gst {
                GstSplit::IntraState { cgst, sgst } => (cgst.clone(), sgst.clone(), zero.clone()),
                GstSplit::InterState { igst } => (zero.clone(), zero.clone(), igst.clone()),
            };

            GstRegisterRow {
                invoice_number: invoice.number.clone(),
                client_name: invoice.client_name.clone(),
                issue_date: invoice.issue_date,
                taxable_amount: invoice.taxable_amount.clone(),
                total_tax: &cgst + &sgst + &igst,
                cgst,
                sgst,
                igst,
            }
        })
        .collect();

    let total_taxable = rows.iter().map(|row| &row.taxable_amount).sum();
    let total_cgst: BigDecimal = rows.iter().map(|row| &row.cgst).sum();
    let total_sgst: BigDecimal = rows.iter().map(|row| &row.sgst).sum();
    let total_igst: BigDecimal = rows.iter().map(|row| &row.igst).sum();
    let total_tax = &total_cgst + &total_sgst + &total_igst;

    GstRegister {
        rows,
        total_taxable,
        total_cgst,
        total_sgst,
        total_igst,
        total_tax,
    }
}

/// Shape the GST register for the renderer layer
pub fn gst_register_table(register: &GstRegister) -> ReportTable {
    ReportTable {
        title: "GST Register".to_string(),
        columns: vec![
            "Invoice".to_string(),
            "Client".to_string(),
            "Date".to_string(),
            "Taxable".to_string(),
            "CGST".to_string(),
            "SGST".to_string(),
            "IGST".to_string(),
            "Total Tax".to_string(),
        ],
        rows: register
            .rows
            .iter()
            .map(|row| {
                vec![
                    SheetCell::text(&row.invoice_number),
                    SheetCell::text(&row.client_name),
                    SheetCell::text(row.issue_date),
                    SheetCell::number(&row.taxable_amount),
                    SheetCell::number(&row.cgst),
                    SheetCell::number(&row.sgst),
                    SheetCell::number(&row.igst),
                    SheetCell::number(&row.total_tax),
                ]
            })
            .collect(),
        totals: vec![
            (
                "Total Taxable".to_string(),
                SheetCell::number(&register.total_taxable),
            ),
            ("Total CGST".to_string(), SheetCell::number(&register.total_cgst)),
            ("Total SGST".to_string(), SheetCell::number(&register.total_sgst)),
            ("Total IGST".to_string(), SheetCell::number(&register.total_igst)),
            ("Total Tax".to_string(), SheetCell::number(&register.total_tax)),
        ],
    }
}
