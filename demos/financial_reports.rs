//! Report aggregation examples: aging, revenue by client, GST registers

use bigdecimal::BigDecimal;
use billing_core::{
    aging_table, gst_register_table, render_report_csv, revenue_table, utils::MemorySource,
    ExpenseRecord, GstSplit, InvoiceRecord, ReportAggregator, ReportWindow,
};
use chrono::NaiveDate;
use std::str::FromStr;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("📈 Billing Core - Financial Report Examples\n");

    let source = MemorySource::new();

    // Seed some invoices: one long overdue, one fresh, one already settled
    let tax_a = BigDecimal::from_str("18000")?;
    source.add_invoice(InvoiceRecord {
        number: "INV-001".to_string(),
        client_name: "Globex".to_string(),
        issue_date: date(2024, 2, 1),
        due_date: date(2024, 3, 2),
        taxable_amount: BigDecimal::from(100000),
        tax_amount: tax_a.clone(),
        total_amount: BigDecimal::from(118000),
        gst: GstSplit::intra_state(&tax_a),
        paid: false,
    });

    let tax_b = BigDecimal::from_str("9000")?;
    source.add_invoice(InvoiceRecord {
        number: "INV-002".to_string(),
        client_name: "Initech".to_string(),
        issue_date: date(2024, 4, 20),
        due_date: date(2024, 5, 20),
        taxable_amount: BigDecimal::from(50000),
        tax_amount: tax_b.clone(),
        total_amount: BigDecimal::from(59000),
        gst: GstSplit::inter_state(&tax_b),
        paid: false,
    });

    source.add_expense(ExpenseRecord {
        client_name: Some("Globex".to_string()),
        date: date(2024, 3, 10),
        amount: BigDecimal::from(40000),
        category: Some("contractors".to_string()),
        attachments: Vec::new(),
    });

    let aggregator = ReportAggregator::new(source);
    let window = ReportWindow::all();
    let today = date(2024, 6, 1);

    // 1. Receivables aging
    println!("⏳ Receivables Aging (as of {today}):");
    let aging = aggregator.aging(&window, today).await?;
    for row in &aging {
        println!(
            "  {} | {} | due {} | {} days overdue | bucket {}",
            row.invoice_number,
            row.client_name,
            row.due_date,
            row.days_overdue,
            row.bucket.label()
        );
    }
    println!();

    // 2. Revenue and profit by client
    println!("💰 Revenue & Profit by Client:");
    let revenue = aggregator.revenue_by_client(&window).await?;
    for row in &revenue {
        let margin = row
            .margin
            .as_ref()
            .map(|m| format!("{}%", m.with_scale(1)))
            .unwrap_or_else(|| "n/a".to_string());
        println!(
            "  {}: revenue ₹{}, expenses ₹{}, profit ₹{}, margin {}",
            row.client_name, row.revenue, row.expenses, row.profit, margin
        );
    }
    println!();

    // 3. GST register with CGST/SGST/IGST columns
    println!("🧾 GST Register:");
    let register = aggregator.gst_register(&window).await?;
    println!("  CGST total: ₹{}", register.total_cgst);
    println!("  SGST total: ₹{}", register.total_sgst);
    println!("  IGST total: ₹{}", register.total_igst);
    println!();

    // 4. Report rows flow through the same renderer layer as documents
    let csv = String::from_utf8(render_report_csv(&aging_table(&aging))?)?;
    println!("📄 Aging report as CSV:\n{csv}");

    let _ = revenue_table(&revenue);
    let _ = gst_register_table(&register);

    println!("✅ Report examples completed");
    Ok(())
}
