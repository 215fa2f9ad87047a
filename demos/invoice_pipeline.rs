//! End-to-end invoice pipeline walkthrough

use bigdecimal::BigDecimal;
use billing_core::{
    format_currency, BankDetails, CompanyProfile, Counterparty, DiscountSpec, DocumentBuilder,
    DocumentFormat, DocumentPipeline, UpiPayment,
};
use std::str::FromStr;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🧾 Billing Core - Invoice Pipeline Example\n");

    let company = CompanyProfile {
        name: "Acme Studio".to_string(),
        address_lines: vec!["12 MG Road".to_string(), "Bengaluru 560001".to_string()],
        gstin: Some("29ABCDE1234F1Z5".to_string()),
        state: Some("Karnataka".to_string()),
        email: Some("billing@acme.example".to_string()),
        bank_details: Some(BankDetails {
            bank_name: "HDFC Bank".to_string(),
            account_name: "Acme Studio".to_string(),
            account_number: "50100123456789".to_string(),
            ifsc_code: "HDFC0000001".to_string(),
        }),
        upi_id: Some("acme@okhdfcbank".to_string()),
        terms: Some("Payment due within 30 days of the invoice date.".to_string()),
        logo_url: None,
    };

    let counterparty = Counterparty {
        name: "Globex Pvt Ltd".to_string(),
        address_lines: vec!["4 Industrial Estate".to_string(), "Chennai 600032".to_string()],
        gstin: Some("33FGHIJ5678K2Z6".to_string()),
        state: Some("Tamil Nadu".to_string()),
        email: None,
    };

    // 1. Build an invoice; dates may be ISO strings or native dates
    let invoice = DocumentBuilder::invoice("INV-2024-042".to_string(), "2024-03-01")
        .due_date("2024-03-31")
        .line_item(
            "Product design sprint".to_string(),
            BigDecimal::from(1),
            BigDecimal::from(120000),
        )
        .line_item(
            "Frontend development (hourly)".to_string(),
            BigDecimal::from(80),
            BigDecimal::from(1500),
        )
        .discount(DiscountSpec::percentage(BigDecimal::from(5)))
        .tax_rate(BigDecimal::from(18))
        .build()?;

    // 2. Totals are derived, never stored
    let totals = invoice.totals()?;
    println!("📊 Computed Totals:");
    println!("  Subtotal:   {}", format_currency(Some(&totals.subtotal), "INR"));
    println!("  Discount:   {}", format_currency(Some(&totals.discount_amount), "INR"));
    println!("  Taxable:    {}", format_currency(Some(&totals.taxable_amount), "INR"));
    println!("  GST:        {}", format_currency(Some(&totals.tax_amount), "INR"));
    println!("  Total:      {}", format_currency(Some(&totals.total_amount), "INR"));
    println!();

    // 3. The UPI deep link the payment QR encodes
    let upi_uri = UpiPayment::new("acme@okhdfcbank".to_string(), company.name.clone())
        .amount(BigDecimal::from_str("269040")?)
        .note(invoice.meta.number.clone())
        .to_uri();
    println!("📱 UPI deep link: {upi_uri}\n");

    // 4. Render the same computed totals through all three renderers
    let pipeline = DocumentPipeline::new(company);
    for format in [
        DocumentFormat::Pdf,
        DocumentFormat::Html,
        DocumentFormat::Spreadsheet,
    ] {
        let rendered = pipeline.render(&invoice, &counterparty, format)?;
        println!(
            "🖨  {:?}: {} bytes ({})",
            format,
            rendered.bytes.len(),
            rendered.content_type
        );
    }

    println!("\n✅ Invoice pipeline completed");
    Ok(())
}
