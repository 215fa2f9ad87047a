//! Integration tests for billing-core

use bigdecimal::BigDecimal;
use billing_core::{
    aging_table, compute_totals, gst_register_table, render_report_csv, render_report_html,
    revenue_table, utils::MemorySource, BankDetails, CompanyProfile, Counterparty, DiscountSpec,
    DocumentBuilder, DocumentFormat, DocumentPipeline, ExpenseRecord, GstSplit, InvoiceRecord,
    LineItem, ReportAggregator, ReportWindow, TaxSpec,
};
use chrono::NaiveDate;
use std::str::FromStr;

fn dec(value: &str) -> BigDecimal {
    BigDecimal::from_str(value).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn company_profile() -> CompanyProfile {
    CompanyProfile {
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
    }
}

fn invoice_record(
    number: &str,
    client: &str,
    issued: NaiveDate,
    due: NaiveDate,
    taxable: &str,
    tax: &str,
    gst: GstSplit,
    paid: bool,
) -> InvoiceRecord {
    InvoiceRecord {
        number: number.to_string(),
        client_name: client.to_string(),
        issue_date: issued,
        due_date: due,
        taxable_amount: dec(taxable),
        tax_amount: dec(tax),
        total_amount: dec(taxable) + dec(tax),
        gst,
        paid,
    }
}

#[test]
fn test_complete_invoice_rendering_workflow() {
    let pipeline = DocumentPipeline::new(company_profile());
    let counterparty = Counterparty {
        name: "Globex Pvt Ltd".to_string(),
        address_lines: vec!["4 Industrial Estate".to_string(), "Chennai 600032".to_string()],
        gstin: Some("33FGHIJ5678K2Z6".to_string()),
        state: Some("Tamil Nadu".to_string()),
        email: None,
    };

    let invoice = DocumentBuilder::invoice("INV-2024-042".to_string(), "2024-03-01")
        .due_date("2024-03-31")
        .line_item("Product design sprint".to_string(), dec("1"), dec("120000"))
        .line_item("Frontend development".to_string(), dec("80"), dec("1500"))
        .discount(DiscountSpec::percentage(dec("5")))
        .tax_rate(dec("18"))
        .build()
        .unwrap();

    // subtotal 240000, discount 12000, taxable 228000, tax 41040
    let totals = invoice.totals().unwrap();
    assert_eq!(totals.subtotal, dec("240000"));
    assert_eq!(totals.total_amount, dec("269040"));

    let pdf = pipeline
        .render(&invoice, &counterparty, DocumentFormat::Pdf)
        .unwrap();
    assert!(pdf.bytes.starts_with(b"%PDF"));
    assert!(pdf.warnings.is_empty());

    let html = pipeline
        .render(&invoice, &counterparty, DocumentFormat::Html)
        .unwrap();
    let html_text = String::from_utf8(html.bytes).unwrap();
    assert!(html_text.contains("INV-2024-042"));
    assert!(html_text.contains("GST (18%)"));
    // amount in words comes from the shared formatter
    assert!(html_text.contains(
        "Two Lakh Sixty Nine Thousand Forty Rupees Only"
    ));
    // invoice carries a scannable payment QR
    assert!(html_text.contains("data:image/png;base64,"));

    let sheet = pipeline
        .render(&invoice, &counterparty, DocumentFormat::Spreadsheet)
        .unwrap();
    let csv_text = String::from_utf8(sheet.bytes).unwrap();
    assert!(csv_text.contains("1,Product design sprint,1.00,120000.00,120000.00"));
    assert!(csv_text.contains(",Total,,,269040.00"));
}

#[test]
fn test_totals_recomputation_matches_create_time_values() {
    let items = vec![
        LineItem::new("Hosting".to_string(), dec("12"), dec("2500")),
        LineItem::new("Support retainer".to_string(), dec("1"), dec("18000")),
    ];
    let discount = DiscountSpec::fixed(dec("3000"));
    let tax = TaxSpec::rate(dec("18"));

    let stored = compute_totals(&items, &discount, &tax).unwrap();
    let recomputed = compute_totals(&items, &discount, &tax).unwrap();
    assert_eq!(stored, recomputed);
}

#[tokio::test]
async fn test_reporting_workflow_over_memory_source() {
    let source = MemorySource::new();
    let today = date(2024, 6, 1);

    let intra_tax = dec("18000");
    let inter_tax = dec("9000");
    source.add_invoice(invoice_record(
        "INV-001",
        "Globex",
        date(2024, 2, 1),
        date(2024, 3, 2),
        "100000",
        "18000",
        GstSplit::intra_state(&intra_tax),
        false,
    ));
    source.add_invoice(invoice_record(
        "INV-002",
        "Initech",
        date(2024, 4, 20),
        date(2024, 5, 2),
        "50000",
        "9000",
        GstSplit::inter_state(&inter_tax),
        false,
    ));
    source.add_invoice(invoice_record(
        "INV-003",
        "Globex",
        date(2024, 5, 1),
        date(2024, 5, 31),
        "20000",
        "3600",
        GstSplit::intra_state(&dec("3600")),
        true,
    ));
    source.add_expense(ExpenseRecord {
        client_name: Some("Globex".to_string()),
        date: date(2024, 3, 10),
        amount: dec("40000"),
        category: Some("contractors".to_string()),
        attachments: Vec::new(),
    });

    let aggregator = ReportAggregator::new(source);
    let window = ReportWindow::all();

    // Aging: paid INV-003 drops out; INV-001 is 91 days late, INV-002 is 30
    let aging = aggregator.aging(&window, today).await.unwrap();
    assert_eq!(aging.len(), 2);
    let first = aging.iter().find(|row| row.invoice_number == "INV-001").unwrap();
    assert_eq!(first.days_overdue, 91);
    assert_eq!(first.bucket.label(), "90+");
    let second = aging.iter().find(|row| row.invoice_number == "INV-002").unwrap();
    assert_eq!(second.days_overdue, 30);
    assert_eq!(second.bucket.label(), "1-30");

    // Revenue: Globex earned 118000 + 23600 against 40000 of expenses
    let revenue = aggregator.revenue_by_client(&window).await.unwrap();
    let globex = revenue.iter().find(|row| row.client_name == "Globex").unwrap();
    assert_eq!(globex.revenue, dec("141600"));
    assert_eq!(globex.profit, dec("101600"));
    assert!(globex.margin.is_some());

    // GST register splits by the provided classification
    let register = aggregator.gst_register(&window).await.unwrap();
    assert_eq!(register.total_cgst, dec("10800"));
    assert_eq!(register.total_sgst, dec("10800"));
    assert_eq!(register.total_igst, dec("9000"));

    // Report rows flow through the same renderer layer as documents
    let aging_csv = String::from_utf8(render_report_csv(&aging_table(&aging)).unwrap()).unwrap();
    assert!(aging_csv.starts_with("Receivables Aging"));
    assert!(aging_csv.contains("INV-001"));

    let revenue_html = render_report_html(&revenue_table(&revenue));
    assert!(revenue_html.contains("Revenue &amp; Profit by Client"));

    let register_csv =
        String::from_utf8(render_report_csv(&gst_register_table(&register)).unwrap()).unwrap();
    assert!(register_csv.contains("Total IGST,9000.00"));
}

#[tokio::test]
async fn test_report_window_scopes_the_register() {
    let source = MemorySource::new();
    source.add_invoice(invoice_record(
        "INV-JAN",
        "Globex",
        date(2024, 1, 15),
        date(2024, 2, 15),
        "1000",
        "180",
        GstSplit::intra_state(&dec("180")),
        false,
    ));
    source.add_invoice(invoice_record(
        "INV-FEB",
        "Globex",
        date(2024, 2, 15),
        date(2024, 3, 15),
        "2000",
        "360",
        GstSplit::intra_state(&dec("360")),
        false,
    ));

    let aggregator = ReportAggregator::new(source);
    let january = ReportWindow::between(date(2024, 1, 1), date(2024, 1, 31));
    let register = aggregator.gst_register(&january).await.unwrap();

    assert_eq!(register.rows.len(), 1);
    assert_eq!(register.rows[0].invoice_number, "INV-JAN");
    assert_eq!(register.total_tax, dec("180"));
}

#[test]
fn test_proposal_renders_without_payment_block() {
    let pipeline = DocumentPipeline::new(company_profile());
    let proposal = DocumentBuilder::proposal("PRO-2024-007".to_string(), "2024-03-01")
        .line_item("Discovery phase".to_string(), dec("1"), dec("80000"))
        .line_item("Implementation".to_string(), dec("1"), dec("240000"))
        .tax_rate(dec("18"))
        .build()
        .unwrap();

    let html = pipeline
        .render(
            &proposal,
            &Counterparty::named("Globex Pvt Ltd".to_string()),
            DocumentFormat::Html,
        )
        .unwrap();
    let html_text = String::from_utf8(html.bytes).unwrap();

    assert!(html_text.contains("Proposal"));
    assert!(!html_text.contains("Payment Details"));
    assert!(!html_text.contains("data:image/png;base64,"));
}

#[test]
fn test_fractional_rate_displays_rounded_within_tolerance() {
    let pipeline = DocumentPipeline::new(company_profile());
    let invoice = DocumentBuilder::invoice("INV-172".to_string(), "2024-03-01")
        .line_item("Odd-rated supply".to_string(), dec("1"), dec("1000"))
        .tax_rate(dec("17.2"))
        .build()
        .unwrap();

    let rendered = pipeline
        .render(
            &invoice,
            &Counterparty::named("Globex".to_string()),
            DocumentFormat::Html,
        )
        .unwrap();

    // displayed label rounds 17.2 -> 17; a 0.2pp gap is inside the
    // documented 0.5pp display tolerance, so no consistency warning
    let html_text = String::from_utf8(rendered.bytes).unwrap();
    assert!(html_text.contains("GST (17%)"));
    assert!(rendered.warnings.is_empty());
}
