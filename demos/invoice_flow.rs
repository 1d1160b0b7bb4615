//! Walk the e-invoice flow against the test environment: connection probe,
//! series listing, draft creation and status/GTB queries.
//!
//! Run with: `NILVERA_API_KEY=... cargo run --example invoice_flow`

use nilvera::{ClientConfig, Environment, NilveraClient};
use serde_json::json;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let api_key = std::env::var("NILVERA_API_KEY")
        .map_err(|_| "set NILVERA_API_KEY to your test-environment key")?;

    let client = NilveraClient::new(ClientConfig::new(api_key, Environment::Test))?;

    // 1. Connection probe
    let probe = client.test_connection();
    if !probe.is_success() {
        eprintln!("connection failed: {}", probe.error().unwrap_or("?"));
        return Ok(());
    }
    println!("connected, company record:\n{:#?}\n", probe.data());

    // 2. Series listing + detail of the first series
    let series = client.einvoice_series();
    println!("e-invoice series: {:#?}\n", series.data());
    if let Some(first_id) = series
        .data()
        .and_then(|d| d.get(0))
        .and_then(|s| s.get("ID"))
    {
        let detail = client.series_detail(&first_id.to_string());
        println!("series detail: {:#?}\n", detail.data());
    }

    // 3. Draft creation (minimal export invoice skeleton)
    let uuid = "11111111-2222-3333-4444-555555555555";
    let invoice = json!({
        "InvoiceInfo": {
            "UUID": uuid,
            "InvoiceType": "ISTISNA",
            "InvoiceSerieOrNumber": "EFA",
            "IssueDate": "2026-02-13",
            "CurrencyCode": "USD",
        },
        "CompanyInfo": {},
        "CustomerInfo": {},
        "InvoiceLines": [],
    });
    let draft = client.create_draft_invoice(&invoice, "");
    println!("draft create: {:#?}\n", draft);

    if draft.is_success() {
        // 4. Confirm and send to the export mailbox, then poll status
        let sent = client.confirm_and_send_draft(&[uuid], None);
        println!("confirm and send: {:#?}\n", sent);

        let status = client.invoice_status(uuid);
        println!("status: {:#?}\n", status.data());

        let gtb = client.check_from_gtb(uuid);
        println!("GTB registry: {:#?}\n", gtb.data());

        // 5. PDF download — this one propagates errors
        match client.invoice_pdf(uuid, true) {
            Ok(doc) => println!("PDF: {} bytes ({})", doc.len(), doc.content_type),
            Err(e) => eprintln!("PDF download failed: {e}"),
        }
    }

    Ok(())
}
