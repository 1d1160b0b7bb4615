#![cfg(feature = "currency")]

use chrono::NaiveDate;
use nilvera::currency::{RateType, feed_url, parse_rate};
use rust_decimal_macros::dec;

// ---------------------------------------------------------------------------
// Feed document parsing
// ---------------------------------------------------------------------------

const SAMPLE_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Tarih_Date Tarih="15.02.2026" Date="02/15/2026">
    <Currency CrossOrder="0" Kod="USD" CurrencyCode="USD">
        <Unit>1</Unit>
        <Isim>ABD DOLARI</Isim>
        <CurrencyName>US DOLLAR</CurrencyName>
        <ForexBuying>34.5678</ForexBuying>
        <ForexSelling>34.6301</ForexSelling>
        <BanknoteBuying>34,5436</BanknoteBuying>
        <BanknoteSelling>34,6820</BanknoteSelling>
    </Currency>
    <Currency CrossOrder="9" Kod="EUR" CurrencyCode="EUR">
        <Unit>1</Unit>
        <ForexBuying>37.2150</ForexBuying>
        <ForexSelling>37.2821</ForexSelling>
    </Currency>
</Tarih_Date>"#;

#[test]
fn usd_forex_buying_from_sample_document() {
    let rate = parse_rate(SAMPLE_FEED, "USD", RateType::ForexBuying).unwrap();
    assert_eq!(rate, Some(dec!(34.5678)));
}

#[test]
fn every_rate_type_reads_its_own_element() {
    assert_eq!(
        parse_rate(SAMPLE_FEED, "USD", RateType::ForexSelling).unwrap(),
        Some(dec!(34.6301))
    );
    assert_eq!(
        parse_rate(SAMPLE_FEED, "USD", RateType::BanknoteBuying).unwrap(),
        Some(dec!(34.5436))
    );
    assert_eq!(
        parse_rate(SAMPLE_FEED, "USD", RateType::BanknoteSelling).unwrap(),
        Some(dec!(34.6820))
    );
}

#[test]
fn second_currency_is_matched_independently() {
    let rate = parse_rate(SAMPLE_FEED, "EUR", RateType::ForexBuying).unwrap();
    assert_eq!(rate, Some(dec!(37.2150)));
}

#[test]
fn absent_currency_reports_none() {
    assert_eq!(
        parse_rate(SAMPLE_FEED, "CHF", RateType::ForexBuying).unwrap(),
        None
    );
}

#[test]
fn truncated_document_is_a_parse_error() {
    let broken = &SAMPLE_FEED[..80];
    assert!(parse_rate(broken, "USD", RateType::ForexBuying).is_err());
}

// ---------------------------------------------------------------------------
// URL derivation
// ---------------------------------------------------------------------------

#[test]
fn feed_url_folder_and_filename() {
    let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
    assert_eq!(
        feed_url(date),
        "https://www.tcmb.gov.tr/kurlar/202601/05012026.xml"
    );
}

#[test]
fn feed_url_zero_pads_day_and_month() {
    let date = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
    assert_eq!(
        feed_url(date),
        "https://www.tcmb.gov.tr/kurlar/202512/31122025.xml"
    );
}

// ---------------------------------------------------------------------------
// Live feed (no auth, but needs network)
// ---------------------------------------------------------------------------

#[test]
#[ignore = "requires network access to tcmb.gov.tr"]
fn live_usd_rate_resolves() {
    let result = nilvera::usd_buying_rate();
    assert!(result.success, "{:?}", result.error);
    assert!(result.rate.unwrap() > dec!(0));
    assert!(result.date.is_some());
}
