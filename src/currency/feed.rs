use chrono::NaiveDate;
use quick_xml::Reader;
use quick_xml::events::Event;
use rust_decimal::Decimal;

use super::RateType;

/// Base URL of the TCMB daily rate feed.
pub const TCMB_BASE_URL: &str = "https://www.tcmb.gov.tr/kurlar";

/// Feed URL for a given day: `/kurlar/{YYYYMM}/{DDMMYYYY}.xml`.
pub fn feed_url(date: NaiveDate) -> String {
    format!(
        "{TCMB_BASE_URL}/{}/{}.xml",
        date.format("%Y%m"),
        date.format("%d%m%Y")
    )
}

/// Extract one rate from a TCMB feed document.
///
/// Currency elements are matched by their `CurrencyCode` attribute, falling
/// back to the legacy `Kod` attribute; the rate is read from the child
/// element named after the rate type, with the decimal comma normalized
/// before parsing. `Ok(None)` means the document is well-formed but the
/// currency (or a usable rate value) is not present.
pub fn parse_rate(
    xml: &str,
    currency_code: &str,
    rate_type: RateType,
) -> Result<Option<Decimal>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut in_wanted_currency = false;
    let mut in_rate_element = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let name = std::str::from_utf8(e.name().as_ref())
                    .unwrap_or("")
                    .to_string();
                if name == "Currency" {
                    let mut code: Option<String> = None;
                    let mut legacy: Option<String> = None;
                    for attr in e.attributes().flatten() {
                        let key = std::str::from_utf8(attr.key.as_ref()).unwrap_or("");
                        let val = String::from_utf8_lossy(&attr.value).to_string();
                        match key {
                            "CurrencyCode" if !val.is_empty() => code = Some(val),
                            "Kod" if !val.is_empty() => legacy = Some(val),
                            _ => {}
                        }
                    }
                    in_wanted_currency =
                        code.or(legacy).as_deref() == Some(currency_code);
                    in_rate_element = false;
                } else if in_wanted_currency && name == rate_type.as_str() {
                    in_rate_element = true;
                }
            }
            Ok(Event::Text(ref e)) if in_rate_element => {
                let text = e.unescape().unwrap_or_default();
                let normalized = text.trim().replace(',', ".");
                if let Ok(rate) = normalized.parse::<Decimal>() {
                    return Ok(Some(rate));
                }
                // Empty or junk value: keep scanning, the feed sometimes
                // carries blank elements for unquoted currencies.
            }
            Ok(Event::End(ref e)) => {
                let name = e.name();
                let name = std::str::from_utf8(name.as_ref()).unwrap_or("");
                if name == "Currency" {
                    in_wanted_currency = false;
                }
                in_rate_element = false;
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(e),
            _ => {}
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Tarih_Date Tarih="13.02.2026" Date="02/13/2026">
    <Currency CurrencyCode="USD" Kod="USD">
        <Unit>1</Unit>
        <ForexBuying>34.5678</ForexBuying>
        <ForexSelling>34,6301</ForexSelling>
        <BanknoteBuying>34.5436</BanknoteBuying>
        <BanknoteSelling>34.6820</BanknoteSelling>
    </Currency>
    <Currency CurrencyCode="EUR" Kod="EUR">
        <ForexBuying>37,1200</ForexBuying>
    </Currency>
    <Currency CurrencyCode="XDR" Kod="XDR">
        <ForexBuying></ForexBuying>
    </Currency>
</Tarih_Date>"#;

    #[test]
    fn usd_forex_buying() {
        let rate = parse_rate(FEED, "USD", RateType::ForexBuying).unwrap();
        assert_eq!(rate, Some(dec!(34.5678)));
    }

    #[test]
    fn decimal_comma_normalized() {
        let rate = parse_rate(FEED, "USD", RateType::ForexSelling).unwrap();
        assert_eq!(rate, Some(dec!(34.6301)));
        let rate = parse_rate(FEED, "EUR", RateType::ForexBuying).unwrap();
        assert_eq!(rate, Some(dec!(37.1200)));
    }

    #[test]
    fn banknote_rates() {
        let rate = parse_rate(FEED, "USD", RateType::BanknoteSelling).unwrap();
        assert_eq!(rate, Some(dec!(34.6820)));
    }

    #[test]
    fn legacy_kod_attribute_matches() {
        let xml = r#"<Tarih_Date><Currency Kod="GBP"><ForexBuying>44.10</ForexBuying></Currency></Tarih_Date>"#;
        let rate = parse_rate(xml, "GBP", RateType::ForexBuying).unwrap();
        assert_eq!(rate, Some(dec!(44.10)));
    }

    #[test]
    fn missing_currency_is_none() {
        assert_eq!(parse_rate(FEED, "JPY", RateType::ForexBuying).unwrap(), None);
    }

    #[test]
    fn blank_rate_value_is_none() {
        assert_eq!(parse_rate(FEED, "XDR", RateType::ForexBuying).unwrap(), None);
    }

    #[test]
    fn missing_rate_type_is_none() {
        assert_eq!(parse_rate(FEED, "EUR", RateType::BanknoteBuying).unwrap(), None);
    }

    #[test]
    fn malformed_xml_is_err() {
        assert!(parse_rate("<Tarih_Date><Currency", "USD", RateType::ForexBuying).is_err());
    }

    #[test]
    fn url_derivation() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 13).unwrap();
        assert_eq!(
            feed_url(date),
            "https://www.tcmb.gov.tr/kurlar/202602/13022026.xml"
        );
    }
}
