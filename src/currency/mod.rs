//! TCMB (Turkish central bank) daily exchange-rate lookup.
//!
//! The bank publishes one XML document per business day; weekends and
//! holidays have no document. [`exchange_rate`] resolves a currency/rate
//! pair on the nearest prior business day by scanning backwards from the
//! requested date, bounded at ten calendar days.
//!
//! # Example
//!
//! ```rust,no_run
//! use nilvera::currency;
//!
//! let usd = currency::usd_buying_rate();
//! if usd.success {
//!     println!("1 USD = {} TRY ({})", usd.rate.unwrap(), usd.date.unwrap());
//! }
//! ```

mod feed;

pub use feed::{TCMB_BASE_URL, feed_url, parse_rate};

use chrono::{Datelike, Duration, Local, NaiveDate, Weekday};
use log::debug;
use rust_decimal::Decimal;
use std::fmt;
use std::time::Duration as StdDuration;

/// Calendar days scanned backwards before giving up. Weekend days count
/// against this bound even though they are never fetched.
const MAX_LOOKBACK_DAYS: u32 = 10;

/// Feed requests get a tighter deadline than the API client.
const FEED_TIMEOUT_SECS: u64 = 10;

/// Rate column of the TCMB feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateType {
    /// Cash-market buy rate.
    ForexBuying,
    /// Cash-market sell rate.
    ForexSelling,
    /// Banknote buy rate.
    BanknoteBuying,
    /// Banknote sell rate.
    BanknoteSelling,
}

impl RateType {
    /// Element name used in the feed document.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ForexBuying => "ForexBuying",
            Self::ForexSelling => "ForexSelling",
            Self::BanknoteBuying => "BanknoteBuying",
            Self::BanknoteSelling => "BanknoteSelling",
        }
    }
}

impl fmt::Display for RateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a rate lookup. Failures are in-band: `success` is false and
/// `error` carries the reason; nothing panics or returns `Err`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeRateResult {
    pub success: bool,
    /// Matched rate in TRY.
    pub rate: Option<Decimal>,
    /// The date the rate was actually found on — after a fallback scan this
    /// can differ from the requested date.
    pub date: Option<NaiveDate>,
    pub currency: String,
    pub rate_type: RateType,
    pub error: Option<String>,
}

impl ExchangeRateResult {
    fn found(currency: &str, rate_type: RateType, rate: Decimal, date: NaiveDate) -> Self {
        Self {
            success: true,
            rate: Some(rate),
            date: Some(date),
            currency: currency.to_string(),
            rate_type,
            error: None,
        }
    }

    fn not_found(
        currency: &str,
        rate_type: RateType,
        date: Option<NaiveDate>,
        error: String,
    ) -> Self {
        Self {
            success: false,
            rate: None,
            date,
            currency: currency.to_string(),
            rate_type,
            error: Some(error),
        }
    }
}

/// Resolve a rate on the nearest valid business day at or before `date`
/// (`None` = today).
///
/// Weekend days are stepped over without a feed request; every other day is
/// fetched and parsed. The scan stops after ten total steps with an
/// explicit not-found failure.
pub fn exchange_rate(
    currency_code: &str,
    date: Option<NaiveDate>,
    rate_type: RateType,
) -> ExchangeRateResult {
    let start = date.unwrap_or_else(|| Local::now().date_naive());
    scan_for_rate(currency_code, start, rate_type, |day| {
        fetch_rate_for_date(currency_code, day, rate_type)
    })
}

/// USD cash-market buy rate for today (or the nearest prior business day).
pub fn usd_buying_rate() -> ExchangeRateResult {
    exchange_rate("USD", None, RateType::ForexBuying)
}

/// EUR cash-market buy rate for today (or the nearest prior business day).
pub fn eur_buying_rate() -> ExchangeRateResult {
    exchange_rate("EUR", None, RateType::ForexBuying)
}

/// Date-fallback scan over an injected per-day fetch, so the walk is
/// testable without a network.
fn scan_for_rate<F>(
    currency_code: &str,
    start: NaiveDate,
    rate_type: RateType,
    mut fetch: F,
) -> ExchangeRateResult
where
    F: FnMut(NaiveDate) -> ExchangeRateResult,
{
    let mut date = start;
    for _ in 0..MAX_LOOKBACK_DAYS {
        if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            date -= Duration::days(1);
            continue;
        }

        let result = fetch(date);
        if result.success {
            return result;
        }

        debug!("no {currency_code} rate for {date}, trying the previous day");
        date -= Duration::days(1);
    }

    ExchangeRateResult::not_found(
        currency_code,
        rate_type,
        None,
        format!("no {currency_code} rate found within the last {MAX_LOOKBACK_DAYS} days"),
    )
}

/// Fetch and parse the feed document for one exact day.
fn fetch_rate_for_date(
    currency_code: &str,
    date: NaiveDate,
    rate_type: RateType,
) -> ExchangeRateResult {
    let fail = |error: String| {
        ExchangeRateResult::not_found(currency_code, rate_type, Some(date), error)
    };

    let url = feed_url(date);
    debug!("TCMB feed: {url}");

    let client = match reqwest::blocking::Client::builder()
        .timeout(StdDuration::from_secs(FEED_TIMEOUT_SECS))
        .build()
    {
        Ok(client) => client,
        Err(e) => return fail(format!("connection error: {e}")),
    };

    let response = match client.get(&url).send() {
        Ok(response) => response,
        Err(e) if e.is_timeout() => return fail("TCMB request timed out".to_string()),
        Err(e) => return fail(format!("connection error: {e}")),
    };

    let status = response.status();
    if status.as_u16() != 200 {
        return fail(format!("TCMB returned HTTP {}", status.as_u16()));
    }

    let body = match response.text() {
        Ok(body) => body,
        Err(e) => return fail(format!("connection error: {e}")),
    };

    match parse_rate(&body, currency_code, rate_type) {
        Ok(Some(rate)) => {
            debug!("TCMB rate: {currency_code} = {rate} TRY ({date})");
            ExchangeRateResult::found(currency_code, rate_type, rate, date)
        }
        Ok(None) => fail(format!("{currency_code} not present in the feed")),
        Err(e) => fail(format!("malformed feed XML: {e}")),
    }
}
