//! Print today's TCMB rates for a few currencies.
//!
//! Run with: `cargo run --example exchange_rates`

use chrono::NaiveDate;
use nilvera::currency::{self, RateType};

fn main() {
    for result in [currency::usd_buying_rate(), currency::eur_buying_rate()] {
        if result.success {
            println!(
                "1 {} = {} TRY ({}, {})",
                result.currency,
                result.rate.unwrap(),
                result.rate_type,
                result.date.unwrap()
            );
        } else {
            eprintln!(
                "{} lookup failed: {}",
                result.currency,
                result.error.as_deref().unwrap_or("?")
            );
        }
    }

    // A dated lookup: rates for new year's day come from the last business
    // day of the previous year.
    let new_year = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
    let gbp = currency::exchange_rate("GBP", Some(new_year), RateType::ForexSelling);
    match gbp.date {
        Some(date) => println!(
            "GBP selling on {new_year} resolved from {date}: {:?}",
            gbp.rate
        ),
        None => eprintln!("GBP lookup failed: {}", gbp.error.as_deref().unwrap_or("?")),
    }
}
