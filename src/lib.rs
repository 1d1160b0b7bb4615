//! # nilvera
//!
//! Client for the [Nilvera](https://nilvera.com) e-invoice / e-archive REST
//! API, plus a lookup service for the TCMB (Turkish central bank) daily
//! exchange-rate feed.
//!
//! All I/O is synchronous and blocking; one method call is one HTTP round
//! trip. Exchange rates use [`rust_decimal::Decimal`] — never floating point.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nilvera::{ClientConfig, Environment, NilveraClient};
//!
//! let config = ClientConfig::new("my-api-key", Environment::Test);
//! let client = NilveraClient::new(config)?;
//!
//! let company = client.company_info();
//! if company.is_success() {
//!     println!("{:#?}", company.data());
//! }
//! # Ok::<(), nilvera::NilveraError>(())
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `client` (default) | Nilvera REST API client |
//! | `currency` (default) | TCMB exchange-rate lookup |
//!
//! ## Calling conventions
//!
//! Query methods on [`NilveraClient`] return an [`ApiResponse`] envelope and
//! never fail with `Err` — transport and API errors are folded into the
//! failure variant. The three binary-artifact methods
//! ([`NilveraClient::invoice_pdf`], [`NilveraClient::invoice_html`],
//! [`NilveraClient::invoice_xml`]) instead return `Result` and propagate
//! typed [`NilveraError`]s. This mirrors the upstream integration; callers
//! must handle both conventions.

pub mod config;
pub mod error;

#[cfg(feature = "client")]
pub mod client;

#[cfg(feature = "currency")]
pub mod currency;

pub use crate::config::{ClientConfig, Environment, resolve_base_url};
pub use crate::error::NilveraError;

#[cfg(feature = "client")]
pub use crate::client::{
    ApiResponse, Document, DocumentFormat, IncomingInvoiceQuery, NilveraClient, SeriesDetail,
    derive_series_detail,
};

#[cfg(feature = "currency")]
pub use crate::currency::{
    ExchangeRateResult, RateType, eur_buying_rate, exchange_rate, usd_buying_rate,
};
