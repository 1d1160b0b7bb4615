//! Nilvera REST API gateway.
//!
//! [`NilveraClient`] wraps the e-invoice / e-archive endpoints. Every query
//! method is one authenticated HTTP round trip translated into an
//! [`ApiResponse`] envelope; the binary-artifact download methods return
//! `Result` instead (see the crate docs on calling conventions).

mod download;
mod envelope;
mod series;

pub use download::{Document, DocumentFormat};
pub use envelope::ApiResponse;
pub use series::{SeriesDetail, derive_series_detail};

use chrono::{Datelike, Local};
use log::{debug, error};
use reqwest::Method;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::{Value, json};
use std::time::Duration;

use crate::config::ClientConfig;
use crate::error::NilveraError;

/// Default per-request deadline, in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Receiver alias used for export invoices (the customs registry mailbox).
pub const EXPORT_ALIAS: &str = "urn:mail:ihracatpk@gtb.gov.tr";

/// Query window for the incoming-invoice listing.
///
/// Dates are ISO-8601 strings as the API expects them. `Default` leaves
/// everything unset; page defaults to 1 and page size to 30 at request time.
#[derive(Debug, Clone, Default)]
pub struct IncomingInvoiceQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub search: Option<String>,
}

/// Blocking client for the Nilvera REST API.
///
/// Holds the immutable configuration and a preconfigured HTTP client; safe
/// for sequential reuse. There is no internal locking — use one instance
/// per thread for concurrent work.
#[derive(Debug, Clone)]
pub struct NilveraClient {
    config: ClientConfig,
    http: Client,
}

impl NilveraClient {
    /// Build a client from a resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns [`NilveraError::Config`] when the API key is not a valid
    /// header value or the underlying HTTP client cannot be constructed.
    pub fn new(config: ClientConfig) -> Result<Self, NilveraError> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|e| NilveraError::Config(format!("invalid API key: {e}")))?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json-patch+json"),
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| NilveraError::Config(e.to_string()))?;

        Ok(Self { config, http })
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // General
    // ------------------------------------------------------------------

    /// Probe the API by fetching the company record.
    pub fn test_connection(&self) -> ApiResponse {
        self.request(Method::GET, "/general/company", None, &[]).into()
    }

    /// Company record of the authenticated account.
    pub fn company_info(&self) -> ApiResponse {
        self.request(Method::GET, "/general/company", None, &[]).into()
    }

    /// E-invoice registration status of a taxpayer by tax / identity number.
    pub fn check_taxpayer_status(&self, tax_number: &str) -> ApiResponse {
        let path = format!("/general/GlobalCompany/GetGlobalCustomerInfo/{tax_number}");
        self.request(Method::GET, &path, None, &[]).into()
    }

    // ------------------------------------------------------------------
    // Series
    // ------------------------------------------------------------------

    /// List the configured e-invoice series.
    pub fn einvoice_series(&self) -> ApiResponse {
        self.request(Method::GET, "/einvoice/Series", None, &[]).into()
    }

    /// List the configured e-archive series.
    pub fn earchive_series(&self) -> ApiResponse {
        self.request(Method::GET, "/earchive/Series", None, &[]).into()
    }

    /// Fetch the series list and project the entry matching `series_id`
    /// into a [`SeriesDetail`], preferring the current year's counter.
    pub fn series_detail(&self, series_id: &str) -> ApiResponse {
        let listing = self.einvoice_series();
        let data = match &listing {
            ApiResponse::Success { data, .. } => data,
            ApiResponse::Failure { .. } => return listing,
        };
        match derive_series_detail(data, series_id, Local::now().year()) {
            Some(detail) => match serde_json::to_value(&detail) {
                Ok(data) => ApiResponse::Success {
                    data,
                    status_code: listing.status_code().unwrap_or(200),
                },
                Err(e) => ApiResponse::Failure {
                    error: e.to_string(),
                    status_code: None,
                },
            },
            None => ApiResponse::Failure {
                error: format!("series not found: {series_id}"),
                status_code: None,
            },
        }
    }

    // ------------------------------------------------------------------
    // E-invoice
    // ------------------------------------------------------------------

    /// Create a draft e-invoice. `customer_alias` stays empty for export
    /// invoices.
    pub fn create_draft_invoice(&self, invoice: &Value, customer_alias: &str) -> ApiResponse {
        let body = json!({
            "EInvoice": invoice,
            "CustomerAlias": customer_alias,
        });
        debug!(
            "creating draft invoice, UUID {}",
            invoice
                .pointer("/InvoiceInfo/UUID")
                .and_then(Value::as_str)
                .unwrap_or("?")
        );
        self.request(Method::POST, "/einvoice/Draft/Create", Some(&body), &[])
            .into()
    }

    /// Confirm draft invoices and transmit them to the given receiver
    /// alias; `None` uses the export (GTB) mailbox.
    pub fn confirm_and_send_draft(&self, uuids: &[&str], alias: Option<&str>) -> ApiResponse {
        let alias = alias.unwrap_or(EXPORT_ALIAS);
        let body = Value::Array(
            uuids
                .iter()
                .map(|uuid| json!({"Alias": alias, "UUID": uuid}))
                .collect(),
        );
        self.request(Method::POST, "/einvoice/Draft/ConfirmAndSend", Some(&body), &[])
            .into()
    }

    /// Transmission status of a sent invoice.
    pub fn invoice_status(&self, invoice_uuid: &str) -> ApiResponse {
        let path = format!("/einvoice/Sale/{invoice_uuid}/Status");
        self.request(Method::GET, &path, None, &[]).into()
    }

    /// Customs (GTB) registration state of an export invoice.
    pub fn check_from_gtb(&self, invoice_uuid: &str) -> ApiResponse {
        let path = format!("/einvoice/Sale/{invoice_uuid}/CheckFromGtb");
        self.request(Method::GET, &path, None, &[]).into()
    }

    /// Full detail record of a sent invoice.
    pub fn invoice_details(&self, invoice_uuid: &str) -> ApiResponse {
        let path = format!("/einvoice/Sale/{invoice_uuid}/Details");
        self.request(Method::GET, &path, None, &[]).into()
    }

    /// Delete a draft invoice.
    pub fn cancel_draft_invoice(&self, invoice_uuid: &str) -> ApiResponse {
        let path = format!("/einvoice/draft/{invoice_uuid}");
        self.request(Method::DELETE, &path, None, &[]).into()
    }

    // ------------------------------------------------------------------
    // Incoming invoices
    // ------------------------------------------------------------------

    /// Page through received invoices.
    pub fn incoming_invoices(&self, query: &IncomingInvoiceQuery) -> ApiResponse {
        let mut params: Vec<(&str, String)> = vec![
            ("Page", query.page.unwrap_or(1).to_string()),
            ("PageSize", query.page_size.unwrap_or(30).to_string()),
        ];
        if let Some(start) = &query.start_date {
            params.push(("StartDate", start.clone()));
        }
        if let Some(end) = &query.end_date {
            params.push(("EndDate", end.clone()));
        }
        if let Some(search) = &query.search {
            params.push(("Search", search.clone()));
        }
        self.request(Method::GET, "/einvoice/Purchase", None, &params)
            .into()
    }

    /// Full detail record of a received invoice.
    pub fn incoming_invoice_details(&self, invoice_uuid: &str) -> ApiResponse {
        let path = format!("/einvoice/Purchase/{invoice_uuid}/Details");
        self.request(Method::GET, &path, None, &[]).into()
    }

    // ------------------------------------------------------------------
    // E-archive
    // ------------------------------------------------------------------

    /// Create a draft e-archive invoice.
    pub fn create_archive_invoice(&self, invoice: &Value) -> ApiResponse {
        let body = json!({"ArchiveInvoice": invoice});
        self.request(Method::POST, "/earchive/Draft/Create", Some(&body), &[])
            .into()
    }

    /// Confirm and send draft e-archive invoices. An empty UUID list is
    /// rejected without touching the network.
    pub fn confirm_and_send_archive_drafts(&self, uuids: &[&str]) -> ApiResponse {
        if uuids.is_empty() {
            return ApiResponse::Failure {
                error: "at least one invoice UUID is required".into(),
                status_code: None,
            };
        }
        let body = json!(uuids);
        self.request(Method::POST, "/earchive/Draft/ConfirmAndSend", Some(&body), &[])
            .into()
    }

    // ------------------------------------------------------------------
    // Binary artifacts
    // ------------------------------------------------------------------

    /// Download the PDF rendering of an invoice.
    ///
    /// # Errors
    ///
    /// Unlike the query methods, the download methods propagate typed
    /// errors: [`NilveraError::Api`] on a non-200 status, and
    /// [`NilveraError::Connection`] for everything else.
    pub fn invoice_pdf(&self, invoice_uuid: &str, is_draft: bool) -> Result<Document, NilveraError> {
        self.fetch_document(invoice_uuid, is_draft, DocumentFormat::Pdf)
    }

    /// Download the HTML rendering of an invoice. Same error contract as
    /// [`invoice_pdf`](Self::invoice_pdf).
    pub fn invoice_html(
        &self,
        invoice_uuid: &str,
        is_draft: bool,
    ) -> Result<Document, NilveraError> {
        self.fetch_document(invoice_uuid, is_draft, DocumentFormat::Html)
    }

    /// Download the UBL XML of an invoice. Same error contract as
    /// [`invoice_pdf`](Self::invoice_pdf).
    pub fn invoice_xml(&self, invoice_uuid: &str, is_draft: bool) -> Result<Document, NilveraError> {
        self.fetch_document(invoice_uuid, is_draft, DocumentFormat::Xml)
    }

    fn fetch_document(
        &self,
        invoice_uuid: &str,
        is_draft: bool,
        format: DocumentFormat,
    ) -> Result<Document, NilveraError> {
        let kind = if is_draft { "Draft" } else { "Sale" };
        let url = format!(
            "{}/einvoice/{kind}/{invoice_uuid}/{}",
            self.config.base_url,
            format.path_segment()
        );
        debug!("nilvera download: GET {url}");

        let response = self
            .http
            .get(&url)
            .send()
            .map_err(|e| NilveraError::Connection(e.to_string()))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        if status != 200 {
            let body = response.text().unwrap_or_default();
            error!("nilvera download failed [{status}]: {url}");
            return Err(NilveraError::Api {
                message: format!("{} download failed: HTTP {status}", format.path_segment()),
                status_code: status,
                body,
            });
        }

        let raw = response
            .bytes()
            .map_err(|e| NilveraError::Connection(e.to_string()))?;
        let bytes = download::unwrap_document_bytes(&raw, &content_type, format);
        Ok(Document {
            bytes,
            content_type,
        })
    }

    // ------------------------------------------------------------------
    // Request primitive
    // ------------------------------------------------------------------

    /// Issue one authenticated request and classify the outcome. 200/201/204
    /// become a success envelope; everything else is raised as a typed error
    /// for the caller to fold via `.into()`.
    fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        query: &[(&str, String)],
    ) -> Result<ApiResponse, NilveraError> {
        let url = format!("{}{path}", self.config.base_url);
        debug!("nilvera request: {method} {url}");

        let mut req = self.http.request(method, &url);
        if let Some(body) = body {
            debug!("nilvera request body: {body}");
            req = req.json(body);
        }
        if !query.is_empty() {
            req = req.query(query);
        }

        let response = req.send().map_err(|e| {
            if e.is_timeout() {
                error!("nilvera timeout: {path}");
                NilveraError::Timeout(e.to_string())
            } else {
                error!("nilvera connection error: {path}");
                NilveraError::Connection(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        debug!("nilvera response [{status}]: {path}");
        let text = response
            .text()
            .map_err(|e| NilveraError::Connection(e.to_string()))?;

        if matches!(status, 200 | 201 | 204) {
            let data = if text.trim().is_empty() {
                json!({})
            } else {
                match serde_json::from_str(&text) {
                    Ok(value) => value,
                    // Some endpoints answer 200 with plain text.
                    Err(_) => Value::String(text),
                }
            };
            return Ok(ApiResponse::Success {
                data,
                status_code: status,
            });
        }

        let message = envelope::extract_error_detail(&text);
        error!("nilvera API error [{status}] on {path}: {message}");
        Err(NilveraError::Api {
            message,
            status_code: status,
            body: text,
        })
    }
}
