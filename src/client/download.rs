use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::Value;

/// Renderings an invoice can be downloaded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Html,
    Xml,
}

impl DocumentFormat {
    /// Path segment of the download endpoint.
    pub fn path_segment(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Html => "html",
            Self::Xml => "xml",
        }
    }
}

/// A downloaded invoice rendering.
#[derive(Debug, Clone)]
pub struct Document {
    /// Decoded payload bytes.
    pub bytes: Vec<u8>,
    /// Content type the server declared on the response.
    pub content_type: String,
}

impl Document {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Recover the document bytes from a download response body.
///
/// Some deployments wrap binary payloads inside JSON — either a bare string
/// or `{"data": "..."}` — with PDF content base64-encoded and HTML/XML as
/// plain text. Anything that does not match a known wrapper, or fails to
/// decode, falls back silently to the raw response bytes.
pub(crate) fn unwrap_document_bytes(
    raw: &[u8],
    content_type: &str,
    format: DocumentFormat,
) -> Vec<u8> {
    if !content_type.contains("application/json") {
        return raw.to_vec();
    }
    let Ok(value) = serde_json::from_slice::<Value>(raw) else {
        return raw.to_vec();
    };
    let payload = match &value {
        Value::String(s) => s.as_str(),
        Value::Object(map) => match map.get("data").and_then(Value::as_str) {
            Some(s) => s,
            None => return raw.to_vec(),
        },
        _ => return raw.to_vec(),
    };
    match format {
        DocumentFormat::Pdf => BASE64
            .decode(payload.trim())
            .unwrap_or_else(|_| raw.to_vec()),
        DocumentFormat::Html | DocumentFormat::Xml => payload.as_bytes().to_vec(),
    }
}
