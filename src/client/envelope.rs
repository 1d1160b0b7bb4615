use serde_json::Value;

use crate::error::NilveraError;

/// Keys the API is known to use for error details, in both casings.
const ERROR_KEYS: [&str; 8] = [
    "message", "Message", "title", "Title", "detail", "Detail", "errors", "Errors",
];

/// Uniform result envelope returned by every query method.
///
/// Query methods never return `Err`: transport failures, timeouts and
/// non-2xx responses all end up in the [`Failure`](Self::Failure) variant
/// with a human-readable message.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    /// 200/201/204 response; `data` is the parsed JSON body (`{}` when the
    /// body was empty, a JSON string when it was not valid JSON).
    Success {
        /// Parsed response payload.
        data: Value,
        /// HTTP status code of the response.
        status_code: u16,
    },
    /// Anything else, folded into a message.
    Failure {
        /// Human-readable error description.
        error: String,
        /// HTTP status code, when the failure came from an API response.
        status_code: Option<u16>,
    },
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Response payload, if this is a success.
    pub fn data(&self) -> Option<&Value> {
        match self {
            Self::Success { data, .. } => Some(data),
            Self::Failure { .. } => None,
        }
    }

    /// Error message, if this is a failure.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error, .. } => Some(error),
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Success { status_code, .. } => Some(*status_code),
            Self::Failure { status_code, .. } => *status_code,
        }
    }

    /// Fold an error into the failure variant. Query methods call this so
    /// the envelope is the only shape callers ever see.
    pub(crate) fn from_error(err: NilveraError) -> Self {
        let status_code = err.status_code();
        Self::Failure {
            error: err.to_string(),
            status_code,
        }
    }
}

impl From<Result<ApiResponse, NilveraError>> for ApiResponse {
    fn from(result: Result<ApiResponse, NilveraError>) -> Self {
        result.unwrap_or_else(ApiResponse::from_error)
    }
}

/// Build a descriptive error message from a non-2xx response body.
///
/// Scans the known error-shape keys and joins the matches; falls back to
/// the raw body text when it is not a JSON object.
pub(crate) fn extract_error_detail(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => {
            let parts: Vec<String> = ERROR_KEYS
                .iter()
                .filter_map(|key| {
                    map.get(*key)
                        .filter(|v| has_content(v))
                        .map(|v| format!("{key}: {}", value_text(v)))
                })
                .collect();
            if parts.is_empty() {
                Value::Object(map).to_string()
            } else {
                parts.join(" | ")
            }
        }
        Ok(other) => other.to_string(),
        Err(_) => body.to_string(),
    }
}

fn has_content(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        _ => true,
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_accessors() {
        let resp = ApiResponse::Success {
            data: json!({"Name": "ACME"}),
            status_code: 200,
        };
        assert!(resp.is_success());
        assert_eq!(resp.data().unwrap()["Name"], "ACME");
        assert_eq!(resp.status_code(), Some(200));
        assert!(resp.error().is_none());
    }

    #[test]
    fn failure_from_api_error() {
        let resp = ApiResponse::from_error(NilveraError::Api {
            message: "invalid invoice".into(),
            status_code: 422,
            body: "{}".into(),
        });
        assert!(!resp.is_success());
        assert_eq!(resp.status_code(), Some(422));
        assert!(resp.error().unwrap().contains("invalid invoice"));
    }

    #[test]
    fn failure_from_timeout_has_no_status() {
        let resp = ApiResponse::from_error(NilveraError::Timeout("deadline".into()));
        assert_eq!(resp.status_code(), None);
    }

    #[test]
    fn error_detail_joins_known_keys() {
        let body = r#"{"Message": "not found", "detail": "no such invoice"}"#;
        let detail = extract_error_detail(body);
        assert_eq!(detail, "Message: not found | detail: no such invoice");
    }

    #[test]
    fn error_detail_camel_and_lower() {
        assert!(extract_error_detail(r#"{"message": "x"}"#).contains("message: x"));
        assert!(extract_error_detail(r#"{"Errors": ["a", "b"]}"#).contains("Errors:"));
    }

    #[test]
    fn error_detail_skips_empty_values() {
        let body = r#"{"message": "", "title": "bad request"}"#;
        assert_eq!(extract_error_detail(body), "title: bad request");
    }

    #[test]
    fn error_detail_object_without_known_keys() {
        let detail = extract_error_detail(r#"{"Code": 42}"#);
        assert!(detail.contains("42"));
    }

    #[test]
    fn error_detail_falls_back_to_raw_text() {
        assert_eq!(extract_error_detail("<html>502</html>"), "<html>502</html>");
    }
}
