use thiserror::Error;

/// Errors raised by the Nilvera client.
///
/// Only the constructor and the binary-artifact download methods let these
/// propagate; every query method folds them into the [`ApiResponse`] failure
/// variant.
///
/// [`ApiResponse`]: crate::client::ApiResponse
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NilveraError {
    /// The server could not be reached.
    #[error("connection error: {0}")]
    Connection(String),

    /// The request exceeded its deadline.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The API answered with a non-2xx status.
    #[error("API error (HTTP {status_code}): {message}")]
    Api {
        /// Human-readable error extracted from the response body.
        message: String,
        /// HTTP status code of the failed response.
        status_code: u16,
        /// Raw response body, for callers that need the full payload.
        body: String,
    },

    /// Client construction failed (bad API key, TLS setup, ...).
    #[error("configuration error: {0}")]
    Config(String),
}

impl NilveraError {
    /// Status code of the failed response, if this is an API error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}
