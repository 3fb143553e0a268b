//! Error types for the annotation engine.

use thiserror::Error;

/// Errors from the curation API gateway.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-2xx status code.
    #[error("API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for the inline message.
        body: String,
    },
}

/// Engine-level failures.
///
/// Every variant is recoverable in place: a validation rejection discards
/// the local draft without a network call, an API failure leaves the draft
/// and the current item untouched so the user can retry.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A local precondition failed before any network call was made.
    #[error("{0}")]
    Validation(String),

    /// The backend rejected or never received a request.
    #[error(transparent)]
    Api(#[from] ApiError),
}
