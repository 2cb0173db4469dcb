use siteflow_core::error::CoreError;

/// Fallback shown when the server rejects a request without a message.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

/// Client-layer error type.
///
/// Wraps [`CoreError`] for domain/validation failures and adds transport,
/// API, and session variants.  Nothing here is fatal: every variant is
/// recoverable by a manual user retry.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// A domain-level error from `siteflow-core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-2xx status code.
    #[error("API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The server answered 2xx but reported `success: false`.
    #[error("{0}")]
    Rejected(String),

    /// Another submission is already in flight on this dispatcher.
    #[error("A submission is already in progress")]
    SubmissionInFlight,

    /// The session file could not be read.
    #[error("Session store error: {0}")]
    Io(#[from] std::io::Error),

    /// The session file (or a response body) held malformed JSON.
    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for client call results.
pub type ClientResult<T> = Result<T, ClientError>;
