//! Typed failure taxonomy for search requests.
//!
//! Every fallible path in the client surfaces a [`QueryError`] variant
//! rather than a stringly error, so callers can distinguish a rejected
//! request (HTTP status) from a garbled response body or a dead network.

use thiserror::Error;

/// Failure modes of a single search request.
///
/// HTTP-level rejections carry the raw response body so the operator sees
/// exactly what the provider said. Timeouts are split out from other
/// transport failures because they are the one transport condition with a
/// bounded, configurable cause.
#[derive(Debug, Error)]
pub enum QueryError {
    /// No API key in the environment, CLI arguments, or secrets file.
    #[error("no Perigon API key found; set PERIGON_API_KEY or add one to the secrets file")]
    MissingCredential,

    /// The request carried neither query text nor a narrowing filter.
    #[error("query text is empty and no filter was provided")]
    EmptyQuery,

    /// The provider answered with a non-success status.
    #[error("search request rejected with HTTP {status}: {body}")]
    HttpStatus {
        /// Numeric HTTP status code.
        status: u16,
        /// Raw response body, unmodified.
        body: String,
    },

    /// The response body could not be decoded as the expected JSON.
    #[error("malformed search response: {0}")]
    MalformedResponse(String),

    /// The request exceeded the configured deadline.
    #[error("search request timed out")]
    Timeout,

    /// Connection-level failure other than a timeout.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
}

impl QueryError {
    /// Classify a `reqwest` failure, pulling timeouts out into their own
    /// variant.
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            QueryError::Timeout
        } else {
            QueryError::Transport(err)
        }
    }

    /// Whether a retry could plausibly succeed.
    ///
    /// Timeouts, transport failures, and server-side (5xx) rejections are
    /// transient; everything else is a caller or credential problem that
    /// will fail identically on the next attempt.
    pub fn is_transient(&self) -> bool {
        match self {
            QueryError::Timeout | QueryError::Transport(_) => true,
            QueryError::HttpStatus { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
