//! GND lookup client error types.
//!
//! These never cross the resolver's public surface; `resolve` recovers from
//! every variant and returns `None`.

use std::sync::Arc;

/// Errors from the lobid.org GND client.
#[derive(Debug, thiserror::Error)]
pub enum GndError {
    /// HTTP error response other than not-found.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response body parse error.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for GndError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { GndError::Timeout } else { GndError::Network(Arc::new(err)) }
    }
}
