//! SPARQL client error types.
//!
//! Chunk-level failures are logged and skipped by the resolver; nothing here
//! crosses the public surface.

use std::sync::Arc;

/// Errors from the federated coordinate query client.
#[derive(Debug, thiserror::Error)]
pub enum SparqlError {
    /// HTTP error response from the endpoint.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Result bindings parse error.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for SparqlError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { SparqlError::Timeout } else { SparqlError::Network(Arc::new(err)) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SparqlError::HttpError { status: 429 };
        assert!(err.to_string().contains("429"));
    }
}
