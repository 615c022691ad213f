//! Transport error types.
//!
//! Defined in `bandscore-core` so the admin controller can classify
//! failures in its logs without string matching.

use thiserror::Error;

/// Errors that can occur when talking to the score-records backend.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The backend answered with a non-success status.
    #[error("backend error (HTTP {status}): {message}")]
    Status { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    Network(String),

    /// The response body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl TransportError {
    /// Returns `true` if the backend rejected the request itself (4xx).
    pub fn is_client_error(&self) -> bool {
        matches!(self, TransportError::Status { status, .. } if (400..500).contains(status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_client_errors() {
        let not_found = TransportError::Status {
            status: 404,
            message: "missing".into(),
        };
        assert!(not_found.is_client_error());
        assert!(!TransportError::Network("refused".into()).is_client_error());
        assert_eq!(not_found.to_string(), "backend error (HTTP 404): missing");
    }
}
