//! Failure taxonomy for the notes REST client.

use std::time::Duration;

use notely_core::ErrorKind;

/// Errors from the notes REST API layer.
///
/// Three classes are kept apart: no response at all (transport, timeout,
/// cancellation), a response with a non-2xx status (server, not found), and a
/// 2xx response whose body could not be decoded. The client never retries
/// any of them.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// No response arrived within the configured timeout.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The request was abandoned by the caller before a response arrived.
    #[error("Request cancelled")]
    Cancelled,

    /// The configured base URL cannot be used.
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The targeted note does not exist (HTTP 404).
    #[error("Note not found: {message}")]
    NotFound { message: String },

    /// The backend returned a non-2xx status code.
    #[error("Notes API error ({status}): {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Error message extracted from the body, or the raw body.
        message: String,
    },

    /// The response body was not the expected JSON.
    #[error("Malformed response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Map onto the user-facing failure classes.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Transport(_)
            | ApiError::Timeout(_)
            | ApiError::Cancelled
            | ApiError::InvalidBaseUrl { .. } => ErrorKind::Transport,
            ApiError::NotFound { .. } => ErrorKind::NotFound,
            ApiError::Server { status, .. } => ErrorKind::Server { status: *status },
            ApiError::Decode(_) => ErrorKind::Decode,
        }
    }

    /// HTTP status, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound { .. } => Some(404),
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether no response reached the client.
    pub fn is_transport(&self) -> bool {
        self.kind() == ErrorKind::Transport
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_server_error() {
        let err = ApiError::Server {
            status: 500,
            message: "boom".into(),
        };
        assert_eq!(err.to_string(), "Notes API error (500): boom");
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.kind(), ErrorKind::Server { status: 500 });
    }

    #[test]
    fn transport_classes() {
        assert!(ApiError::Cancelled.is_transport());
        assert!(ApiError::Timeout(Duration::from_secs(1)).is_transport());
        assert!(!ApiError::Decode("x".into()).is_transport());

        // Build a reqwest error from an invalid URL.
        let req_err = reqwest::Client::new().get("://bad").build().unwrap_err();
        let err = ApiError::Transport(req_err);
        assert!(err.to_string().contains("HTTP request failed"));
        assert_eq!(err.status(), None);
    }

    #[test]
    fn not_found_is_distinct_from_transport() {
        let err = ApiError::NotFound {
            message: "gone".into(),
        };
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.status(), Some(404));
        assert!(!err.is_transport());
    }
}
