use std::fmt;

use crate::types::NoteId;

/// Broad failure classes a user can be told about.
///
/// Every error raised anywhere in the workspace maps onto exactly one of
/// these, which is what notifications carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No response reached the client (network, DNS, timeout, cancellation).
    Transport,
    /// The backend answered with a non-2xx status.
    Server { status: u16 },
    /// The response body was not well-formed.
    Decode,
    /// Input was rejected locally before anything was sent.
    Validation,
    /// The targeted note no longer exists.
    NotFound,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Transport => f.write_str("network error"),
            ErrorKind::Server { status } => write!(f, "server error ({status})"),
            ErrorKind::Decode => f.write_str("malformed response"),
            ErrorKind::Validation => f.write_str("validation error"),
            ErrorKind::NotFound => f.write_str("not found"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: NoteId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid value: {0}")]
    Invalid(String),
}

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::NotFound { .. } => ErrorKind::NotFound,
            CoreError::Validation(_) | CoreError::Invalid(_) => ErrorKind::Validation,
        }
    }
}

impl From<validator::ValidationErrors> for CoreError {
    fn from(errors: validator::ValidationErrors) -> Self {
        CoreError::Validation(errors.to_string())
    }
}
