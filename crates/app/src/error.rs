use notely_client::ApiError;
use notely_core::{CoreError, ErrorKind};

use crate::preferences::PreferencesError;

/// Application-level error type for command handlers.
///
/// Wraps [`CoreError`] for local domain failures and [`ApiError`] for
/// anything that went wrong talking to the backend.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `notely_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A failed backend call.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// An import document that could not be read at all.
    #[error("Import failed: {0}")]
    Import(String),

    #[error(transparent)]
    Preferences(#[from] PreferencesError),
}

/// Convenience type alias for command results.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// The failure class shown to the user.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Core(e) => e.kind(),
            AppError::Api(e) => e.kind(),
            AppError::Import(_) | AppError::Preferences(_) => ErrorKind::Decode,
        }
    }
}
