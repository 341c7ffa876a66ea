use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use notely_core::CoreError;
use serde_json::json;

/// Error type for stub handlers.
///
/// Renders as `{"error": ..., "code": ...}` with a matching status, the
/// same shape the real backend uses.
#[derive(Debug, thiserror::Error)]
pub enum StubError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A failure injected through [`Faults`](crate::faults::Faults).
    #[error("Injected failure ({0})")]
    Injected(StatusCode),
}

pub type StubResult<T> = Result<T, StubError>;

impl IntoResponse for StubError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            StubError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Invalid(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            },
            StubError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            StubError::Injected(status) => (*status, "INJECTED", self.to_string()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
