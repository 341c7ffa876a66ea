//! Fault injection and request recording.
//!
//! Applied as a middleware in front of every route so tests can make the
//! stub misbehave the ways a real backend does: failing statuses, garbage
//! bodies and slow responses.

use std::collections::HashMap;
use std::time::Duration;

use axum::extract::{Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::error::StubError;
use crate::state::StubState;

/// Header the client tags each request with.
const REQUEST_ID_HEADER: &str = "x-request-id";

/// Configured misbehaviour.
#[derive(Debug, Clone, Default)]
pub struct Faults {
    /// Status answered to any request addressing one of these note ids.
    pub failing_ids: HashMap<String, u16>,
    /// Status answered to every request while set.
    pub fail_all: Option<u16>,
    /// Answer `GET` requests with a body that is not JSON.
    pub malformed: bool,
    /// Wrap note payloads in `{"data": ...}`.
    pub envelope: bool,
    /// Sleep this long before handling each request.
    pub delay: Option<Duration>,
}

/// A request as seen by the stub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: Method,
    /// Path including the `/api` prefix.
    pub path: String,
    pub query: Option<String>,
    pub request_id: Option<String>,
}

/// Middleware: record the request, then apply whichever fault matches.
pub async fn inject(State(state): State<StubState>, request: Request, next: Next) -> Response {
    let recorded = RecordedRequest {
        method: request.method().clone(),
        path: request.uri().path().to_string(),
        query: request.uri().query().map(str::to_string),
        request_id: request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    };
    let faults = state.record(recorded.clone());

    if let Some(delay) = faults.delay {
        tokio::time::sleep(delay).await;
    }

    if let Some(status) = faults.fail_all.or_else(|| {
        addressed_id(&recorded.path).and_then(|id| faults.failing_ids.get(id).copied())
    }) {
        tracing::debug!(path = %recorded.path, status, "Injecting failure");
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return StubError::Injected(status).into_response();
    }

    if faults.malformed && recorded.method == Method::GET {
        return (
            StatusCode::OK,
            [(CONTENT_TYPE, "application/json")],
            "<html>this is not json</html>",
        )
            .into_response();
    }

    next.run(request).await
}

/// The path segment following `notes`, if any.
fn addressed_id(path: &str) -> Option<&str> {
    path.split('/')
        .skip_while(|segment| *segment != "notes")
        .nth(1)
        .filter(|segment| !segment.is_empty())
}
