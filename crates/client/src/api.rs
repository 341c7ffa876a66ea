//! REST API client for the notes backend.
//!
//! Wraps the notes HTTP API (listing, CRUD, trash, import/export) using
//! [`reqwest`]. Every call is a single round trip; failures are surfaced as
//! [`ApiError`] and never retried here.

use std::time::Duration;

use notely_core::{Note, NoteDraft, NoteId, NotePatch, TagFormat};
use reqwest::{Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;

use crate::config::{ClientConfig, ToggleRoute};
use crate::error::ApiError;
use crate::model::{decode_body, error_message, ImportResult, ListQuery};

/// Header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// HTTP client for a single notes backend.
#[derive(Debug)]
pub struct NotesApi {
    client: reqwest::Client,
    base_url: Url,
    timeout: Duration,
    tag_format: TagFormat,
    toggle_route: ToggleRoute,
}

impl NotesApi {
    /// Create a new API client with its own connection pool.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ApiError::Transport)?;
        Self::with_client(client, config)
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    ///
    /// The client's own timeout applies; `config.timeout` is only used to
    /// report how long a timed out request waited.
    pub fn with_client(client: reqwest::Client, config: ClientConfig) -> Result<Self, ApiError> {
        let base_url = parse_base_url(&config.base_url)?;
        Ok(Self {
            client,
            base_url,
            timeout: config.timeout,
            tag_format: config.tag_format,
            toggle_route: config.toggle_route,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// List notes.
    ///
    /// Sends `GET /notes` with whichever of `filter`, `search`, `sort` are
    /// set. Accepts a bare array or a `{data: [...]}` envelope. An empty list
    /// is a normal result.
    pub async fn list_notes(&self, query: &ListQuery) -> Result<Vec<Note>, ApiError> {
        let request = self.request(Method::GET, &[]).query(&query.pairs());
        let response = self.send(request).await?;
        self.parse_response(response).await
    }

    /// Fetch one note via `GET /notes/{id}`.
    pub async fn get_note(&self, id: &NoteId) -> Result<Note, ApiError> {
        let response = self.send(self.request(Method::GET, &[id.as_str()])).await?;
        self.parse_response(response).await
    }

    /// Create a note via `POST /notes`. Returns the backend's copy, including
    /// the assigned id and timestamps.
    pub async fn create_note(&self, draft: &NoteDraft) -> Result<Note, ApiError> {
        let request = self
            .request(Method::POST, &[])
            .json(&draft.to_wire(self.tag_format));
        let response = self.send(request).await?;
        self.parse_response(response).await
    }

    /// Update a note via `PUT /notes/{id}`.
    pub async fn update_note(&self, id: &NoteId, patch: &NotePatch) -> Result<Note, ApiError> {
        let request = self
            .request(Method::PUT, &[id.as_str()])
            .json(&patch.to_wire(self.tag_format));
        let response = self.send(request).await?;
        self.parse_response(response).await
    }

    /// Set the importance flag to an explicit value.
    pub async fn set_important(&self, id: &NoteId, important: bool) -> Result<Note, ApiError> {
        let mut segments = vec![id.as_str()];
        if self.toggle_route == ToggleRoute::Endpoint {
            segments.push("toggle-important");
        }
        let request = self
            .request(Method::PATCH, &segments)
            .json(&serde_json::json!({ "important": important }));
        let response = self.send(request).await?;
        self.parse_response(response).await
    }

    /// Move a note to the trash via `DELETE /notes/{id}/trash`.
    ///
    /// Not idempotent: trashing an id the backend no longer knows fails with
    /// [`ApiError::NotFound`].
    pub async fn soft_delete_note(&self, id: &NoteId) -> Result<(), ApiError> {
        self.send(self.request(Method::DELETE, &[id.as_str(), "trash"]))
            .await?;
        Ok(())
    }

    /// Irreversibly delete a note via `DELETE /notes/{id}`.
    pub async fn permanently_delete_note(&self, id: &NoteId) -> Result<(), ApiError> {
        self.send(self.request(Method::DELETE, &[id.as_str()])).await?;
        Ok(())
    }

    /// Clear the soft-delete flag via `PATCH /notes/{id}/restore`.
    pub async fn restore_note(&self, id: &NoteId) -> Result<Note, ApiError> {
        let response = self
            .send(self.request(Method::PATCH, &[id.as_str(), "restore"]))
            .await?;
        self.parse_response(response).await
    }

    /// Bulk read for download via `GET /notes/export/all`.
    pub async fn export_all(&self) -> Result<Vec<Note>, ApiError> {
        let response = self
            .send(self.request(Method::GET, &["export", "all"]))
            .await?;
        self.parse_response(response).await
    }

    /// Bulk create via `POST /notes/import`.
    ///
    /// Rejections are reported per item by index into `drafts`.
    pub async fn import_many(&self, drafts: &[NoteDraft]) -> Result<ImportResult, ApiError> {
        let notes: Vec<serde_json::Value> =
            drafts.iter().map(|d| d.to_wire(self.tag_format)).collect();
        let request = self
            .request(Method::POST, &["import"])
            .json(&serde_json::json!({ "notes": notes }));
        let response = self.send(request).await?;
        self.parse_response(response).await
    }

    /// Permanently delete everything in the trash via `DELETE /notes/trash/clear`.
    pub async fn clear_trash(&self) -> Result<(), ApiError> {
        self.send(self.request(Method::DELETE, &["trash", "clear"]))
            .await?;
        Ok(())
    }

    // ---- private helpers ----

    /// Build a request for `{base}/notes/{segments...}`.
    ///
    /// Segments are percent-encoded, so opaque ids can contain anything.
    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("notes").extend(segments);
        }
        self.client.request(method, url)
    }

    /// Send a request, tagging it with a fresh request id, and require a
    /// success status. Status-only endpoints ignore whatever body follows.
    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let request_id = uuid::Uuid::new_v4().to_string();
        let request = request
            .header(REQUEST_ID_HEADER, &request_id)
            .build()
            .map_err(ApiError::Transport)?;

        tracing::debug!(
            method = %request.method(),
            path = request.url().path(),
            request_id = %request_id,
            "Sending notes API request",
        );

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| self.transport_error(e))?;

        tracing::debug!(
            status = response.status().as_u16(),
            request_id = %request_id,
            "Notes API responded",
        );

        self.ensure_success(response).await
    }

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success; a 404 becomes
    /// [`ApiError::NotFound`], any other failure [`ApiError::Server`].
    async fn ensure_success(
        &self,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        let message = error_message(status, &body);

        if status == reqwest::StatusCode::NOT_FOUND {
            Err(ApiError::NotFound { message })
        } else {
            Err(ApiError::Server {
                status: status.as_u16(),
                message,
            })
        }
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;
        decode_body(&body)
    }

    fn transport_error(&self, err: reqwest::Error) -> ApiError {
        if err.is_timeout() {
            ApiError::Timeout(self.timeout)
        } else {
            ApiError::Transport(err)
        }
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ApiError> {
    let invalid = |reason: String| ApiError::InvalidBaseUrl {
        url: raw.to_string(),
        reason,
    };
    let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.cannot_be_a_base() {
        return Err(invalid("URL cannot be a base".to_string()));
    }
    Ok(url)
}
