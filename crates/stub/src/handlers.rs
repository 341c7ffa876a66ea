//! Handlers for the `/notes` resource.

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use notely_core::tags::parse_tags;
use notely_core::view::compute_view;
use notely_core::{CoreError, Note, NoteDraft, NoteId, NotePatch, SortOrder, ViewParams};
use serde::{Deserialize, Serialize};

use crate::error::{StubError, StubResult};
use crate::response::DataResponse;
use crate::state::StubState;

/// Query parameters for the listing endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub filter: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
}

impl ListParams {
    fn is_empty(&self) -> bool {
        self.filter.is_none() && self.search.is_none() && self.sort.is_none()
    }

    fn to_view_params(&self) -> Result<ViewParams, CoreError> {
        Ok(ViewParams {
            filter: self.filter.as_deref().unwrap_or_default().parse()?,
            search: self.search.clone().unwrap_or_default(),
            sort: SortOrder::parse_optional(self.sort.as_deref().unwrap_or_default())?,
        })
    }
}

/// Incoming note body. Tags may be an array or a comma string.
#[derive(Debug, Default, Deserialize)]
pub struct NoteInput {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<serde_json::Value>,
    pub important: Option<bool>,
}

impl NoteInput {
    fn tags(&self) -> Option<Vec<String>> {
        match self.tags.as_ref()? {
            serde_json::Value::Array(items) => Some(
                items
                    .iter()
                    .filter_map(|v| v.as_str())
                    .map(str::to_string)
                    .collect(),
            ),
            serde_json::Value::String(joined) => Some(parse_tags(joined)),
            _ => None,
        }
    }

    fn into_draft(self) -> Result<NoteDraft, CoreError> {
        let tags = self.tags().unwrap_or_default();
        NoteDraft::new(
            self.title.unwrap_or_default(),
            self.content.unwrap_or_default(),
        )
        .with_tags(tags)
        .with_important(self.important.unwrap_or(false))
        .validated()
    }

    fn into_patch(self) -> Result<NotePatch, CoreError> {
        let tags = self.tags();
        NotePatch {
            title: self.title,
            content: self.content,
            tags,
            important: self.important,
        }
        .validated()
    }
}

#[derive(Debug, Deserialize)]
pub struct ImportBody {
    pub notes: Vec<NoteInput>,
}

#[derive(Debug, Serialize)]
pub struct ImportRejection {
    pub index: usize,
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct ImportSummary {
    pub created: usize,
    pub rejected: Vec<ImportRejection>,
}

#[derive(Debug, Deserialize)]
struct ImportantBody {
    important: Option<bool>,
}

/// GET /notes
///
/// Without parameters every note is returned, trashed ones included.
pub async fn list_notes(
    State(state): State<StubState>,
    Query(params): Query<ListParams>,
) -> StubResult<Response> {
    let notes = state.notes();
    if params.is_empty() {
        return Ok(payload(&state, notes));
    }
    let view = params.to_view_params()?;
    Ok(payload(&state, compute_view(&notes, &view)))
}

/// GET /notes/{id}
pub async fn get_note(
    State(state): State<StubState>,
    Path(id): Path<String>,
) -> StubResult<Response> {
    let id = NoteId::from(id);
    let note = state.note(&id).ok_or(CoreError::NotFound { entity: "Note", id })?;
    Ok(payload(&state, note))
}

/// POST /notes
pub async fn create_note(
    State(state): State<StubState>,
    Json(input): Json<NoteInput>,
) -> StubResult<(StatusCode, Response)> {
    let note = state.create(input.into_draft()?);
    tracing::info!(note_id = %note.id, "Note created");
    Ok((StatusCode::CREATED, payload(&state, note)))
}

/// PUT /notes/{id} and PATCH /notes/{id}
///
/// Fields left out of the body are kept.
pub async fn update_note(
    State(state): State<StubState>,
    Path(id): Path<String>,
    Json(input): Json<NoteInput>,
) -> StubResult<Response> {
    let note = state.update(&NoteId::from(id), input.into_patch()?)?;
    Ok(payload(&state, note))
}

/// PATCH /notes/{id}/toggle-important
///
/// Sets the flag to `{"important": v}` when given, otherwise flips it.
pub async fn toggle_important(
    State(state): State<StubState>,
    Path(id): Path<String>,
    body: Bytes,
) -> StubResult<Response> {
    let important = if body.is_empty() {
        None
    } else {
        serde_json::from_slice::<ImportantBody>(&body)
            .map_err(|e| StubError::BadRequest(e.to_string()))?
            .important
    };
    let note = state.set_important(&NoteId::from(id), important)?;
    Ok(payload(&state, note))
}

/// DELETE /notes/{id}/trash
pub async fn trash_note(
    State(state): State<StubState>,
    Path(id): Path<String>,
) -> StubResult<StatusCode> {
    state.set_deleted(&NoteId::from(id), true)?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /notes/{id}/restore
pub async fn restore_note(
    State(state): State<StubState>,
    Path(id): Path<String>,
) -> StubResult<Response> {
    let note = state.set_deleted(&NoteId::from(id), false)?;
    Ok(payload(&state, note))
}

/// DELETE /notes/{id}
pub async fn delete_note(
    State(state): State<StubState>,
    Path(id): Path<String>,
) -> StubResult<StatusCode> {
    let id = NoteId::from(id);
    state.remove(&id)?;
    tracing::info!(note_id = %id, "Note permanently deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /notes/export/all
pub async fn export_all(State(state): State<StubState>) -> Json<DataResponse<Vec<Note>>> {
    Json(DataResponse {
        data: state.notes(),
    })
}

/// POST /notes/import
///
/// Each item is validated on its own; invalid ones are reported by index
/// and the rest are created.
pub async fn import_notes(
    State(state): State<StubState>,
    Json(body): Json<ImportBody>,
) -> Json<ImportSummary> {
    let mut created = 0;
    let mut rejected = Vec::new();

    for (index, input) in body.notes.into_iter().enumerate() {
        match input.into_draft() {
            Ok(draft) => {
                state.create(draft);
                created += 1;
            }
            Err(err) => rejected.push(ImportRejection {
                index,
                reason: err.to_string(),
            }),
        }
    }

    tracing::info!(created, rejected = rejected.len(), "Import processed");
    Json(ImportSummary { created, rejected })
}

/// DELETE /notes/trash/clear
pub async fn clear_trash(State(state): State<StubState>) -> StatusCode {
    let removed = state.clear_trash();
    tracing::info!(removed, "Trash cleared");
    StatusCode::NO_CONTENT
}

/// Serialize a note payload, enveloped or bare depending on the faults.
fn payload<T: Serialize>(state: &StubState, data: T) -> Response {
    if state.envelope() {
        Json(DataResponse { data }).into_response()
    } else {
        Json(data).into_response()
    }
}
