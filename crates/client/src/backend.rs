//! The seam between the application layer and the notes backend.

use async_trait::async_trait;
use notely_core::{Note, NoteDraft, NoteId, NotePatch};

use crate::api::NotesApi;
use crate::error::ApiError;
use crate::model::{ImportResult, ListQuery};

/// Operations the application needs from a notes backend.
///
/// [`NotesApi`] is the production implementation; tests substitute
/// scripted fakes.
#[async_trait]
pub trait NotesBackend: Send + Sync {
    async fn list_notes(&self, query: &ListQuery) -> Result<Vec<Note>, ApiError>;

    async fn get_note(&self, id: &NoteId) -> Result<Note, ApiError>;

    async fn create_note(&self, draft: &NoteDraft) -> Result<Note, ApiError>;

    async fn update_note(&self, id: &NoteId, patch: &NotePatch) -> Result<Note, ApiError>;

    async fn set_important(&self, id: &NoteId, important: bool) -> Result<Note, ApiError>;

    async fn soft_delete_note(&self, id: &NoteId) -> Result<(), ApiError>;

    async fn permanently_delete_note(&self, id: &NoteId) -> Result<(), ApiError>;

    async fn restore_note(&self, id: &NoteId) -> Result<Note, ApiError>;

    async fn export_all(&self) -> Result<Vec<Note>, ApiError>;

    async fn import_many(&self, drafts: &[NoteDraft]) -> Result<ImportResult, ApiError>;

    async fn clear_trash(&self) -> Result<(), ApiError>;
}

#[async_trait]
impl NotesBackend for NotesApi {
    async fn list_notes(&self, query: &ListQuery) -> Result<Vec<Note>, ApiError> {
        NotesApi::list_notes(self, query).await
    }

    async fn get_note(&self, id: &NoteId) -> Result<Note, ApiError> {
        NotesApi::get_note(self, id).await
    }

    async fn create_note(&self, draft: &NoteDraft) -> Result<Note, ApiError> {
        NotesApi::create_note(self, draft).await
    }

    async fn update_note(&self, id: &NoteId, patch: &NotePatch) -> Result<Note, ApiError> {
        NotesApi::update_note(self, id, patch).await
    }

    async fn set_important(&self, id: &NoteId, important: bool) -> Result<Note, ApiError> {
        NotesApi::set_important(self, id, important).await
    }

    async fn soft_delete_note(&self, id: &NoteId) -> Result<(), ApiError> {
        NotesApi::soft_delete_note(self, id).await
    }

    async fn permanently_delete_note(&self, id: &NoteId) -> Result<(), ApiError> {
        NotesApi::permanently_delete_note(self, id).await
    }

    async fn restore_note(&self, id: &NoteId) -> Result<Note, ApiError> {
        NotesApi::restore_note(self, id).await
    }

    async fn export_all(&self) -> Result<Vec<Note>, ApiError> {
        NotesApi::export_all(self).await
    }

    async fn import_many(&self, drafts: &[NoteDraft]) -> Result<ImportResult, ApiError> {
        NotesApi::import_many(self, drafts).await
    }

    async fn clear_trash(&self) -> Result<(), ApiError> {
        NotesApi::clear_trash(self).await
    }
}
