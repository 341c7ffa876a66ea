//! Command handlers: every user operation that changes notes.
//!
//! Each command validates its input, performs one backend call (or a
//! sequence, for bulk delete), reloads the store on success and reports
//! the outcome both as a notification and as [`CommandEvent`]s. The store
//! is never patched locally.

use std::fmt;
use std::future::Future;

use notely_client::ImportResult;
use notely_core::{CoreError, ErrorKind, Note, NoteForm, NoteId, NotePatch};

use crate::editor::{Editor, EditorMode};
use crate::error::{AppError, AppResult};
use crate::state::NotesApp;
use crate::transfer::{ExportDocument, ImportPlan};

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Create,
    Update(NoteId),
    Delete(NoteId),
    DeletePermanently(NoteId),
    Restore(NoteId),
    ToggleImportant(NoteId),
    ClearAll,
    EmptyTrash,
    Export,
    Import,
}

impl Command {
    /// The note this command is serialized on, if it targets one.
    pub fn note_id(&self) -> Option<&NoteId> {
        match self {
            Command::Update(id)
            | Command::Delete(id)
            | Command::DeletePermanently(id)
            | Command::Restore(id)
            | Command::ToggleImportant(id) => Some(id),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Create => "create",
            Command::Update(_) => "update",
            Command::Delete(_) => "delete",
            Command::DeletePermanently(_) => "delete-permanently",
            Command::Restore(_) => "restore",
            Command::ToggleImportant(_) => "toggle-important",
            Command::ClearAll => "clear-all",
            Command::EmptyTrash => "empty-trash",
            Command::Export => "export",
            Command::Import => "import",
        }
    }

    /// Whether success invalidates the cache.
    fn mutates(&self) -> bool {
        !matches!(self, Command::Export)
    }

    fn failure_message(&self) -> &'static str {
        match self {
            Command::Create => "Failed to create note",
            Command::Update(_) => "Failed to update note",
            Command::Delete(_) | Command::DeletePermanently(_) => "Failed to delete note",
            Command::Restore(_) => "Failed to restore note",
            Command::ToggleImportant(_) => "Failed to change importance",
            Command::ClearAll => "Failed to delete all notes",
            Command::EmptyTrash => "Failed to empty trash",
            Command::Export => "Export failed",
            Command::Import => "Import failed",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.note_id() {
            Some(id) => write!(f, "{} {id}", self.name()),
            None => f.write_str(self.name()),
        }
    }
}

/// Where a command is in its lifecycle. Before the first event it is idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandState {
    Submitting,
    Succeeded,
    Failed(ErrorKind),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandEvent {
    pub command: Command,
    pub state: CommandState,
}

// ---------------------------------------------------------------------------
// Bulk delete report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkFailure {
    pub id: NoteId,
    pub kind: ErrorKind,
    pub message: String,
}

/// Outcome of deleting every note one by one, stopping at the first
/// failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkDeleteReport {
    pub succeeded: Vec<NoteId>,
    pub failed: Option<BulkFailure>,
    pub not_attempted: Vec<NoteId>,
}

impl BulkDeleteReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_none()
    }

    /// `(succeeded, failed, not attempted)` counts.
    pub fn counts(&self) -> (usize, usize, usize) {
        (
            self.succeeded.len(),
            usize::from(self.failed.is_some()),
            self.not_attempted.len(),
        )
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

impl NotesApp {
    /// Validate the form and create a note.
    pub async fn create_note(&self, form: &NoteForm) -> AppResult<Note> {
        self.execute(
            Command::Create,
            async {
                let draft = form.to_draft()?;
                Ok(self.backend.create_note(&draft).await?)
            },
            |_| "Note created".to_string(),
        )
        .await
    }

    /// Validate the form and replace the note's fields with it.
    pub async fn update_note(&self, id: &NoteId, form: &NoteForm) -> AppResult<Note> {
        self.execute(
            Command::Update(id.clone()),
            async {
                let patch = NotePatch::from(form.to_draft()?);
                Ok(self.backend.update_note(id, &patch).await?)
            },
            |_| "Note updated".to_string(),
        )
        .await
    }

    /// Delete a note: to the trash when the trash is enabled, for good
    /// otherwise.
    pub async fn delete_note(&self, id: &NoteId) -> AppResult<()> {
        if !self.flags.trash {
            return self.delete_permanently(id).await;
        }
        self.execute(
            Command::Delete(id.clone()),
            async { Ok(self.backend.soft_delete_note(id).await?) },
            |_| "Note moved to trash".to_string(),
        )
        .await
    }

    pub async fn delete_permanently(&self, id: &NoteId) -> AppResult<()> {
        self.execute(
            Command::DeletePermanently(id.clone()),
            async { Ok(self.backend.permanently_delete_note(id).await?) },
            |_| "Note deleted".to_string(),
        )
        .await
    }

    pub async fn restore_note(&self, id: &NoteId) -> AppResult<Note> {
        self.execute(
            Command::Restore(id.clone()),
            async { Ok(self.backend.restore_note(id).await?) },
            |_| "Note restored".to_string(),
        )
        .await
    }

    /// Flip the importance flag of a cached note.
    ///
    /// The new value is computed from the cache and sent explicitly.
    pub async fn toggle_important(&self, id: &NoteId) -> AppResult<Note> {
        self.execute(
            Command::ToggleImportant(id.clone()),
            async {
                let current = self.find(id).await.ok_or_else(|| CoreError::NotFound {
                    entity: "Note",
                    id: id.clone(),
                })?;
                Ok(self.backend.set_important(id, !current.important).await?)
            },
            |note| {
                if note.important {
                    "Marked as important".to_string()
                } else {
                    "No longer important".to_string()
                }
            },
        )
        .await
    }

    /// Permanently delete everything in the trash.
    pub async fn empty_trash(&self) -> AppResult<()> {
        self.execute(
            Command::EmptyTrash,
            async { Ok(self.backend.clear_trash().await?) },
            |_| "Trash emptied".to_string(),
        )
        .await
    }

    /// Fetch every note for download.
    pub async fn export(&self) -> AppResult<ExportDocument> {
        self.execute(
            Command::Export,
            async { Ok(ExportDocument::new(self.backend.export_all().await?)) },
            |doc| format!("Exported {} notes", doc.count),
        )
        .await
    }

    /// Import notes from an export (or compatible) document.
    ///
    /// Invalid items are rejected locally and never sent. Rejection
    /// indices refer to positions in the document.
    pub async fn import(&self, document: &str) -> AppResult<ImportResult> {
        self.execute(
            Command::Import,
            async {
                let plan = ImportPlan::from_document(document)?;
                if plan.drafts.is_empty() {
                    return Ok(plan.merge(ImportResult::default()));
                }
                let result = self.backend.import_many(&plan.drafts).await?;
                Ok(plan.merge(result))
            },
            |result| {
                if result.rejected.is_empty() {
                    format!("Imported {} notes", result.created)
                } else {
                    format!(
                        "Imported {} notes, {} rejected",
                        result.created,
                        result.rejected.len()
                    )
                }
            },
        )
        .await
    }

    /// Delete every note in the cache that is not already trashed, one at
    /// a time, stopping at the first failure.
    ///
    /// The store is reloaded afterwards whatever happened, so it shows
    /// exactly what was deleted.
    pub async fn clear_all(&self) -> AppResult<BulkDeleteReport> {
        let command = Command::ClearAll;
        let trash = self.flags.trash;
        let targets: Vec<NoteId> = self
            .notes()
            .await
            .into_iter()
            .filter(|n| !(trash && n.deleted))
            .map(|n| n.id)
            .collect();

        if targets.is_empty() {
            self.notifier.info("No notes to delete");
            return Ok(BulkDeleteReport::default());
        }

        self.publish(&command, CommandState::Submitting);
        let mut report = BulkDeleteReport::default();

        for (position, id) in targets.iter().enumerate() {
            let _guard = self.locks.lock(id).await;
            let result = if trash {
                self.cancellable(self.backend.soft_delete_note(id)).await
            } else {
                self.cancellable(self.backend.permanently_delete_note(id)).await
            };

            match result {
                Ok(()) => report.succeeded.push(id.clone()),
                Err(e) => {
                    tracing::warn!(note_id = %id, error = %e, "Bulk delete stopped");
                    report.failed = Some(BulkFailure {
                        id: id.clone(),
                        kind: e.kind(),
                        message: e.to_string(),
                    });
                    report.not_attempted = targets[position + 1..].to_vec();
                    break;
                }
            }
        }

        self.reload().await;

        let (succeeded, _, not_attempted) = report.counts();
        match &report.failed {
            None => {
                tracing::info!(succeeded, "Deleted all notes");
                self.publish(&command, CommandState::Succeeded);
                self.notifier.success(format!("Deleted {succeeded} notes"));
            }
            Some(failure) => {
                self.publish(&command, CommandState::Failed(failure.kind));
                self.notifier.error(format!(
                    "Deleted {succeeded} notes, then note {} failed ({}); {not_attempted} not attempted",
                    failure.id, failure.kind
                ));
            }
        }
        Ok(report)
    }

    /// Open `editor` on a cached note.
    pub async fn begin_edit(&self, editor: &mut Editor, id: &NoteId) -> AppResult<()> {
        let note = self.find(id).await.ok_or_else(|| CoreError::NotFound {
            entity: "Note",
            id: id.clone(),
        })?;
        editor.open_edit(&note);
        Ok(())
    }

    /// Create or update according to the editor's mode. The editor is
    /// closed only when the change was accepted.
    pub async fn submit(&self, editor: &mut Editor) -> AppResult<Note> {
        let note = match editor.mode().clone() {
            EditorMode::Creating => self.create_note(editor.form()).await?,
            EditorMode::Editing(id) => self.update_note(&id, editor.form()).await?,
            EditorMode::Closed => {
                return Err(CoreError::Invalid("the editor is not open".to_string()).into())
            }
        };
        editor.close();
        Ok(note)
    }

    // ---- private helpers ----

    /// Run one command: serialize on its note, run `action` under
    /// cancellation, then reload and report.
    async fn execute<T>(
        &self,
        command: Command,
        action: impl Future<Output = AppResult<T>>,
        success_message: impl FnOnce(&T) -> String,
    ) -> AppResult<T> {
        let _guard = match command.note_id() {
            Some(id) => Some(self.locks.lock(id).await),
            None => None,
        };
        self.publish(&command, CommandState::Submitting);

        match self.cancellable_app(action).await {
            Ok(value) => {
                if command.mutates() {
                    self.reload().await;
                }
                tracing::info!(command = %command, "Command succeeded");
                self.publish(&command, CommandState::Succeeded);
                self.notifier.success(success_message(&value));
                Ok(value)
            }
            Err(err) => {
                tracing::warn!(command = %command, error = %err, "Command failed");
                self.publish(&command, CommandState::Failed(err.kind()));
                self.notifier.error(failure_text(&command, &err));
                Err(err)
            }
        }
    }

    fn publish(&self, command: &Command, state: CommandState) {
        // No receivers is fine.
        let _ = self.events.send(CommandEvent {
            command: command.clone(),
            state,
        });
    }
}

/// Notification text for a failed command. Validation problems are shown
/// in full; everything else by failure class.
fn failure_text(command: &Command, err: &AppError) -> String {
    match err {
        AppError::Core(CoreError::Validation(detail)) => {
            format!("{}: {detail}", command.failure_message())
        }
        AppError::Import(detail) => format!("{}: {detail}", command.failure_message()),
        other => format!("{}: {}", command.failure_message(), other.kind()),
    }
}

#[cfg(test)]
mod tests {
    use notely_client::ApiError;

    use super::*;

    #[test]
    fn command_display_includes_note() {
        assert_eq!(Command::Delete(NoteId::from("4")).to_string(), "delete 4");
        assert_eq!(Command::ClearAll.to_string(), "clear-all");
        assert_eq!(Command::Create.note_id(), None);
    }

    #[test]
    fn only_export_leaves_cache_alone() {
        assert!(!Command::Export.mutates());
        assert!(Command::Import.mutates());
        assert!(Command::Restore(NoteId::from("1")).mutates());
    }

    #[test]
    fn report_counts() {
        let report = BulkDeleteReport {
            succeeded: vec![NoteId::from("1")],
            failed: Some(BulkFailure {
                id: NoteId::from("2"),
                kind: ErrorKind::Server { status: 500 },
                message: "boom".into(),
            }),
            not_attempted: vec![NoteId::from("3")],
        };
        assert_eq!(report.counts(), (1, 1, 1));
        assert!(!report.is_complete());
        assert!(BulkDeleteReport::default().is_complete());
    }

    #[test]
    fn failure_text_by_class() {
        let validation = AppError::from(CoreError::Validation("title is required".into()));
        assert_eq!(
            failure_text(&Command::Create, &validation),
            "Failed to create note: title is required"
        );

        let server = AppError::from(ApiError::Server {
            status: 502,
            message: "bad gateway".into(),
        });
        assert_eq!(
            failure_text(&Command::Delete(NoteId::from("1")), &server),
            "Failed to delete note: server error (502)"
        );
    }
}
