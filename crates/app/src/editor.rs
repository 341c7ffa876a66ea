//! Create/edit form state.

use notely_core::{Note, NoteForm, NoteId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditorMode {
    #[default]
    Closed,
    Creating,
    Editing(NoteId),
}

/// The note editor: which note (if any) is being edited and the raw form.
///
/// Submitting is done by [`NotesApp::submit`](crate::NotesApp::submit),
/// which closes the editor only when the backend accepted the change.
#[derive(Debug, Clone, Default)]
pub struct Editor {
    mode: EditorMode,
    form: NoteForm,
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open an empty form for a new note.
    pub fn open_new(&mut self) {
        self.mode = EditorMode::Creating;
        self.form = NoteForm::default();
    }

    /// Open the form pre-filled from `note`.
    pub fn open_edit(&mut self, note: &Note) {
        self.mode = EditorMode::Editing(note.id.clone());
        self.form = NoteForm::from_note(note);
    }

    pub fn close(&mut self) {
        self.mode = EditorMode::Closed;
        self.form = NoteForm::default();
    }

    pub fn mode(&self) -> &EditorMode {
        &self.mode
    }

    pub fn is_open(&self) -> bool {
        self.mode != EditorMode::Closed
    }

    pub fn form(&self) -> &NoteForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut NoteForm {
        &mut self.form
    }

    /// Heading for the form.
    pub fn heading(&self) -> &'static str {
        match self.mode {
            EditorMode::Editing(_) => "Edit note",
            _ => "New note",
        }
    }

    /// Label for the submit button.
    pub fn submit_label(&self) -> &'static str {
        match self.mode {
            EditorMode::Editing(_) => "Update note",
            _ => "Create note",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note() -> Note {
        serde_json::from_str(
            r#"{"id": 3, "title": "Trip", "content": "pack", "tags": ["travel", "todo"], "important": true}"#,
        )
        .unwrap()
    }

    #[test]
    fn open_edit_prefills_form() {
        let mut editor = Editor::new();
        editor.open_edit(&note());

        assert_eq!(editor.mode(), &EditorMode::Editing(NoteId::from("3")));
        assert_eq!(editor.form().title, "Trip");
        assert_eq!(editor.form().tags, "travel, todo");
        assert!(editor.form().important);
        assert_eq!(editor.submit_label(), "Update note");
    }

    #[test]
    fn open_new_clears_previous_form() {
        let mut editor = Editor::new();
        editor.open_edit(&note());
        editor.open_new();

        assert_eq!(editor.mode(), &EditorMode::Creating);
        assert_eq!(editor.form(), &NoteForm::default());
        assert_eq!(editor.heading(), "New note");
    }

    #[test]
    fn close_resets() {
        let mut editor = Editor::new();
        editor.open_new();
        editor.form_mut().title = "draft".into();
        editor.close();

        assert!(!editor.is_open());
        assert!(editor.form().title.is_empty());
    }
}
