//! In-memory note storage shared by all stub handlers.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use chrono::Utc;
use notely_core::{CoreError, Note, NoteDraft, NoteId, NotePatch};

use crate::faults::{Faults, RecordedRequest};

/// Shared stub state: the notes, the configured faults and the request log.
///
/// Cloning is cheap; all clones see the same data. The setters are
/// synchronous so tests can reconfigure a running server between calls.
#[derive(Debug, Clone, Default)]
pub struct StubState {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    notes: Vec<Note>,
    last_id: u64,
    faults: Faults,
    requests: Vec<RecordedRequest>,
}

impl StubState {
    pub fn new() -> Self {
        Self::default()
    }

    // -- Seeding and inspection --

    /// Store a note exactly as given, keeping its id and timestamps.
    pub fn insert(&self, note: Note) {
        let mut inner = self.write();
        if let Ok(n) = note.id.as_str().parse::<u64>() {
            inner.last_id = inner.last_id.max(n);
        }
        inner.notes.push(note);
    }

    /// Every stored note, trashed ones included, in insertion order.
    pub fn notes(&self) -> Vec<Note> {
        self.read().notes.clone()
    }

    pub fn note(&self, id: &NoteId) -> Option<Note> {
        self.read().notes.iter().find(|n| &n.id == id).cloned()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.read().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.read().requests.len()
    }

    // -- Faults --

    /// Answer every request addressing `id` with `status`.
    pub fn fail_id(&self, id: impl Into<String>, status: u16) {
        self.write().faults.failing_ids.insert(id.into(), status);
    }

    pub fn fail_all(&self, status: Option<u16>) {
        self.write().faults.fail_all = status;
    }

    pub fn set_malformed(&self, malformed: bool) {
        self.write().faults.malformed = malformed;
    }

    pub fn set_envelope(&self, envelope: bool) {
        self.write().faults.envelope = envelope;
    }

    pub fn set_delay(&self, delay: Option<Duration>) {
        self.write().faults.delay = delay;
    }

    pub fn clear_faults(&self) {
        self.write().faults = Faults::default();
    }

    pub fn envelope(&self) -> bool {
        self.read().faults.envelope
    }

    /// Append to the request log and return the faults in effect.
    pub(crate) fn record(&self, request: RecordedRequest) -> Faults {
        let mut inner = self.write();
        inner.requests.push(request);
        inner.faults.clone()
    }

    // -- Operations behind the routes --

    /// Store a new note with a fresh id and both timestamps set to now.
    pub fn create(&self, draft: NoteDraft) -> Note {
        self.write().create(draft)
    }

    pub fn update(&self, id: &NoteId, patch: NotePatch) -> Result<Note, CoreError> {
        let mut inner = self.write();
        let note = inner.find_mut(id)?;
        if let Some(title) = patch.title {
            note.title = title;
        }
        if let Some(content) = patch.content {
            note.content = content;
        }
        if let Some(tags) = patch.tags {
            note.tags = tags;
        }
        if let Some(important) = patch.important {
            note.important = important;
        }
        note.updated_at = Some(Utc::now());
        Ok(note.clone())
    }

    /// Set the flag to `important`, or flip it when no value is given.
    pub fn set_important(
        &self,
        id: &NoteId,
        important: Option<bool>,
    ) -> Result<Note, CoreError> {
        let mut inner = self.write();
        let note = inner.find_mut(id)?;
        note.important = important.unwrap_or(!note.important);
        note.updated_at = Some(Utc::now());
        Ok(note.clone())
    }

    pub fn set_deleted(&self, id: &NoteId, deleted: bool) -> Result<Note, CoreError> {
        let mut inner = self.write();
        let note = inner.find_mut(id)?;
        note.deleted = deleted;
        note.updated_at = Some(Utc::now());
        Ok(note.clone())
    }

    pub fn remove(&self, id: &NoteId) -> Result<(), CoreError> {
        let mut inner = self.write();
        let before = inner.notes.len();
        inner.notes.retain(|n| &n.id != id);
        if inner.notes.len() == before {
            return Err(not_found(id));
        }
        Ok(())
    }

    /// Drop every trashed note. Returns how many were removed.
    pub fn clear_trash(&self) -> usize {
        let mut inner = self.write();
        let before = inner.notes.len();
        inner.notes.retain(|n| !n.deleted);
        before - inner.notes.len()
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Inner {
    fn create(&mut self, draft: NoteDraft) -> Note {
        self.last_id += 1;
        let now = Utc::now();
        let note = Note {
            id: NoteId::new(self.last_id.to_string()),
            title: draft.title,
            content: draft.content,
            tags: draft.tags,
            important: draft.important,
            deleted: false,
            created_at: Some(now),
            updated_at: Some(now),
        };
        self.notes.push(note.clone());
        note
    }

    fn find_mut(&mut self, id: &NoteId) -> Result<&mut Note, CoreError> {
        self.notes
            .iter_mut()
            .find(|n| &n.id == id)
            .ok_or_else(|| not_found(id))
    }
}

fn not_found(id: &NoteId) -> CoreError {
    CoreError::NotFound {
        entity: "Note",
        id: id.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- create / insert --

    #[test]
    fn ids_are_sequential_and_never_reused() {
        let state = StubState::new();
        let a = state.create(NoteDraft::new("a", "a"));
        state.remove(&a.id).unwrap();
        let b = state.create(NoteDraft::new("b", "b"));
        assert_eq!(a.id.as_str(), "1");
        assert_eq!(b.id.as_str(), "2");
    }

    #[test]
    fn insert_advances_the_id_counter() {
        let state = StubState::new();
        let mut note = state.create(NoteDraft::new("a", "a"));
        note.id = NoteId::from("10");
        state.insert(note);
        assert_eq!(state.create(NoteDraft::new("b", "b")).id.as_str(), "11");
    }

    // -- mutations --

    #[test]
    fn set_important_with_and_without_value() {
        let state = StubState::new();
        let note = state.create(NoteDraft::new("a", "a"));
        assert!(state.set_important(&note.id, None).unwrap().important);
        assert!(state.set_important(&note.id, Some(true)).unwrap().important);
        assert!(!state.set_important(&note.id, None).unwrap().important);
    }

    #[test]
    fn clear_trash_removes_only_trashed() {
        let state = StubState::new();
        let a = state.create(NoteDraft::new("a", "a"));
        state.create(NoteDraft::new("b", "b"));
        state.set_deleted(&a.id, true).unwrap();
        assert_eq!(state.clear_trash(), 1);
        assert_eq!(state.notes().len(), 1);
    }

    #[test]
    fn missing_ids_are_not_found() {
        let state = StubState::new();
        let id = NoteId::from("404");
        assert!(matches!(state.remove(&id), Err(CoreError::NotFound { .. })));
        assert!(matches!(
            state.update(&id, NotePatch::default()),
            Err(CoreError::NotFound { .. })
        ));
    }
}
